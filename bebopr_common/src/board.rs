//! Board configuration: variant selection, identity tags and the static
//! tables handed to the external subsystems.

pub mod error;
pub mod records;
pub mod subsystem;
pub mod tables;
pub mod tag;
pub mod variant;
