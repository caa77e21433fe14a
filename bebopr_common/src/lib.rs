//! BeBoPr Common Library
//!
//! Shared board configuration types for the BeBoPr controller workspace.
//!
//! # Module Structure
//!
//! - [`board`] - Hardware variants, identity tags and the static tables
//! - [`config`] - `board.toml` loading and validation
//! - [`consts`] - GPIO numbers, sysfs paths and markers
//! - [`kernel`] - Kernel generation detection (memoized)
//! - [`motion`] - Axis geometry and the motion configuration context
//! - [`stepper`] - Stepper driver personality
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use bebopr_common::prelude::*;
//!
//! let variant = BoardVariant::new(HardwareVariant::BoneBridge, BuildFlavor::Printer, AdcSource::Internal);
//! let tables = ConfigTables::for_variant(&variant);
//! assert!(tables.validate().is_ok());
//! ```

pub mod board;
pub mod config;
pub mod consts;
pub mod kernel;
pub mod motion;
pub mod prelude;
pub mod stepper;
