//! Axis geometry and the motion configuration context consumed by the
//! trajectory planner.

pub mod axis;
pub mod context;
