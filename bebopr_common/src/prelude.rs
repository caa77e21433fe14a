//! Prelude module for common re-exports.
//!
//! ```rust
//! use bebopr_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{BoardConfig, ConfigError, ConfigLoader, LogLevel};

// ─── Board ──────────────────────────────────────────────────────────
pub use crate::board::error::PreInitError;
pub use crate::board::records::{
    AnalogInputRecord, HeaterRecord, PidSettings, PwmOutputRecord, TemperatureRecord,
    ThermistorCurve,
};
pub use crate::board::subsystem::{ConfigStage, SubsystemError, Subsystems};
pub use crate::board::tables::{ConfigTables, TableError};
pub use crate::board::tag::{Tag, TagKind};
pub use crate::board::variant::{
    AdcSource, BoardVariant, BuildFlavor, HardwareVariant, PowerLine,
};

// ─── Kernel ─────────────────────────────────────────────────────────
pub use crate::kernel::{get_kernel_type, KernelGeneration, KernelInfo};

// ─── Motion ─────────────────────────────────────────────────────────
pub use crate::motion::axis::{Axis, AxisGeometry, StepProfile};
pub use crate::motion::context::{MotionConfig, ZCalibrationSwitch};

// ─── Stepper ────────────────────────────────────────────────────────
pub use crate::stepper::{FileStepperStore, StepperConfigStore, StepperDriver};
