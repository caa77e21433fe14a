//! GPIO access through the sysfs control files.
//!
//! `GpioPort` is the seam the power sequencer drives; `SysfsGpio` is the
//! implementation for `/sys/class/gpio`:
//!
//! ```text
//! <root>/export            write "<n>" to create gpio<n>/
//! <root>/unexport          write "<n>" to remove it
//! <root>/gpio<n>/direction "in" | "out"
//! <root>/gpio<n>/value     "0" | "1"
//! ```

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

/// Pin direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// One GPIO operation, used for logging and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpioOp {
    Export,
    Unexport,
    Direction(Direction),
    /// Drive the pin high (`true`) or low.
    Value(bool),
}

impl fmt::Display for GpioOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Export => write!(f, "export"),
            Self::Unexport => write!(f, "unexport"),
            Self::Direction(d) => write!(f, "direction={}", d.as_str()),
            Self::Value(v) => write!(f, "value={}", u8::from(*v)),
        }
    }
}

/// GPIO write failure.
#[derive(Debug, Error)]
pub enum GpioError {
    /// Writing a control file failed.
    #[error("gpio{pin}: write to {} failed: {source}", path.display())]
    Io {
        pin: u32,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Low-level GPIO control.
pub trait GpioPort {
    /// Make `pin` available to user space. Exporting an already exported
    /// pin succeeds.
    fn export(&mut self, pin: u32) -> Result<(), GpioError>;

    /// Release `pin`.
    fn unexport(&mut self, pin: u32) -> Result<(), GpioError>;

    fn set_direction(&mut self, pin: u32, direction: Direction) -> Result<(), GpioError>;

    /// Drive `pin` high or low.
    fn set_value(&mut self, pin: u32, high: bool) -> Result<(), GpioError>;

    /// Dispatch a `GpioOp`.
    fn apply(&mut self, op: GpioOp, pin: u32) -> Result<(), GpioError> {
        match op {
            GpioOp::Export => self.export(pin),
            GpioOp::Unexport => self.unexport(pin),
            GpioOp::Direction(direction) => self.set_direction(pin, direction),
            GpioOp::Value(high) => self.set_value(pin, high),
        }
    }
}

/// sysfs GPIO control directory.
#[derive(Debug, Clone)]
pub struct SysfsGpio {
    root: PathBuf,
}

impl SysfsGpio {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of an exported pin.
    pub fn pin_dir(&self, pin: u32) -> PathBuf {
        self.root.join(format!("gpio{pin}"))
    }

    /// Write `value` to an existing control file.
    fn write_file(pin: u32, path: PathBuf, value: &str) -> Result<(), GpioError> {
        trace!("gpio{pin}: {} <- {value}", path.display());
        OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .and_then(|mut f| f.write_all(value.as_bytes()))
            .map_err(|source| GpioError::Io { pin, path, source })
    }
}

/// The kernel answers `EBUSY` when the pin is already exported.
fn export_result(pin: u32, result: Result<(), GpioError>) -> Result<(), GpioError> {
    match result {
        Err(GpioError::Io { source, .. }) if source.raw_os_error() == Some(libc::EBUSY) => {
            debug!("gpio{pin} already exported");
            Ok(())
        }
        other => other,
    }
}

impl GpioPort for SysfsGpio {
    fn export(&mut self, pin: u32) -> Result<(), GpioError> {
        export_result(pin, Self::write_file(pin, self.root.join("export"), &pin.to_string()))
    }

    fn unexport(&mut self, pin: u32) -> Result<(), GpioError> {
        Self::write_file(pin, self.root.join("unexport"), &pin.to_string())
    }

    fn set_direction(&mut self, pin: u32, direction: Direction) -> Result<(), GpioError> {
        Self::write_file(pin, self.pin_dir(pin).join("direction"), direction.as_str())
    }

    fn set_value(&mut self, pin: u32, high: bool) -> Result<(), GpioError> {
        Self::write_file(pin, self.pin_dir(pin).join("value"), if high { "1" } else { "0" })
    }
}
