//! Stepper driver personality.
//!
//! The cape stores which stepper driver boards are fitted. Only two
//! personalities are distinguished; anything that is not the TB6560 marker,
//! including a failed read, selects Pololu.

use crate::consts::{STEPPER_MARKER_POLOLU, STEPPER_MARKER_TB6560};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Stepper driver board family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepperDriver {
    /// Pololu style carriers (active-high enable).
    #[default]
    Pololu,
    /// TB6560 based driver boards.
    Tb6560,
}

impl StepperDriver {
    /// Map a stored marker to a personality.
    pub fn from_marker(marker: &str) -> Self {
        let marker = marker.trim_matches(|c: char| c == '\0' || c.is_whitespace());
        if marker == STEPPER_MARKER_TB6560 {
            Self::Tb6560
        } else {
            Self::Pololu
        }
    }

    /// Read the personality from `store`, defaulting to Pololu on failure.
    pub fn select(store: &dyn StepperConfigStore) -> Self {
        match store.read_step_io_config() {
            Ok(marker) => Self::from_marker(&marker),
            Err(e) => {
                warn!("Cannot read stepper driver configuration ({e}), assuming Pololu");
                Self::Pololu
            }
        }
    }

    /// True for the Pololu personality.
    #[inline]
    pub const fn is_pololu(&self) -> bool {
        matches!(self, Self::Pololu)
    }
}

impl fmt::Display for StepperDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pololu => f.write_str(STEPPER_MARKER_POLOLU),
            Self::Tb6560 => f.write_str(STEPPER_MARKER_TB6560),
        }
    }
}

/// Persistent storage holding the stepper driver type marker.
pub trait StepperConfigStore {
    /// Read the raw marker.
    fn read_step_io_config(&self) -> io::Result<String>;
}

/// Marker stored in a plain file.
///
/// The whole file is the marker, optionally padded with NULs or a trailing
/// newline. A raw EEPROM image with a header in front never matches and
/// selects Pololu.
#[derive(Debug, Clone)]
pub struct FileStepperStore {
    path: PathBuf,
}

impl FileStepperStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StepperConfigStore for FileStepperStore {
    fn read_step_io_config(&self) -> io::Result<String> {
        let bytes = fs::read(&self.path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    struct Failing;

    impl StepperConfigStore for Failing {
        fn read_step_io_config(&self) -> io::Result<String> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no eeprom"))
        }
    }

    #[test]
    fn marker_mapping() {
        assert_eq!(StepperDriver::from_marker("TB6560"), StepperDriver::Tb6560);
        assert_eq!(StepperDriver::from_marker("TB6560\0\0\0"), StepperDriver::Tb6560);
        assert_eq!(StepperDriver::from_marker("Pololu"), StepperDriver::Pololu);
        assert_eq!(StepperDriver::from_marker("tb6560"), StepperDriver::Pololu);
        assert_eq!(StepperDriver::from_marker(""), StepperDriver::Pololu);
    }

    #[test]
    fn read_failure_defaults_to_pololu() {
        assert_eq!(StepperDriver::select(&Failing), StepperDriver::Pololu);
    }

    #[test]
    fn file_store() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "TB6560").unwrap();
        file.flush().unwrap();

        let store = FileStepperStore::new(file.path());
        assert_eq!(StepperDriver::select(&store), StepperDriver::Tb6560);
    }

    #[test]
    fn marker_must_be_whole_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\xaaU3\xeeA1BeBoPr TB6560").unwrap();
        file.flush().unwrap();

        let store = FileStepperStore::new(file.path());
        assert_eq!(StepperDriver::select(&store), StepperDriver::Pololu);
    }

    #[test]
    fn missing_file_defaults_to_pololu() {
        let store = FileStepperStore::new("/nonexistent/eeprom");
        assert_eq!(StepperDriver::select(&store), StepperDriver::Pololu);
    }

    #[test]
    fn display() {
        assert_eq!(StepperDriver::Pololu.to_string(), "Pololu");
        assert_eq!(StepperDriver::Tb6560.to_string(), "TB6560");
    }
}
