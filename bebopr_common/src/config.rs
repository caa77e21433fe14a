//! Configuration loading traits and types.
//!
//! The board variant, motion profile and sysfs locations are read once at
//! startup from `board.toml` and passed around as a `BoardConfig` value.
//!
//! # Usage
//!
//! ```rust,no_run
//! use bebopr_common::config::{BoardConfig, ConfigError};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = BoardConfig::load_validated(Path::new("/etc/bebopr/board.toml"))?;
//!     println!("Hardware: {}", config.board.hardware);
//!     Ok(())
//! }
//! ```

use crate::board::variant::{AdcSource, BoardVariant, BuildFlavor, HardwareVariant};
use crate::consts::{BOARD_SERVICE_NAME, DEFAULT_GPIO_ROOT, DEFAULT_STEPPER_CONFIG_PATH};
use crate::motion::axis::{AxisGeometry, StepProfile};
use crate::motion::context::{MotionConfig, ZCalibrationSwitch};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_filter(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

fn default_service_name() -> String {
    BOARD_SERVICE_NAME.to_string()
}

/// Common logging/identity settings.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "bebopr-printer-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: default_service_name(),
        }
    }
}

fn default_stepper_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_STEPPER_CONFIG_PATH)
}

fn default_gpio_root() -> PathBuf {
    PathBuf::from(DEFAULT_GPIO_ROOT)
}

/// `[board]` section: hardware selection and sysfs locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardSection {
    #[serde(default)]
    pub hardware: HardwareVariant,

    #[serde(default)]
    pub flavor: BuildFlavor,

    #[serde(default)]
    pub adc: AdcSource,

    /// Plain file holding the stepper driver marker ("TB6560" or "Pololu").
    #[serde(default = "default_stepper_config_path")]
    pub stepper_config_path: PathBuf,

    /// sysfs GPIO control directory.
    #[serde(default = "default_gpio_root")]
    pub gpio_root: PathBuf,
}

impl BoardSection {
    /// The resolved board variant.
    pub fn variant(&self) -> BoardVariant {
        BoardVariant::new(self.hardware, self.flavor, self.adc)
    }
}

impl Default for BoardSection {
    fn default() -> Self {
        Self {
            hardware: HardwareVariant::default(),
            flavor: BuildFlavor::default(),
            adc: AdcSource::default(),
            stepper_config_path: default_stepper_config_path(),
            gpio_root: default_gpio_root(),
        }
    }
}

/// `[motion]` section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MotionSection {
    #[serde(default)]
    pub step_profile: StepProfile,

    #[serde(default)]
    pub z_calibration_switch: ZCalibrationSwitch,
}

impl MotionSection {
    /// Fresh motion context for this profile.
    pub fn motion_config(&self) -> MotionConfig {
        MotionConfig::new(AxisGeometry::new(self.step_profile), self.z_calibration_switch)
    }
}

/// Complete board configuration loaded from `board.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    #[serde(default)]
    pub shared: SharedConfig,

    #[serde(default)]
    pub board: BoardSection,

    #[serde(default)]
    pub motion: MotionSection,
}

impl BoardConfig {
    /// Validate the configuration.
    ///
    /// # Validation Rules
    /// 1. `shared.service_name` not empty
    /// 2. `board.gpio_root` not empty
    /// 3. `board.stepper_config_path` not empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        if self.board.gpio_root.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "board.gpio_root cannot be empty".to_string(),
            ));
        }
        if self.board.stepper_config_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "board.stepper_config_path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from a TOML file and validate.
    pub fn load_validated(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_log_level_default() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
        assert_eq!(LogLevel::Warn.as_filter(), "warn");
    }

    #[test]
    fn test_log_level_deserialization() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct TestWrapper {
            level: LogLevel,
        }

        assert_eq!(
            toml::from_str::<TestWrapper>("level = \"trace\"")
                .unwrap()
                .level,
            LogLevel::Trace
        );
        assert_eq!(
            toml::from_str::<TestWrapper>("level = \"error\"")
                .unwrap()
                .level,
            LogLevel::Error
        );
    }

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.shared.service_name, "bebopr");
        assert_eq!(config.board.hardware, HardwareVariant::Bone);
        assert_eq!(config.board.flavor, BuildFlavor::Printer);
        assert_eq!(config.board.gpio_root, PathBuf::from("/sys/class/gpio"));
        assert_eq!(
            config.board.stepper_config_path,
            PathBuf::from("/etc/bebopr/stepper_drivers")
        );
        assert_eq!(config.motion.step_profile, StepProfile::Prusa);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        let config = BoardConfig::load_validated(file.path()).unwrap();
        assert_eq!(config.board.variant(), BoardVariant::default());
    }

    #[test]
    fn test_config_loader_file_not_found() {
        let result = BoardConfig::load(Path::new("/nonexistent/path/board.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound)));
    }

    #[test]
    fn test_config_loader_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid toml {{{{").unwrap();

        let result = BoardConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[board]\nhardware = \"bone\"\nlaser = true\n").unwrap();
        file.flush().unwrap();

        let result = BoardConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[shared]
log_level = "debug"
service_name = "bebopr-laser"

[board]
hardware = "bone_bridge"
flavor = "laser_cutter"
adc = "ads1x15"
stepper_config_path = "/tmp/eeprom"
gpio_root = "/tmp/gpio"

[motion]
step_profile = "test_rig"
z_calibration_switch = "max"
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = BoardConfig::load_validated(file.path()).unwrap();
        assert_eq!(config.shared.log_level, LogLevel::Debug);
        assert_eq!(
            config.board.variant(),
            BoardVariant::new(
                HardwareVariant::BoneBridge,
                BuildFlavor::LaserCutter,
                AdcSource::Ads1x15
            )
        );
        assert_eq!(config.board.gpio_root, PathBuf::from("/tmp/gpio"));
        let motion = config.motion.motion_config();
        assert_eq!(motion.geometry().profile(), StepProfile::TestRig);
        assert_eq!(motion.z_calibration(), ZCalibrationSwitch::Max);
    }

    #[test]
    fn test_empty_service_name_rejected() {
        let mut config = BoardConfig::default();
        config.shared.service_name.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_empty_gpio_root_rejected() {
        let mut config = BoardConfig::default();
        config.board.gpio_root = PathBuf::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
