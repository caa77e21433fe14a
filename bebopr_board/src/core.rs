//! Board core: startup and shutdown hooks.
//!
//! `BoardCore` owns the resolved variant, the detected kernel and the
//! configuration tables. Startup runs [`BoardCore::pre_init`] before any
//! subsystem starts and [`BoardCore::post_init`] once they are running;
//! [`BoardCore::exit`] switches the I/O power off again at shutdown.

use crate::gpio::{GpioPort, SysfsGpio};
use crate::power::{PowerSequencer, SequenceReport};
use bebopr_common::board::error::PreInitError;
use bebopr_common::board::subsystem::{ConfigStage, SubsystemError, Subsystems};
use bebopr_common::board::tables::ConfigTables;
use bebopr_common::board::variant::BoardVariant;
use bebopr_common::config::{BoardConfig, ConfigError};
use bebopr_common::kernel::{self, KernelGeneration, KernelInfo};
use bebopr_common::motion::context::MotionConfig;
use bebopr_common::stepper::{FileStepperStore, StepperConfigStore, StepperDriver};
use std::path::Path;
use tracing::{debug, error, info};

/// Board core.
#[derive(Debug)]
pub struct BoardCore {
    config: BoardConfig,
    variant: BoardVariant,
    kernel: KernelInfo,
    tables: ConfigTables,
    /// Set by `pre_init`.
    stepper: StepperDriver,
}

impl BoardCore {
    /// Create a core for the running kernel.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if the configuration or the
    /// tables built from it are inconsistent.
    pub fn new(config: BoardConfig) -> Result<Self, ConfigError> {
        Self::with_kernel(config, kernel::kernel_info().clone())
    }

    /// Create a core for an explicitly given kernel.
    pub fn with_kernel(config: BoardConfig, kernel: KernelInfo) -> Result<Self, ConfigError> {
        config.validate()?;

        let variant = config.board.variant();
        let tables = ConfigTables::for_variant(&variant);
        tables
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        debug!(
            "BoardCore created for {} ({:?}, {:?}): {} analog, {} temperature, {} pwm, {} heater records",
            variant.hardware,
            variant.flavor,
            variant.adc,
            tables.analog.len(),
            tables.temperature.len(),
            tables.pwm.len(),
            tables.heater.len()
        );

        Ok(Self {
            config,
            variant,
            kernel,
            tables,
            stepper: StepperDriver::default(),
        })
    }

    /// Load and validate `board.toml`.
    pub fn load_config(config_path: &Path) -> Result<BoardConfig, ConfigError> {
        info!("Loading configuration from {:?}", config_path);
        let config = BoardConfig::load_validated(config_path)?;
        info!(
            "Loaded config: hardware={}, flavor={:?}, adc={:?}",
            config.board.hardware, config.board.flavor, config.board.adc
        );
        Ok(config)
    }

    /// Check the platform and hand the tables to the subsystems.
    ///
    /// Runs before any subsystem starts. The tables go out in the order
    /// analog, temperature, PWM, heater; the first rejection stops the
    /// sequence. Finally the stepper driver personality is read from
    /// `store`.
    ///
    /// # Errors
    /// - `UnsupportedKernel` if the kernel release is unknown
    /// - `UnsupportedCombination` if the variant cannot run on this kernel
    /// - `ConfigRejected` naming the first stage a subsystem refused
    pub fn pre_init(
        &mut self,
        subsystems: &mut dyn Subsystems,
        store: &dyn StepperConfigStore,
    ) -> Result<StepperDriver, PreInitError> {
        if self.kernel.generation == KernelGeneration::Unknown {
            let err = PreInitError::UnsupportedKernel {
                options: self.variant.hardware.options_label().to_string(),
                release: self.kernel.release_or_unknown().to_string(),
            };
            error!("{err}");
            return Err(err);
        }

        info!(
            "{} configured for '{}' running on kernel version {}",
            self.variant.hardware,
            self.kernel.generation.layout(),
            self.kernel.release_or_unknown()
        );

        self.variant
            .check_kernel(&self.kernel)
            .inspect_err(|e| error!("{e}"))?;

        stage(ConfigStage::Analog, subsystems.analog_config(&self.tables.analog))?;
        stage(ConfigStage::Temperature, subsystems.temp_config(&self.tables.temperature))?;
        stage(ConfigStage::Pwm, subsystems.pwm_config(&self.tables.pwm))?;
        stage(ConfigStage::Heater, subsystems.heater_config(&self.tables.heater))?;

        self.stepper = StepperDriver::select(store);
        info!("Using stepper driver configuration: '{}'", self.stepper);
        Ok(self.stepper)
    }

    /// Switch the I/O power on. Runs after every subsystem started.
    pub fn post_init(&self, port: &mut dyn GpioPort) -> SequenceReport {
        self.sequencer(port).power_on()
    }

    /// Switch the I/O power off at shutdown.
    pub fn exit(&self, port: &mut dyn GpioPort) -> SequenceReport {
        self.sequencer(port).power_off()
    }

    fn sequencer<'a>(&self, port: &'a mut dyn GpioPort) -> PowerSequencer<'a> {
        PowerSequencer::for_hardware(self.variant.hardware, self.kernel.generation, port)
    }

    /// GPIO port at the configured sysfs root.
    pub fn sysfs_gpio(&self) -> SysfsGpio {
        SysfsGpio::new(&self.config.board.gpio_root)
    }

    /// Stepper marker store at the configured path.
    pub fn stepper_store(&self) -> FileStepperStore {
        FileStepperStore::new(&self.config.board.stepper_config_path)
    }

    /// Fresh motion context for the configured profile.
    pub fn motion_config(&self) -> MotionConfig {
        self.config.motion.motion_config()
    }

    /// True unless `pre_init` found TB6560 drivers.
    pub fn use_pololu_drivers(&self) -> bool {
        self.stepper.is_pololu()
    }

    pub fn stepper_driver(&self) -> StepperDriver {
        self.stepper
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn variant(&self) -> &BoardVariant {
        &self.variant
    }

    pub fn kernel(&self) -> &KernelInfo {
        &self.kernel
    }

    pub fn tables(&self) -> &ConfigTables {
        &self.tables
    }
}

fn stage(stage: ConfigStage, result: Result<(), SubsystemError>) -> Result<(), PreInitError> {
    result.map_err(|source| {
        error!("{stage} failed: {source}");
        PreInitError::ConfigRejected { stage, source }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bebopr_common::board::variant::HardwareVariant;

    fn core(hardware: HardwareVariant, release: &str) -> BoardCore {
        let mut config = BoardConfig::default();
        config.board.hardware = hardware;
        BoardCore::with_kernel(config, KernelInfo::from_release(Some(release.to_string()))).unwrap()
    }

    #[test]
    fn defaults_before_pre_init() {
        let core = core(HardwareVariant::Bone, "3.8.13");
        assert!(core.use_pololu_drivers());
        assert_eq!(core.kernel().generation, KernelGeneration::DeviceTree38);
        assert_eq!(core.tables().analog.len(), 3);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = BoardConfig::default();
        config.shared.service_name.clear();
        assert!(matches!(
            BoardCore::with_kernel(config, KernelInfo::default()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn sysfs_paths_follow_config() {
        let mut config = BoardConfig::default();
        config.board.gpio_root = "/tmp/gpio".into();
        config.board.stepper_config_path = "/tmp/eeprom".into();
        let core = BoardCore::with_kernel(config, KernelInfo::default()).unwrap();
        assert_eq!(core.sysfs_gpio().root(), Path::new("/tmp/gpio"));
        assert_eq!(core.stepper_store().path(), Path::new("/tmp/eeprom"));
    }
}
