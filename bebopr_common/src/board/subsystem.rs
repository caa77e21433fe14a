//! Collaborator interface for table registration.
//!
//! This module defines:
//! - `Subsystems` trait - the four external subsystems that receive tables
//! - `ConfigStage` enum - which registration step is running
//! - `SubsystemError` enum - rejection reported by a subsystem

use crate::board::records::{
    AnalogInputRecord, HeaterRecord, PwmOutputRecord, TemperatureRecord,
};
use core::fmt;
use thiserror::Error;

/// Error reported by an external subsystem while accepting its table.
#[derive(Debug, Clone, Error)]
pub enum SubsystemError {
    /// The subsystem refused the table contents.
    #[error("table rejected: {0}")]
    Rejected(String),

    /// A record refers to a tag the subsystem does not know.
    #[error("unknown tag: {0}")]
    UnknownTag(String),

    /// Hardware behind a record could not be opened.
    #[error("device error: {0}")]
    Device(String),
}

/// Registration stage, in the fixed order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConfigStage {
    Analog = 0,
    Temperature = 1,
    Pwm = 2,
    Heater = 3,
}

impl ConfigStage {
    /// All stages in execution order.
    pub const ORDER: [ConfigStage; 4] = [
        ConfigStage::Analog,
        ConfigStage::Temperature,
        ConfigStage::Pwm,
        ConfigStage::Heater,
    ];
}

impl fmt::Display for ConfigStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analog => write!(f, "analog_config"),
            Self::Temperature => write!(f, "temp_config"),
            Self::Pwm => write!(f, "pwm_config"),
            Self::Heater => write!(f, "heater_config"),
        }
    }
}

/// The four subsystems that consume the board tables.
///
/// Called once each during pre-initialisation, in `ConfigStage::ORDER`.
/// A later subsystem may rely on tags registered by an earlier one
/// (temperatures reference analog inputs, heaters reference temperatures
/// and PWM outputs). The tables are borrowed; they stay immutable for the
/// rest of the process.
pub trait Subsystems {
    /// Analog filtering: register ADC channels.
    fn analog_config(&mut self, records: &[AnalogInputRecord]) -> Result<(), SubsystemError>;

    /// Temperature conversion: register derived temperature channels.
    fn temp_config(&mut self, records: &[TemperatureRecord]) -> Result<(), SubsystemError>;

    /// PWM driver: register outputs and apply non-zero frequencies.
    fn pwm_config(&mut self, records: &[PwmOutputRecord]) -> Result<(), SubsystemError>;

    /// Heater control: register PID loops.
    fn heater_config(&mut self, records: &[HeaterRecord]) -> Result<(), SubsystemError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order() {
        assert_eq!(ConfigStage::ORDER[0], ConfigStage::Analog);
        assert_eq!(ConfigStage::ORDER[3], ConfigStage::Heater);
        let mut sorted = ConfigStage::ORDER;
        sorted.sort_by_key(|s| *s as u8);
        assert_eq!(sorted, ConfigStage::ORDER);
    }

    #[test]
    fn subsystem_error_display() {
        let err = SubsystemError::UnknownTag("spare_ain".to_string());
        assert!(err.to_string().contains("spare_ain"));
    }
}
