//! Configuration record types handed to the external subsystems.
//!
//! - `AnalogInputRecord` - one ADC channel
//! - `TemperatureRecord` - a temperature derived from an analog input
//! - `PwmOutputRecord` - one PWM channel
//! - `HeaterRecord` - a PID loop from a temperature to a PWM output

use crate::board::tag::Tag;
use core::fmt;

/// One ADC channel.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalogInputRecord {
    pub tag: Tag,
    /// sysfs file that yields the raw reading.
    pub device_path: &'static str,
    /// Moving average length; 0 disables filtering.
    pub filter_length: u32,
}

/// Resistance/voltage to temperature conversion curve.
///
/// The curves themselves live in the temperature subsystem; records only
/// name which one to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThermistorCurve {
    /// EPCOS B57560G104F 100k thermistor (extruder).
    BoneEpcosB5760g104f,
    /// 330k bed thermistor.
    BoneBedThermistor330k,
}

impl fmt::Display for ThermistorCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoneEpcosB5760g104f => write!(f, "bone_epcos_b5760g104f"),
            Self::BoneBedThermistor330k => write!(f, "bone_bed_thermistor_330k"),
        }
    }
}

/// Temperature channel derived from an analog input.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureRecord {
    pub tag: Tag,
    /// Tag of the analog input providing the raw value.
    pub source: Tag,
    /// Milliseconds the reading must stay in range before it counts as stable.
    pub in_range_time: u32,
    pub conversion: ThermistorCurve,
}

/// One PWM output channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PwmOutputRecord {
    pub tag: Tag,
    pub device_path: &'static str,
    /// Frequency in Hz; 0 leaves the driver default (e.g. from the DT overlay).
    pub frequency: u32,
}

impl PwmOutputRecord {
    /// Split an `ehrpwm.N:C` style path into device and channel.
    ///
    /// Returns `None` for paths that do not name a channel of a two-channel
    /// device (e.g. device-tree helper nodes).
    pub fn channel_pair(&self) -> Option<(&'static str, u8)> {
        let (device, channel) = self.device_path.rsplit_once(':')?;
        let channel = channel.parse::<u8>().ok()?;
        Some((device, channel))
    }
}

/// PID and feed-forward settings for a heater.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidSettings {
    pub ff_factor: f64,
    pub ff_offset: f64,
    pub p: f64,
    pub i: f64,
    pub d: f64,
    /// Clamp for the integral term.
    pub i_limit: f64,
}

/// Closed-loop heater.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaterRecord {
    pub tag: Tag,
    /// Tag of the temperature channel.
    pub analog_input: Tag,
    /// Tag of the PWM output.
    pub analog_output: Tag,
    pub pid: PidSettings,
}
