//! Identity tags for configuration records.
//!
//! A `Tag` names one logical signal (a thermistor input, a heater, a PWM
//! channel). Tables and collaborators link records to each other through
//! tags. Equality is variant identity: two tags are the same only when they
//! are the same variant, never because their names happen to print alike.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

// ─── TagKind ────────────────────────────────────────────────────────

/// Which table a tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TagKind {
    AnalogInput = 0,
    Temperature = 1,
    PwmOutput = 2,
    Heater = 3,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnalogInput => write!(f, "analog input"),
            Self::Temperature => write!(f, "temperature"),
            Self::PwmOutput => write!(f, "pwm output"),
            Self::Heater => write!(f, "heater"),
        }
    }
}

// ─── Tag ────────────────────────────────────────────────────────────

/// Logical channel name.
///
/// The set is closed: every signal the board tables can describe has a
/// variant here. Laser-cutter builds use `PwmLaserPower`; printer builds
/// use the temperature, heater and remaining PWM tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    // ── Analog inputs ───────────────
    BedThermistor,
    ExtruderThermistor,
    SpareAin,

    // ── Temperatures ────────────────
    TempExtruder,
    TempBed,

    // ── Heaters ─────────────────────
    HeaterExtruder,
    HeaterBed,

    // ── PWM outputs ─────────────────
    PwmExtruder,
    PwmBed,
    PwmFan,
    PwmLaserPower,
}

impl Tag {
    /// Every tag, in declaration order.
    pub const ALL: [Tag; 11] = [
        Tag::BedThermistor,
        Tag::ExtruderThermistor,
        Tag::SpareAin,
        Tag::TempExtruder,
        Tag::TempBed,
        Tag::HeaterExtruder,
        Tag::HeaterBed,
        Tag::PwmExtruder,
        Tag::PwmBed,
        Tag::PwmFan,
        Tag::PwmLaserPower,
    ];

    /// The table this tag is allowed to key.
    pub const fn kind(&self) -> TagKind {
        match self {
            Self::BedThermistor | Self::ExtruderThermistor | Self::SpareAin => TagKind::AnalogInput,
            Self::TempExtruder | Self::TempBed => TagKind::Temperature,
            Self::HeaterExtruder | Self::HeaterBed => TagKind::Heater,
            Self::PwmExtruder | Self::PwmBed | Self::PwmFan | Self::PwmLaserPower => {
                TagKind::PwmOutput
            }
        }
    }

    /// Name used in diagnostics and configuration files.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BedThermistor => "bed_thermistor",
            Self::ExtruderThermistor => "extruder_thermistor",
            Self::SpareAin => "spare_ain",
            Self::TempExtruder => "temp_extruder",
            Self::TempBed => "temp_bed",
            Self::HeaterExtruder => "heater_extruder",
            Self::HeaterBed => "heater_bed",
            Self::PwmExtruder => "pwm_extruder",
            Self::PwmBed => "pwm_bed",
            Self::PwmFan => "pwm_fan",
            Self::PwmLaserPower => "pwm_laser_power",
        }
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("unknown tag: {s:?}"))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
