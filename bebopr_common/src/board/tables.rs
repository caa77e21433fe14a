//! Static configuration tables.
//!
//! Which device paths end up in the tables is decided by the board variant:
//! the ADC source and hardware select the analog paths, the hardware selects
//! the PWM paths, and the build flavor selects the table shape (printer with
//! two heaters, or laser cutter with a single power PWM).
//!
//! ADC inputs:
//!
//! ```text
//!   signal   conn.  tsc    bridge   ads1015
//!    THRM0   J6     AIN1    AIN4     ain1
//!    THRM1   J7     AIN3    AIN5     ain0
//!    THRM2   J8     AIN5    AIN6     ain2
//! ```
//!
//! THRM0 is the bed thermistor, THRM1 the spare input, THRM2 the extruder.

use crate::board::records::{
    AnalogInputRecord, HeaterRecord, PidSettings, PwmOutputRecord, TemperatureRecord,
    ThermistorCurve,
};
use crate::board::tag::{Tag, TagKind};
use crate::board::variant::{AdcSource, BoardVariant, BuildFlavor, HardwareVariant};
use crate::consts::{AIN_SCALE_ADS1X15, AIN_SCALE_TSC, TEMP_IN_RANGE_TIME_MS};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Inconsistency found in a set of tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The same tag keys two records.
    #[error("duplicate tag '{0}'")]
    DuplicateTag(Tag),

    /// A record is keyed by a tag of the wrong kind.
    #[error("tag '{tag}' is a {actual} tag, expected {expected}")]
    WrongKind {
        tag: Tag,
        expected: TagKind,
        actual: TagKind,
    },

    /// A record refers to a tag that no earlier table defines.
    #[error("'{from}' refers to undefined {kind} '{to}'")]
    DanglingReference { from: Tag, to: Tag, kind: TagKind },

    /// Two channels of one PWM device ask for different frequencies.
    #[error("pwm device {device}: channel {channel} frequency {frequency} Hz conflicts with {dictated} Hz")]
    PwmFrequencyConflict {
        device: &'static str,
        channel: u8,
        frequency: u32,
        dictated: u32,
    },
}

// ─── Device locations ───────────────────────────────────────────────

/// sysfs files for the bed, extruder and spare thermistor inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalogChannels {
    pub bed: &'static str,
    pub extruder: &'static str,
    pub spare: &'static str,
    /// Full-scale reading of the source.
    pub scale: u32,
}

impl AnalogChannels {
    /// Resolve the analog input files for a variant.
    ///
    /// Dedicated ADS1x15 readings are in mV. The original BeagleBone uses the
    /// touchscreen driver; Bridge and Black use the IIO driver with
    /// different channel numbers.
    pub const fn for_variant(variant: &BoardVariant) -> Self {
        match (variant.adc, variant.hardware) {
            (AdcSource::Ads1x15, _) => Self {
                bed: "/sys/bus/i2c/drivers/ads1015/1-0048/in5_input",
                extruder: "/sys/bus/i2c/drivers/ads1015/1-0048/in6_input",
                spare: "/sys/bus/i2c/drivers/ads1015/1-0048/in4_input",
                scale: AIN_SCALE_ADS1X15,
            },
            (AdcSource::Internal, HardwareVariant::Bone | HardwareVariant::BoneEnablePatch) => {
                Self {
                    bed: "/sys/devices/platform/omap/tsc/ain2",
                    extruder: "/sys/devices/platform/omap/tsc/ain6",
                    spare: "/sys/devices/platform/omap/tsc/ain4",
                    scale: AIN_SCALE_TSC,
                }
            }
            (AdcSource::Internal, HardwareVariant::BoneBridge) => Self {
                bed: "/sys/bus/iio/devices/iio:device0/in_voltage4_raw",
                extruder: "/sys/bus/iio/devices/iio:device0/in_voltage5_raw",
                spare: "/sys/bus/iio/devices/iio:device0/in_voltage6_raw",
                scale: AIN_SCALE_TSC,
            },
            (AdcSource::Internal, HardwareVariant::BoneBlack) => Self {
                bed: "/sys/bus/iio/devices/iio:device0/in_voltage1_raw",
                extruder: "/sys/bus/iio/devices/iio:device0/in_voltage5_raw",
                spare: "/sys/bus/iio/devices/iio:device0/in_voltage3_raw",
                scale: AIN_SCALE_TSC,
            },
        }
    }
}

/// One PWM connector: sysfs path and frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmChannel {
    pub path: &'static str,
    pub frequency: u32,
}

/// PWM connectors J2 (PWM0), J3 (PWM1) and J4 (PWM2).
///
/// A frequency of 0 keeps the driver default. The B channel of an ehrpwm
/// device cannot differ from its A channel, so PWM0 (`ehrpwm.2:1`) takes
/// whatever PWM1 (`ehrpwm.2:0`) sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmChannels {
    pub pwm0: PwmChannel,
    pub pwm1: PwmChannel,
    pub pwm2: PwmChannel,
}

impl PwmChannels {
    pub const fn for_hardware(hardware: HardwareVariant) -> Self {
        match hardware {
            // TODO: replace the placeholder ocp helper names once the Black overlay is finalised.
            HardwareVariant::BoneBlack => Self {
                pwm0: PwmChannel {
                    path: "/sys/devices/ocp.2/bebopr_pwm_J2.fixme",
                    frequency: 0,
                },
                pwm1: PwmChannel {
                    path: "/sys/devices/ocp.2/bebopr_pwm_J3.fixme",
                    frequency: 0,
                },
                pwm2: PwmChannel {
                    path: "/sys/devices/ocp.2/bebopr_pwm_J4.fixme",
                    frequency: 0,
                },
            },
            _ => Self {
                pwm0: PwmChannel {
                    path: "/sys/class/pwm/ehrpwm.2:1",
                    frequency: 0,
                },
                pwm1: PwmChannel {
                    path: "/sys/class/pwm/ehrpwm.2:0",
                    frequency: 400,
                },
                pwm2: PwmChannel {
                    path: "/sys/class/pwm/ehrpwm.1:0",
                    frequency: 1,
                },
            },
        }
    }
}

// ─── Tables ─────────────────────────────────────────────────────────

/// The four tables handed to the external subsystems.
///
/// Built once at startup and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTables {
    pub analog: Vec<AnalogInputRecord>,
    pub temperature: Vec<TemperatureRecord>,
    pub pwm: Vec<PwmOutputRecord>,
    pub heater: Vec<HeaterRecord>,
    /// Full-scale reading of the analog source.
    pub analog_scale: u32,
}

impl ConfigTables {
    /// Build the tables for a board variant.
    pub fn for_variant(variant: &BoardVariant) -> Self {
        let ain = AnalogChannels::for_variant(variant);
        let pwm = PwmChannels::for_hardware(variant.hardware);

        let analog = vec![
            AnalogInputRecord {
                tag: Tag::BedThermistor,
                device_path: ain.bed, // J6 - THRM0
                filter_length: 0,
            },
            AnalogInputRecord {
                tag: Tag::SpareAin,
                device_path: ain.spare, // J7 - THRM1
                filter_length: 10,
            },
            AnalogInputRecord {
                tag: Tag::ExtruderThermistor,
                device_path: ain.extruder, // J8 - THRM2
                filter_length: 0,
            },
        ];

        match variant.flavor {
            BuildFlavor::LaserCutter => Self {
                analog,
                temperature: Vec::new(),
                pwm: vec![PwmOutputRecord {
                    tag: Tag::PwmLaserPower,
                    device_path: pwm.pwm1.path, // J3 - PWM1
                    frequency: pwm.pwm1.frequency,
                }],
                heater: Vec::new(),
                analog_scale: ain.scale,
            },
            BuildFlavor::Printer => Self {
                analog,
                temperature: vec![
                    TemperatureRecord {
                        tag: Tag::TempExtruder,
                        source: Tag::ExtruderThermistor,
                        in_range_time: TEMP_IN_RANGE_TIME_MS,
                        conversion: ThermistorCurve::BoneEpcosB5760g104f,
                    },
                    TemperatureRecord {
                        tag: Tag::TempBed,
                        source: Tag::BedThermistor,
                        in_range_time: TEMP_IN_RANGE_TIME_MS,
                        conversion: ThermistorCurve::BoneBedThermistor330k,
                    },
                ],
                pwm: vec![
                    PwmOutputRecord {
                        tag: Tag::PwmExtruder,
                        device_path: pwm.pwm1.path, // J3 - PWM1
                        frequency: pwm.pwm1.frequency,
                    },
                    PwmOutputRecord {
                        tag: Tag::PwmFan,
                        device_path: pwm.pwm0.path, // J2 - PWM0
                        frequency: pwm.pwm0.frequency,
                    },
                    PwmOutputRecord {
                        tag: Tag::PwmBed,
                        device_path: pwm.pwm2.path, // J4 - PWM2
                        frequency: pwm.pwm2.frequency,
                    },
                ],
                heater: vec![
                    HeaterRecord {
                        tag: Tag::HeaterExtruder,
                        analog_input: Tag::TempExtruder,
                        analog_output: Tag::PwmExtruder,
                        pid: PidSettings {
                            ff_factor: 0.33,
                            ff_offset: 40.0,
                            p: 15.0,
                            i: 0.0,
                            d: 0.0,
                            i_limit: 10.0,
                        },
                    },
                    HeaterRecord {
                        tag: Tag::HeaterBed,
                        analog_input: Tag::TempBed,
                        analog_output: Tag::PwmBed,
                        pid: PidSettings {
                            ff_factor: 1.03,
                            ff_offset: 29.0,
                            p: 25.0,
                            i: 0.05,
                            d: 0.0,
                            i_limit: 80.0,
                        },
                    },
                ],
                analog_scale: ain.scale,
            },
        }
    }

    /// Look up an analog input record by tag.
    pub fn analog_input(&self, tag: Tag) -> Option<&AnalogInputRecord> {
        self.analog.iter().find(|r| r.tag == tag)
    }

    /// Look up a temperature record by tag.
    pub fn temperature(&self, tag: Tag) -> Option<&TemperatureRecord> {
        self.temperature.iter().find(|r| r.tag == tag)
    }

    /// Look up a PWM output record by tag.
    pub fn pwm_output(&self, tag: Tag) -> Option<&PwmOutputRecord> {
        self.pwm.iter().find(|r| r.tag == tag)
    }

    /// Look up a heater record by tag.
    pub fn heater(&self, tag: Tag) -> Option<&HeaterRecord> {
        self.heater.iter().find(|r| r.tag == tag)
    }

    /// Check the tables for internal consistency.
    ///
    /// # Validation Rules
    /// 1. Every tag keys at most one record across all tables
    /// 2. Each table is keyed by tags of its own kind
    /// 3. Temperature sources name analog inputs
    /// 4. Heater inputs name temperatures, heater outputs name PWM outputs
    /// 5. Two channels of one PWM device do not ask for different non-zero
    ///    frequencies; the lowest channel dictates
    pub fn validate(&self) -> Result<(), TableError> {
        let mut seen = HashSet::new();
        let keys = self
            .analog
            .iter()
            .map(|r| (r.tag, TagKind::AnalogInput))
            .chain(self.temperature.iter().map(|r| (r.tag, TagKind::Temperature)))
            .chain(self.pwm.iter().map(|r| (r.tag, TagKind::PwmOutput)))
            .chain(self.heater.iter().map(|r| (r.tag, TagKind::Heater)));

        for (tag, expected) in keys {
            if tag.kind() != expected {
                return Err(TableError::WrongKind {
                    tag,
                    expected,
                    actual: tag.kind(),
                });
            }
            if !seen.insert(tag) {
                return Err(TableError::DuplicateTag(tag));
            }
        }

        for temp in &self.temperature {
            if self.analog_input(temp.source).is_none() {
                return Err(TableError::DanglingReference {
                    from: temp.tag,
                    to: temp.source,
                    kind: TagKind::AnalogInput,
                });
            }
        }

        for heater in &self.heater {
            if self.temperature(heater.analog_input).is_none() {
                return Err(TableError::DanglingReference {
                    from: heater.tag,
                    to: heater.analog_input,
                    kind: TagKind::Temperature,
                });
            }
            if self.pwm_output(heater.analog_output).is_none() {
                return Err(TableError::DanglingReference {
                    from: heater.tag,
                    to: heater.analog_output,
                    kind: TagKind::PwmOutput,
                });
            }
        }

        self.validate_pwm_pairs()
    }

    fn validate_pwm_pairs(&self) -> Result<(), TableError> {
        let mut devices: HashMap<&'static str, Vec<(u8, u32)>> = HashMap::new();
        for rec in &self.pwm {
            if let Some((device, channel)) = rec.channel_pair() {
                devices
                    .entry(device)
                    .or_default()
                    .push((channel, rec.frequency));
            }
        }

        for (device, mut channels) in devices {
            channels.sort_by_key(|(channel, _)| *channel);
            let Some(&(_, dictated)) = channels.first() else {
                continue;
            };
            for &(channel, frequency) in &channels[1..] {
                if frequency != 0 && frequency != dictated {
                    return Err(TableError::PwmFrequencyConflict {
                        device,
                        channel,
                        frequency,
                        dictated,
                    });
                }
            }
        }
        Ok(())
    }
}
