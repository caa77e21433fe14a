//! Hardware variant selection.
//!
//! Supported hardware configurations:
//!
//! ```text
//!          +-----+-----------+----------+-----+-----------+----------+
//!          |      BeagleBone (white)    |      BeagleBone Black      |
//! +--------+     +-----------+----------+     +-----------+----------+
//! | kernel |     | ENA_PATCH |  BRIDGE  |     | ENA_PATCH |  BRIDGE  |
//! +--------+-----+-----------+----------+-----+-----------+----------+
//! |  3.2   |  X        X          -        -        -          -     |
//! +--------+---------------------------------------------------------+
//! |  3.8   |  X        X          X        -        X          X     |
//! +--------+---------------------------------------------------------+
//! ```
//!
//! The variant is resolved once at startup from `board.toml` and passed
//! around as a single `BoardVariant` value.

use crate::board::error::PreInitError;
use crate::consts::{GPIO_IO_PWR_ON, GPIO_IO_PWR_ON_N, GPIO_IO_PWR_ON_N_PATCHED};
use crate::kernel::{KernelGeneration, KernelInfo};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Board revision and cape modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum HardwareVariant {
    /// Original BeagleBone with an unmodified BeBoPr.
    #[default]
    Bone = 0,
    /// BeagleBone with the enable patch applied to the BeBoPr.
    BoneEnablePatch = 1,
    /// BeagleBone with the Bridge daughterboard.
    BoneBridge = 2,
    /// BeagleBone Black (needs the enable patch or a Bridge).
    BoneBlack = 3,
}

impl HardwareVariant {
    /// Suffix used in diagnostics, e.g. `BeBoPr+Bridge`.
    pub const fn options_label(&self) -> &'static str {
        match self {
            Self::Bone => "",
            Self::BoneEnablePatch => "+EnablePatch",
            Self::BoneBridge => "+Bridge",
            Self::BoneBlack => "+Black",
        }
    }

    /// True when I/O power is switched by the single `!IO_PWR_ON` line.
    pub const fn has_single_enable_line(&self) -> bool {
        !matches!(self, Self::Bone)
    }

    /// GPIO lines that switch the I/O power, in assertion order.
    pub fn power_lines(&self) -> Vec<PowerLine> {
        if self.has_single_enable_line() {
            vec![PowerLine::active_low(GPIO_IO_PWR_ON_N_PATCHED)]
        } else {
            vec![
                PowerLine::active_high(GPIO_IO_PWR_ON),
                PowerLine::active_low(GPIO_IO_PWR_ON_N),
            ]
        }
    }
}

impl fmt::Display for HardwareVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BeBoPr{}", self.options_label())
    }
}

/// Machine the tables are built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BuildFlavor {
    /// Extruder and heated bed: three analog, three PWM, two heaters.
    #[default]
    Printer,
    /// Single laser power PWM, no temperatures or heaters.
    LaserCutter,
}

/// Where the thermistor voltages are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdcSource {
    /// On-chip AM335x ADC (touchscreen or IIO driver depending on kernel).
    #[default]
    Internal,
    /// External ADS1x15 on I2C bus 1, address 0x48.
    Ads1x15,
}

/// One I/O power enable line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PowerLine {
    /// Kernel GPIO number.
    pub gpio: u32,
    /// Level that switches power on.
    pub active_high: bool,
}

impl PowerLine {
    pub const fn active_high(gpio: u32) -> Self {
        Self {
            gpio,
            active_high: true,
        }
    }

    pub const fn active_low(gpio: u32) -> Self {
        Self {
            gpio,
            active_high: false,
        }
    }

    /// Level written by power-on.
    #[inline]
    pub const fn on_level(&self) -> bool {
        self.active_high
    }

    /// Level written by power-off.
    #[inline]
    pub const fn off_level(&self) -> bool {
        !self.active_high
    }
}

/// Fully resolved board selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BoardVariant {
    #[serde(default)]
    pub hardware: HardwareVariant,
    #[serde(default)]
    pub flavor: BuildFlavor,
    #[serde(default)]
    pub adc: AdcSource,
}

impl BoardVariant {
    pub const fn new(hardware: HardwareVariant, flavor: BuildFlavor, adc: AdcSource) -> Self {
        Self {
            hardware,
            flavor,
            adc,
        }
    }

    /// Check this variant against the detected kernel.
    ///
    /// # Errors
    /// - `UnsupportedKernel` if the kernel generation is unknown
    /// - `UnsupportedCombination` if the hardware needs a device-tree kernel
    ///   but runs on the legacy one
    pub fn check_kernel(&self, kernel: &KernelInfo) -> Result<(), PreInitError> {
        if kernel.generation == KernelGeneration::Unknown {
            return Err(PreInitError::UnsupportedKernel {
                options: self.hardware.options_label().to_string(),
                release: kernel.release_or_unknown().to_string(),
            });
        }

        if kernel.generation.is_legacy() {
            let reason = match (self.hardware, self.adc) {
                (HardwareVariant::BoneBridge, _) => {
                    Some("the Bridge is only supported with a device-tree kernel (3.8+)")
                }
                (HardwareVariant::BoneBlack, _) => {
                    Some("the BeagleBone Black requires a device-tree kernel (3.8+)")
                }
                (_, AdcSource::Ads1x15) => Some("the ADS1x15 driver requires a 3.8 kernel"),
                _ => None,
            };
            if let Some(reason) = reason {
                return Err(PreInitError::UnsupportedCombination {
                    hardware: self.hardware,
                    kernel: kernel.generation,
                    reason,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kernel(release: Option<&str>) -> KernelInfo {
        KernelInfo::from_release(release.map(str::to_string))
    }

    #[test]
    fn unknown_kernel_rejected_for_every_variant() {
        for hw in [
            HardwareVariant::Bone,
            HardwareVariant::BoneEnablePatch,
            HardwareVariant::BoneBridge,
            HardwareVariant::BoneBlack,
        ] {
            let v = BoardVariant::new(hw, BuildFlavor::Printer, AdcSource::Internal);
            assert!(matches!(
                v.check_kernel(&kernel(None)),
                Err(PreInitError::UnsupportedKernel { .. })
            ));
        }
    }

    #[test]
    fn bridge_needs_device_tree() {
        let v = BoardVariant::new(
            HardwareVariant::BoneBridge,
            BuildFlavor::Printer,
            AdcSource::Internal,
        );
        assert!(matches!(
            v.check_kernel(&kernel(Some("3.2.34"))),
            Err(PreInitError::UnsupportedCombination {
                hardware: HardwareVariant::BoneBridge,
                kernel: KernelGeneration::Legacy32,
                ..
            })
        ));
        assert!(v.check_kernel(&kernel(Some("3.8.13"))).is_ok());
        assert!(v.check_kernel(&kernel(Some("4.14.108"))).is_ok());
    }

    #[test]
    fn black_and_ads1x15_need_device_tree() {
        let black = BoardVariant::new(
            HardwareVariant::BoneBlack,
            BuildFlavor::Printer,
            AdcSource::Internal,
        );
        assert!(black.check_kernel(&kernel(Some("3.2.0"))).is_err());

        let ads = BoardVariant::new(HardwareVariant::Bone, BuildFlavor::Printer, AdcSource::Ads1x15);
        assert!(ads.check_kernel(&kernel(Some("3.2.0"))).is_err());
        assert!(ads.check_kernel(&kernel(Some("3.8.13"))).is_ok());
    }

    #[test]
    fn stock_and_patch_run_on_legacy() {
        for hw in [HardwareVariant::Bone, HardwareVariant::BoneEnablePatch] {
            let v = BoardVariant::new(hw, BuildFlavor::LaserCutter, AdcSource::Internal);
            assert!(v.check_kernel(&kernel(Some("3.2.34"))).is_ok());
        }
    }

    #[test]
    fn power_lines_by_variant() {
        let stock = HardwareVariant::Bone.power_lines();
        assert_eq!(stock.len(), 2);
        assert_eq!(stock[0], PowerLine::active_high(38));
        assert_eq!(stock[1], PowerLine::active_low(34));

        for hw in [
            HardwareVariant::BoneEnablePatch,
            HardwareVariant::BoneBridge,
            HardwareVariant::BoneBlack,
        ] {
            assert_eq!(hw.power_lines(), vec![PowerLine::active_low(66)]);
        }
    }

    #[test]
    fn power_line_levels() {
        let line = PowerLine::active_low(66);
        assert!(!line.on_level());
        assert!(line.off_level());
        let line = PowerLine::active_high(38);
        assert!(line.on_level());
        assert!(!line.off_level());
    }

    #[test]
    fn display_labels() {
        assert_eq!(HardwareVariant::Bone.to_string(), "BeBoPr");
        assert_eq!(HardwareVariant::BoneBridge.to_string(), "BeBoPr+Bridge");
    }

    #[test]
    fn deserialize_variant() {
        let v: BoardVariant =
            toml::from_str("hardware = \"bone_black\"\nflavor = \"laser_cutter\"").unwrap();
        assert_eq!(v.hardware, HardwareVariant::BoneBlack);
        assert_eq!(v.flavor, BuildFlavor::LaserCutter);
        assert_eq!(v.adc, AdcSource::Internal);
    }
}
