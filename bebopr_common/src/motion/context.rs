//! Mutable motion configuration owned by the planner.
//!
//! Holds the per-axis calibration positions and the E-axis coordinate mode.
//! Constructed once at startup and handed to the motion planner; mutation
//! goes through `&mut self`.

use crate::motion::axis::{Axis, AxisGeometry};
use serde::{Deserialize, Serialize};

/// Z calibration switch position at power up: 2.8 mm below table level.
pub const DEFAULT_Z_CAL_POS: f64 = -2.7955E-3;

/// Which end of the Z axis carries the calibration switch.
///
/// Only X, Y and Z have calibration switches. X and Y always calibrate
/// on their min switch; Z may be moved to the max side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZCalibrationSwitch {
    /// Z calibrates on its min switch; no max switch position is defined.
    #[default]
    Min,
    /// Z calibrates on its max switch; its min switch is a plain limit.
    Max,
}

/// Motion configuration context.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionConfig {
    geometry: AxisGeometry,
    z_calibration: ZCalibrationSwitch,
    /// Calibration positions for X, Y, Z in meters.
    cal_pos: [f64; 3],
    e_axis_relative: bool,
}

impl MotionConfig {
    pub fn new(geometry: AxisGeometry, z_calibration: ZCalibrationSwitch) -> Self {
        Self {
            geometry,
            z_calibration,
            cal_pos: [0.0, 0.0, DEFAULT_Z_CAL_POS],
            e_axis_relative: false,
        }
    }

    /// Constant axis table.
    pub fn geometry(&self) -> &AxisGeometry {
        &self.geometry
    }

    pub fn z_calibration(&self) -> ZCalibrationSwitch {
        self.z_calibration
    }

    fn cal_index(axis: Axis) -> Option<usize> {
        match axis {
            Axis::X => Some(0),
            Axis::Y => Some(1),
            Axis::Z => Some(2),
            _ => None,
        }
    }

    /// Store the calibration position of a switch.
    ///
    /// Returns `false` (and changes nothing) for axes without a calibration
    /// switch. The last write wins.
    pub fn set_calibration_position(&mut self, axis: Axis, pos: f64) -> bool {
        match Self::cal_index(axis) {
            Some(idx) => {
                self.cal_pos[idx] = pos;
                true
            }
            None => false,
        }
    }

    /// Position of the min switch when it is a calibration switch.
    pub fn config_min_switch_pos(&self, axis: Axis) -> Option<f64> {
        if axis == Axis::Z && self.z_calibration == ZCalibrationSwitch::Max {
            return None;
        }
        Self::cal_index(axis).map(|idx| self.cal_pos[idx])
    }

    /// Position of the max switch when it is a calibration switch.
    pub fn config_max_switch_pos(&self, axis: Axis) -> Option<f64> {
        match (axis, self.z_calibration) {
            (Axis::Z, ZCalibrationSwitch::Max) => Some(self.cal_pos[2]),
            _ => None,
        }
    }

    /// Switch the E axis between relative-only and absolute coordinates.
    ///
    /// Returns the previous setting so callers can restore it.
    pub fn set_e_axis_relative_mode(&mut self, relative: bool) -> bool {
        std::mem::replace(&mut self.e_axis_relative, relative)
    }

    /// True when the E axis is fed relative coordinates only.
    pub fn e_axis_is_always_relative(&self) -> bool {
        self.e_axis_relative
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::new(AxisGeometry::default(), ZCalibrationSwitch::default())
    }
}
