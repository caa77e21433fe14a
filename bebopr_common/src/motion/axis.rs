//! Per-axis geometry and kinematic limits.
//!
//! Every accessor is total over [`Axis`]: X, Y, Z and E return the machine
//! constants, any other axis returns a neutral value (`0.0`, `false` or
//! `None`). Nothing here performs I/O or fails.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Machine axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
    /// Extruder.
    E = 3,
    #[default]
    Undefined = 0xFF,
}

impl Axis {
    /// The configured axes.
    pub const ALL: [Axis; 4] = [Axis::X, Axis::Y, Axis::Z, Axis::E];

    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::X,
            1 => Self::Y,
            2 => Self::Z,
            3 => Self::E,
            _ => Self::Undefined,
        }
    }

    /// True for the linear axes that carry limit switches.
    #[inline]
    pub const fn is_cartesian(&self) -> bool {
        matches!(self, Self::X | Self::Y | Self::Z)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
            Self::E => write!(f, "E"),
            Self::Undefined => write!(f, "?"),
        }
    }
}

/// Mechanical build the step sizes are computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepProfile {
    /// Prusa Mendel.
    ///
    /// ```text
    /// X: 1:8  stepping, 0.9° motor, 16t pulley @ 3mm pitch => 0.015 mm
    /// Y: 1:8  stepping, 0.9° motor, 8t pulley @ 5mm pitch  => 0.0125 mm
    /// Z: 1:32 stepping, 1.8° motor, 1.25mm/rev             => 0.0001953125 mm
    /// E: 1:8  stepping, 1.8° motor, 11:39 reduction        => 0.003345 mm
    /// ```
    #[default]
    Prusa,
    /// Bench test rig.
    ///
    /// ```text
    /// X: 1:8 stepping, 1.8° motor, 8t pulley @ 5mm pitch => 0.0125 mm
    /// Y: 1:8 stepping, 1.8° motor, 8t pulley @ 5mm pitch => 0.0125 mm
    /// Z: 1:8 stepping, 1.8° motor, 1.25mm/rev            => 0.0007812 mm
    /// E: 1:8 stepping, 1.8° motor, 11:39 reduction       => 0.00335 mm
    /// ```
    TestRig,
}

/// Compiled-in axis table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisGeometry {
    profile: StepProfile,
}

impl AxisGeometry {
    pub const fn new(profile: StepProfile) -> Self {
        Self { profile }
    }

    pub const fn profile(&self) -> StepProfile {
        self.profile
    }

    /// Step size in meters.
    pub const fn step_size(&self, axis: Axis) -> f64 {
        match (self.profile, axis) {
            (StepProfile::Prusa, Axis::X) => 15.0E-6,
            (StepProfile::Prusa, Axis::Y) => 12.5E-6,
            (StepProfile::Prusa, Axis::Z) => 195.3125E-9,
            (StepProfile::Prusa, Axis::E) => 3.345E-6,
            (StepProfile::TestRig, Axis::X) => 12.5E-6,
            (StepProfile::TestRig, Axis::Y) => 12.5E-6,
            (StepProfile::TestRig, Axis::Z) => 0.7812E-6,
            (StepProfile::TestRig, Axis::E) => 3.35E-6,
            (_, Axis::Undefined) => 0.0,
        }
    }

    /// Maximum feed in mm/min.
    pub const fn max_feed(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => 22500.0, // 0.00625 mm/step @ 60 kHz
            Axis::Y => 16000.0, // 0.00625 mm/step @ 53 kHz
            Axis::Z => 300.0,   // 0.00039 mm/step @ 13 kHz
            Axis::E => 3000.0,  // 0.00198 mm/step @ 25 kHz
            Axis::Undefined => 0.0,
        }
    }

    /// Maximum acceleration in m/s².
    pub const fn max_accel(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => 3.0,
            Axis::Y | Axis::Z | Axis::E => 1.0,
            Axis::Undefined => 0.0,
        }
    }

    /// Axes that need an inverted stepper direction signal.
    pub const fn reverse_axis(&self, axis: Axis) -> bool {
        matches!(axis, Axis::X | Axis::E)
    }

    pub const fn has_min_limit_switch(&self, axis: Axis) -> bool {
        axis.is_cartesian()
    }

    pub const fn has_max_limit_switch(&self, axis: Axis) -> bool {
        matches!(axis, Axis::Z)
    }

    /// Limit switch polarity.
    ///
    /// The inputs are inverted on the board: LED on reads 1. A switch whose
    /// LED turns off when it is activated is active low.
    pub const fn min_limit_switch_is_active_low(&self, axis: Axis) -> bool {
        matches!(axis, Axis::X | Axis::Y)
    }

    pub const fn max_limit_switch_is_active_low(&self, axis: Axis) -> bool {
        matches!(axis, Axis::Z)
    }

    /// Lower travel boundary in mm, if the axis has one.
    pub const fn min_soft_limit(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::X | Axis::Y | Axis::Z => Some(0.0),
            _ => None,
        }
    }

    /// Upper travel boundary in mm, if the axis has one.
    pub const fn max_soft_limit(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::X => Some(215.0),
            Axis::Y => Some(200.0),
            Axis::Z => Some(60.0),
            _ => None,
        }
    }

    /// Feed in mm/min used to move off the home switch.
    pub const fn home_release_feed(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X | Axis::Y | Axis::Z => 150.0,
            _ => 0.0,
        }
    }

    /// Maximum feed in mm/min while seeking the home switch.
    pub const fn home_max_feed(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X | Axis::Y => 3000.0,
            Axis::Z => 450.0,
            _ => 0.0,
        }
    }

    /// Character sent as keep-alive to the host.
    ///
    /// Pronterface and Repsnapper both ignore a bare newline.
    pub const fn keep_alive_char(&self) -> char {
        '\n'
    }
}
