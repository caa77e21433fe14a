//! Board-wide constants for the BeBoPr workspace.
//!
//! Single source of truth for GPIO numbers, sysfs locations and default
//! paths. Imported by all crates.

use static_assertions::const_assert;

/// Canonical service name (used for logging).
pub const BOARD_SERVICE_NAME: &str = "bebopr";

/// Default board configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/bebopr/board.toml";

/// Default sysfs GPIO control directory.
pub const DEFAULT_GPIO_ROOT: &str = "/sys/class/gpio";

/// Default stepper marker file. Holds the bare marker ("TB6560" or "Pololu"),
/// not the raw cape EEPROM image.
pub const DEFAULT_STEPPER_CONFIG_PATH: &str = "/etc/bebopr/stepper_drivers";

// ─── I/O power enable lines ─────────────────────────────────────────

/// `!IO_PWR_ON` on modified boards (Enable Patch / Bridge): R7 / GPIO2[2] / TIMER4.
pub const GPIO_IO_PWR_ON_N_PATCHED: u32 = 66;

/// `IO_PWR_ON` on stock boards: R9 / GPIO1[6] / gpmc_ad6.
pub const GPIO_IO_PWR_ON: u32 = 38;

/// `!IO_PWR_ON` on stock boards: R8 / GPIO1[2] / gpmc_ad2.
pub const GPIO_IO_PWR_ON_N: u32 = 34;

const_assert!(GPIO_IO_PWR_ON != GPIO_IO_PWR_ON_N);
const_assert!(GPIO_IO_PWR_ON_N_PATCHED != GPIO_IO_PWR_ON);
const_assert!(GPIO_IO_PWR_ON_N_PATCHED != GPIO_IO_PWR_ON_N);

// ─── Kernel release prefixes ────────────────────────────────────────

/// Release prefix of the legacy (non device-tree) kernel.
pub const KERNEL_PREFIX_LEGACY: &str = "3.2";

/// Release prefix of the device-tree kernel.
pub const KERNEL_PREFIX_DEVICE_TREE: &str = "3.8";

// ─── Stepper I/O configuration ──────────────────────────────────────

/// Marker stored in the EEPROM for TB6560 based driver boards.
pub const STEPPER_MARKER_TB6560: &str = "TB6560";

/// Marker stored in the EEPROM for Pololu driver carriers.
pub const STEPPER_MARKER_POLOLU: &str = "Pololu";

// ─── Analog inputs ──────────────────────────────────────────────────

/// Full-scale reading of the AM335x touchscreen ADC.
pub const AIN_SCALE_TSC: u32 = 1800;

/// Full-scale reading of the ADS1x15 in millivolts.
pub const AIN_SCALE_ADS1X15: u32 = 2048;

/// Time a temperature must stay within range before it is reported stable (ms).
pub const TEMP_IN_RANGE_TIME_MS: u32 = 15_000;
