//! # BeBoPr Board Core
//!
//! Startup and shutdown hooks for the BeBoPr cape:
//!
//! - **pre_init**: check the kernel against the configured hardware, hand
//!   the analog, temperature, PWM and heater tables to the subsystems and
//!   read the stepper driver personality
//! - **post_init**: switch the I/O power on
//! - **exit**: switch the I/O power off
//!
//! ```rust,no_run
//! use bebopr_board::{init_tracing, BoardCore};
//! use std::path::Path;
//!
//! # fn run(subsystems: &mut dyn bebopr_common::board::subsystem::Subsystems)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! let config = BoardCore::load_config(Path::new("/etc/bebopr/board.toml"))?;
//! init_tracing(config.shared.log_level);
//!
//! let mut core = BoardCore::new(config)?;
//! let store = core.stepper_store();
//! core.pre_init(subsystems, &store)?;
//!
//! let mut gpio = core.sysfs_gpio();
//! core.post_init(&mut gpio);
//! // ... run ...
//! core.exit(&mut gpio);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod gpio;
pub mod power;

pub use crate::core::BoardCore;
pub use gpio::{Direction, GpioError, GpioOp, GpioPort, SysfsGpio};
pub use power::{GpioFailure, PowerSequencer, SequenceReport};

use bebopr_common::config::LogLevel;

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` overrides `level` when set. A subscriber that is already
/// installed is left in place.
pub fn init_tracing(level: LogLevel) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_line_number(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
