//! Pre-initialisation error types.

use crate::board::subsystem::{ConfigStage, SubsystemError};
use crate::board::variant::HardwareVariant;
use crate::kernel::KernelGeneration;
use thiserror::Error;

/// Fatal conditions raised while bringing the board configuration up.
///
/// Every variant aborts startup; there are no retries.
#[derive(Debug, Clone, Error)]
pub enum PreInitError {
    /// The kernel release could not be determined.
    #[error("BeBoPr{options} is not compatible with running on kernel version {release}")]
    UnsupportedKernel { options: String, release: String },

    /// The configured hardware cannot run on the detected kernel.
    #[error("{hardware} is not supported on kernel {kernel}: {reason}")]
    UnsupportedCombination {
        hardware: HardwareVariant,
        kernel: KernelGeneration,
        reason: &'static str,
    },

    /// A collaborating subsystem rejected its table.
    #[error("{stage} failed: {source}")]
    ConfigRejected {
        stage: ConfigStage,
        #[source]
        source: SubsystemError,
    },
}

impl PreInitError {
    /// The rejected stage, for `ConfigRejected` errors.
    pub fn stage(&self) -> Option<ConfigStage> {
        match self {
            Self::ConfigRejected { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
