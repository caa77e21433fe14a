//! Kernel generation detection.
//!
//! The running kernel decides how peripherals are exposed: the legacy 3.2
//! kernel needs GPIO lines exported by hand and serves the ADC through the
//! touchscreen driver, the 3.8 device-tree kernel does neither. Detection
//! happens once per process; the answer is cached and never re-evaluated.

use crate::consts::{KERNEL_PREFIX_DEVICE_TREE, KERNEL_PREFIX_LEGACY};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Kernel generation classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum KernelGeneration {
    /// Release string could not be read.
    #[default]
    Unknown = 0,
    /// 3.2 kernel without device-tree support.
    Legacy32 = 1,
    /// 3.8 device-tree kernel.
    DeviceTree38 = 2,
    /// Any other release.
    Other = 3,
}

impl KernelGeneration {
    /// Classify a release string by prefix.
    ///
    /// `None` means the query failed.
    pub fn classify(release: Option<&str>) -> Self {
        match release {
            None => Self::Unknown,
            Some(r) if r.starts_with(KERNEL_PREFIX_LEGACY) => Self::Legacy32,
            Some(r) if r.starts_with(KERNEL_PREFIX_DEVICE_TREE) => Self::DeviceTree38,
            Some(_) => Self::Other,
        }
    }

    /// True when GPIO lines must be exported and configured manually.
    #[inline]
    pub const fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy32)
    }

    /// Generation whose peripheral layout applies. Newer kernels keep the
    /// device-tree layout of 3.8.
    pub const fn layout(&self) -> Self {
        match self {
            Self::Other => Self::DeviceTree38,
            other => *other,
        }
    }
}

impl fmt::Display for KernelGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Legacy32 => write!(f, "3.2"),
            Self::DeviceTree38 => write!(f, "3.8"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Detected kernel: generation plus the raw release string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KernelInfo {
    pub generation: KernelGeneration,
    /// Empty when the query failed.
    pub release: String,
}

impl KernelInfo {
    /// Build from the outcome of a release query.
    pub fn from_release(release: Option<String>) -> Self {
        let generation = KernelGeneration::classify(release.as_deref());
        Self {
            generation,
            release: release.unwrap_or_default(),
        }
    }

    /// Release string for diagnostics.
    pub fn release_or_unknown(&self) -> &str {
        if self.release.is_empty() {
            "<unknown>"
        } else {
            &self.release
        }
    }
}

/// Write-once cache for the detected kernel.
///
/// The first `get_or_detect` stores the result; every later call
/// returns it without running the query again.
#[derive(Debug, Default)]
pub struct KernelCache {
    cell: OnceLock<KernelInfo>,
}

impl KernelCache {
    /// Create an empty cache.
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Return the cached kernel, running `query` on first use only.
    pub fn get_or_detect<F>(&self, query: F) -> &KernelInfo
    where
        F: FnOnce() -> Option<String>,
    {
        self.cell.get_or_init(|| {
            let info = KernelInfo::from_release(query());
            debug!(
                "Kernel detected: generation={}, release={}",
                info.generation,
                info.release_or_unknown()
            );
            info
        })
    }

    /// Cached value, if detection already ran.
    pub fn get(&self) -> Option<&KernelInfo> {
        self.cell.get()
    }
}

static PROCESS_KERNEL: KernelCache = KernelCache::new();

/// Release string reported by `uname(2)`, `None` on failure.
fn query_release() -> Option<String> {
    match nix::sys::utsname::uname() {
        Ok(uts) => Some(uts.release().to_string_lossy().into_owned()),
        Err(e) => {
            warn!("uname failed: {e}");
            None
        }
    }
}

/// Kernel of the running process, detected on first call.
pub fn kernel_info() -> &'static KernelInfo {
    PROCESS_KERNEL.get_or_detect(query_release)
}

/// Kernel generation of the running process.
pub fn get_kernel_type() -> KernelGeneration {
    kernel_info().generation
}
