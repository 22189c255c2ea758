//! Reduction configuration

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use polycrate_core::{DegenerateAxisPolicy, Error, Result};
use serde::{Deserialize, Serialize};

/// Shared flag for cooperatively cancelling a running reduction.
///
/// Clones share the same flag; the nearest-point scans poll it once per
/// floater vertex and stop with [`Error::Cancelled`] once it is set.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Configuration for [`reduce`](crate::reduce)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReductionConfig {
    /// How zero-extent axes are handled when normalizing into the floater's box
    pub degenerate_axis: DegenerateAxisPolicy,
    /// Run the nearest-point scans on the rayon thread pool
    pub parallel: bool,
    /// Optional cancellation flag polled during the nearest-point scans
    #[serde(skip)]
    pub cancel: Option<CancelFlag>,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            degenerate_axis: DegenerateAxisPolicy::Identity,
            parallel: true,
            cancel: None,
        }
    }
}

impl ReductionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(degenerate_axis: DegenerateAxisPolicy, parallel: bool) -> Self {
        Self {
            degenerate_axis,
            parallel,
            cancel: None,
        }
    }

    pub fn with_degenerate_axis(mut self, policy: DegenerateAxisPolicy) -> Self {
        self.degenerate_axis = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub(crate) fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}
