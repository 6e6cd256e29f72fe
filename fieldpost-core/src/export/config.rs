#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

/// Configuration for an export pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Config {
    /// Process batches on the rayon thread pool.
    pub parallel: bool,
    /// Fail the pass if any computed quantity is NaN or infinite.
    pub require_finite: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parallel: true,
            require_finite: false,
        }
    }
}
