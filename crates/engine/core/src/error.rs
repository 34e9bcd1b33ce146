//! Hook fault types shared by every dispatcher.

use std::fmt;

use thiserror::Error;

use crate::env::OracleError;

/// Error raised by a hook body during dispatch.
///
/// Dispatchers recover from these locally: the failing hook is treated as a
/// no-op for its phase and the pipeline continues. The fault is reported in
/// the dispatch result for the host to log.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<OracleError> for HookError {
    fn from(err: OracleError) -> Self {
        Self::new(err.to_string())
    }
}

/// Record of a hook fault recovered during dispatch.
#[derive(Clone, Debug)]
pub struct FaultRecord {
    /// Name of the effect or trigger hook that failed.
    pub hook: String,
    /// Phase or event the hook was running under.
    pub during: String,
    pub error: HookError,
}

impl fmt::Display for FaultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} faulted during {}: {}", self.hook, self.during, self.error)
    }
}
