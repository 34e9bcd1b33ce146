//! Errors raised when a required host collaborator is missing.

use thiserror::Error;

/// A dispatcher needed an oracle the host did not provide.
///
/// These indicate host misconfiguration, not gameplay outcomes, and are the
/// only way a resolution pipeline aborts outright.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("dice oracle not available in environment")]
    DiceNotAvailable,

    #[error("message sink not available in environment")]
    MessagesNotAvailable,

    #[error("scene sink not available in environment")]
    SceneNotAvailable,

    #[error("rules tables not available in environment")]
    TablesNotAvailable,
}
