//! Engine configuration and validation.

use thiserror::Error;

use crate::env::CombatParams;

/// Errors raised when a configuration or parameter struct fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("attack die must have at least 2 sides, got {0}")]
    InvalidDieSides(u32),

    #[error("invalid value for {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Tunable engine parameters, loaded from TOML by the content crate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub combat: CombatParams,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that every field sits inside its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sides = self.combat.hit.die_sides;
        if !(2..=100).contains(&sides) {
            return Err(ConfigError::InvalidDieSides(sides));
        }
        Ok(())
    }
}
