//! Engine configuration.

use std::str::FromStr;

use serde::Deserialize;

/// How the engine treats a requested position outside the target column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionPolicy {
    /// Clamp into `0..=len`: negative means head, past the end means tail.
    #[default]
    Clamp,
    /// Reject out-of-range requests with a validation error.
    Strict,
}

/// Error returned when parsing an unknown [`PositionPolicy`] name.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown position policy '{0}' (expected 'clamp' or 'strict')")]
pub struct ParsePolicyError(String);

impl FromStr for PositionPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "strict" => Ok(Self::Strict),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

impl std::fmt::Display for PositionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clamp => write!(f, "clamp"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Tunables for [`crate::Board`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Out-of-range position handling for moves.
    pub position_policy: PositionPolicy,
}

impl BoardConfig {
    /// Returns a config using the given position policy.
    #[must_use]
    pub const fn with_position_policy(mut self, policy: PositionPolicy) -> Self {
        self.position_policy = policy;
        self
    }
}
