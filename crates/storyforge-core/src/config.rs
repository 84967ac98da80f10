//! Process-wide runtime configuration.
//!
//! Feature flags and the readiness policy are plain values handed to the
//! preparer at construction time; nothing here is read lazily from ambient
//! global state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StoryError;

/// Environment variable that toggles targeted argument routing.
pub const ARG_TYPE_TARGETS_ENV: &str = "STORYFORGE_ARG_TYPE_TARGETS";

/// Global feature-flag bag supplied by the runtime layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFlags {
    /// Route arguments into per-target buckets based on their argType target.
    pub arg_type_targets: bool,
}

impl FeatureFlags {
    /// Reads feature flags from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Config` if a flag variable holds an unrecognised
    /// value.
    pub fn from_env() -> Result<Self, StoryError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads feature flags through an arbitrary key lookup. Unset keys keep
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Config` if a flag holds an unrecognised value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut flags = Self::default();
        if let Some(raw) = lookup(ARG_TYPE_TARGETS_ENV) {
            flags.arg_type_targets = parse_flag(ARG_TYPE_TARGETS_ENV, &raw)?;
        }
        Ok(flags)
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, StoryError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(StoryError::Config(format!(
            "{key} must be one of true|false|1|0, got {other:?}"
        ))),
    }
}

/// Bounded poll schedule used while waiting for a render target to populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    /// Maximum number of content checks before giving up.
    pub max_attempts: u32,
    /// Base time unit multiplied by the triangular number of each attempt.
    pub unit: Duration,
}

impl ReadinessPolicy {
    /// The attempt ceiling used by default.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

    /// Returns the delay that follows failed attempt `attempt` (1-based):
    /// `unit * attempt * (attempt + 1) / 2`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let triangular = u64::from(attempt) * (u64::from(attempt) + 1) / 2;
        self.unit
            .saturating_mul(u32::try_from(triangular).unwrap_or(u32::MAX))
    }
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            unit: Duration::from_millis(1),
        }
    }
}
