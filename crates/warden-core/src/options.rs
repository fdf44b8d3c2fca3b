//! Guard construction options.
//!
//! # Purpose
//! Carries the combination rule and permission separator a guard is built
//! with. Options are applied through a pure builder and frozen once the
//! guard exists; nothing here is shared or mutated across guards.
use crate::permission::DEFAULT_SEPARATOR;
use serde::{Deserialize, Serialize};

/// How a list of requirement outcomes combines into one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationRule {
    /// Every requirement must pass.
    #[default]
    MatchAll,
    /// At least one requirement must pass.
    AtLeastOne,
}

/// Options applied when building a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOptions {
    rule: ValidationRule,
    separator: String,
}

impl Default for GuardOptions {
    fn default() -> Self {
        Self {
            rule: ValidationRule::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl GuardOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn rule(&self) -> ValidationRule {
        self.rule
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}
