//! Permission strings and their decomposition into policy-evaluation tokens.
//!
//! # Purpose
//! Defines the total token parser and the validated [`Permission`] value that
//! guards evaluate against the decision engine.
//!
//! # Key invariants
//! - Parsing is deterministic and never fails: any input yields at least one
//!   token, in input order, with no trimming or case folding.
//! - A [`Permission`] always holds two or more non-empty tokens; strings that
//!   parse to fewer are rejected when the guard is built, before any request
//!   can reach them.
use crate::errors::{GuardError, GuardResult};
use std::fmt;

/// Separator used when none is configured, matching the common
/// `resource:action` permission shape.
pub const DEFAULT_SEPARATOR: &str = ":";

/// Split a permission string on every occurrence of `separator`.
///
/// Total over all inputs: a string without the separator comes back as a
/// single-element sequence, and callers decide whether that is acceptable.
pub fn parse_tokens(permission: &str, separator: &str) -> Vec<String> {
    permission.split(separator).map(str::to_string).collect()
}

/// A permission requirement with its pre-computed evaluation tokens.
///
/// Tokens are computed once, at guard construction; the parser is pure, so a
/// per-request re-parse would produce the identical sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    raw: String,
    tokens: Vec<String>,
}

impl Permission {
    /// Parse and validate a permission string.
    ///
    /// # Errors
    /// - [`GuardError::MalformedPermission`] when the string contains fewer
    ///   than two tokens or any empty token (e.g. `"unknown"` or `"blog:"`
    ///   with the `":"` separator).
    pub fn parse(raw: &str, separator: &str) -> GuardResult<Self> {
        let tokens = parse_tokens(raw, separator);
        if tokens.len() < 2 || tokens.iter().any(String::is_empty) {
            return Err(GuardError::MalformedPermission {
                permission: raw.to_string(),
                separator: separator.to_string(),
            });
        }
        Ok(Self {
            raw: raw.to_string(),
            tokens,
        })
    }

    /// The original permission string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Evaluation tokens in parse order, ready to pass to the decision
    /// engine after the subject.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl std::str::FromStr for Permission {
    type Err = GuardError;

    fn from_str(value: &str) -> GuardResult<Self> {
        Self::parse(value, DEFAULT_SEPARATOR)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
