use thiserror::Error;

/// Errors raised while wiring a [`Warden`](crate::Warden) or building a guard.
///
/// These are construction-time failures: they surface before any request is
/// evaluated, so the embedding application decides whether to abort startup
/// or recover.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("a subject resolver is required")]
    MissingSubjectResolver,
    #[error("a decision engine is required")]
    MissingDecisionEngine,
    #[error("malformed permission {permission:?}: expected at least two non-empty tokens separated by {separator:?}")]
    MalformedPermission {
        permission: String,
        separator: String,
    },
}

pub type GuardResult<T> = Result<T, GuardError>;

/// Failure reported by a [`DecisionEngine`](crate::DecisionEngine) call.
///
/// Distinct from a "not allowed" evaluation: an `EngineError` means the
/// engine could not produce a decision at all, and maps to an internal-error
/// response rather than a 403.
#[derive(Debug, Error)]
#[error("decision engine failure: {source}")]
pub struct EngineError {
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl EngineError {
    /// Wrap an engine's own error type.
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Build an error from a plain message, for engines without a structured
    /// error type.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            source: message.into().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_error_display_variants() {
        let errors = vec![
            GuardError::MissingSubjectResolver,
            GuardError::MissingDecisionEngine,
            GuardError::MalformedPermission {
                permission: "unknown".to_string(),
                separator: ":".to_string(),
            },
        ];

        for error in errors {
            let rendered = error.to_string();
            assert!(!rendered.is_empty());
        }
    }

    #[test]
    fn malformed_permission_names_the_input() {
        let error = GuardError::MalformedPermission {
            permission: "unknown".to_string(),
            separator: ":".to_string(),
        };
        assert!(error.to_string().contains("unknown"));
    }

    #[test]
    fn engine_error_wraps_source_and_message() {
        let io = std::io::Error::other("policy store unreachable");
        let wrapped = EngineError::new(io);
        assert!(wrapped.to_string().contains("policy store unreachable"));

        let plain = EngineError::message("bad request shape");
        assert!(plain.to_string().contains("bad request shape"));
    }
}
