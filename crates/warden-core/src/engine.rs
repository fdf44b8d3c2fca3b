//! Decision engine contract.
//!
//! # Purpose
//! The policy-evaluation capability Warden consumes but does not implement.
//! An engine answers yes/no for a subject plus an ordered token sequence and
//! can list the roles a subject holds.
//!
//! # Key invariants
//! - `evaluate` arguments are order-sensitive: subject first, then tokens in
//!   parse order. Engines must not reorder them.
//! - Guards never pass an empty subject; unauthenticated requests are
//!   rejected before the engine is consulted.
use crate::errors::EngineError;
use async_trait::async_trait;

/// Policy evaluation backend consumed by guards.
///
/// Implementations must be cheap to share (`Send + Sync`) across concurrent
/// requests. Errors are surfaced as an internal-error outcome, distinct from
/// a "not allowed" decision, so operators can tell a broken engine apart
/// from a deny.
#[async_trait]
pub trait DecisionEngine: Send + Sync {
    /// Decide whether `subject` may perform the action described by
    /// `tokens`.
    async fn evaluate(&self, subject: &str, tokens: &[String]) -> Result<bool, EngineError>;

    /// List the roles held by `subject`.
    ///
    /// Role guards call this once per request and test membership locally,
    /// rather than calling `evaluate` once per required role.
    async fn roles_of(&self, subject: &str) -> Result<Vec<String>, EngineError>;
}
