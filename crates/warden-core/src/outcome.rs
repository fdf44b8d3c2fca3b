//! Terminal outcomes of a guard evaluation and their HTTP mapping.
//!
//! # Purpose
//! Names the four dispositions a guard can reach and holds the handler
//! contract for the two overridable ones. Engine failures deliberately have
//! no override: details are logged server-side and the client sees a bare
//! 500, so internals never leak into responses.
use crate::errors::EngineError;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

/// Disposition of one guard evaluation. Every variant except `Allow` stops
/// the pipeline; no partial authorization state reaches inner handlers.
#[derive(Debug)]
pub enum Outcome {
    /// Requirement satisfied; hand the request to the inner service.
    Allow,
    /// No subject could be resolved. Default response: empty 401.
    Unauthenticated,
    /// Evaluation completed without authorizing the subject. Default
    /// response: empty 403.
    Forbidden,
    /// The decision engine failed to evaluate. Always an empty 500.
    EngineFailure(EngineError),
}

/// Writes the response for an overridable deny outcome.
pub trait DenyHandler: Send + Sync {
    fn respond(&self, parts: &Parts) -> Response;
}

/// Closures over request parts are handlers, mirroring the resolver
/// convenience.
impl<F> DenyHandler for F
where
    F: Fn(&Parts) -> Response + Send + Sync,
{
    fn respond(&self, parts: &Parts) -> Response {
        self(parts)
    }
}

/// Default handler: the bare status code with an empty body.
pub(crate) struct StatusHandler(pub StatusCode);

impl DenyHandler for StatusHandler {
    fn respond(&self, _parts: &Parts) -> Response {
        self.0.into_response()
    }
}
