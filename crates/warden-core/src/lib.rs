//! Authorization guards for axum request pipelines.
//!
//! # Purpose
//! Decides, per request, whether a resolved subject satisfies a permission
//! or role requirement before the request reaches business logic. The policy
//! engine, policy storage, and subject identification stay outside: Warden
//! consumes them through the [`DecisionEngine`] and [`SubjectResolver`]
//! contracts.
//!
//! # How it fits
//! The embedding application wires a [`Warden`] at startup and attaches one
//! guard per protected route. Each guard is a tower layer: on allow the
//! request continues down the pipeline, on deny the guard writes the
//! response itself (401 unauthenticated, 403 forbidden, 500 engine failure).
//!
//! # Key invariants
//! - Permission strings are validated when the guard is built; a string that
//!   does not split into at least two non-empty tokens never reaches a
//!   request.
//! - Requirement lists evaluate eagerly in declaration order and
//!   short-circuit; engine errors are never masked by a later match.
//! - Configuration and guards are immutable after construction and safe to
//!   share across any number of in-flight requests.
//!
//! # Examples
//! ```rust
//! use axum::{Router, routing::post};
//! use warden_core::{DecisionEngine, EngineError, Warden};
//!
//! struct AllowList;
//!
//! #[async_trait::async_trait]
//! impl DecisionEngine for AllowList {
//!     async fn evaluate(&self, subject: &str, tokens: &[String]) -> Result<bool, EngineError> {
//!         let [resource, action] = tokens else {
//!             return Err(EngineError::message("expected resource and action"));
//!         };
//!         Ok(subject == "alice" && resource == "blog" && action == "create")
//!     }
//!
//!     async fn roles_of(&self, _subject: &str) -> Result<Vec<String>, EngineError> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! fn subject_header(parts: &axum::http::request::Parts) -> String {
//!     parts
//!         .headers
//!         .get("x-subject")
//!         .and_then(|value| value.to_str().ok())
//!         .unwrap_or_default()
//!         .to_string()
//! }
//!
//! # fn main() -> Result<(), warden_core::GuardError> {
//! let warden = Warden::builder()
//!     .subject_resolver(subject_header)
//!     .decision_engine(AllowList)
//!     .build()?;
//!
//! let app: Router = Router::new()
//!     .route("/blog", post(|| async { "created" }))
//!     .route_layer(warden.requires_permissions(["blog:create"])?);
//! # let _ = app;
//! # Ok(())
//! # }
//! ```
//!
//! # Common pitfalls
//! - Returning a non-empty placeholder subject from a resolver turns
//!   unauthenticated requests into engine evaluations; the empty string is
//!   the unauthenticated sentinel.
//! - Route guards couple policy objects to URL shape; renaming a route
//!   without updating policy silently forbids it.

mod engine;
mod errors;
mod guard;
mod options;
mod outcome;
mod permission;
mod resolver;
mod warden;

pub use engine::DecisionEngine;
pub use errors::{EngineError, GuardError, GuardResult};
pub use guard::{Guard, GuardLayer};
pub use options::{GuardOptions, ValidationRule};
pub use outcome::{DenyHandler, Outcome};
pub use permission::{DEFAULT_SEPARATOR, Permission, parse_tokens};
pub use resolver::SubjectResolver;
pub use warden::{Warden, WardenBuilder};
