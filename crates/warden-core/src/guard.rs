//! Request-pipeline guards.
//!
//! # Purpose
//! Implements the tower middleware that evaluates one requirement per
//! request and either forwards to the inner service or writes the deny
//! response itself.
//!
//! # How it fits
//! [`Warden`](crate::Warden) builds a [`GuardLayer`] per protected route;
//! the layer wraps the route's service in a [`Guard`].
//!
//! # Key invariants
//! - Requirement items are evaluated eagerly in declaration order and
//!   short-circuit on the first decisive item; an engine error is never
//!   masked by continuing the scan.
//! - An empty requirement list allows the request before any subject
//!   resolution.
//! - Role guards fetch the subject's roles exactly once per request and test
//!   membership locally; permission guards call the engine once per item.
use crate::engine::DecisionEngine;
use crate::errors::EngineError;
use crate::options::ValidationRule;
use crate::outcome::Outcome;
use crate::permission::Permission;
use crate::warden::Shared;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// What a guard requires of the request's subject.
#[derive(Debug)]
pub(crate) enum Requirement {
    Permissions {
        permissions: Vec<Permission>,
        rule: ValidationRule,
    },
    Roles {
        roles: Vec<String>,
        rule: ValidationRule,
    },
    RouteIdentity,
}

impl Requirement {
    fn is_empty(&self) -> bool {
        match self {
            Requirement::Permissions { permissions, .. } => permissions.is_empty(),
            Requirement::Roles { roles, .. } => roles.is_empty(),
            Requirement::RouteIdentity => false,
        }
    }
}

/// Result of combining requirement items, before HTTP mapping.
enum Decision {
    Satisfied,
    NotSatisfied,
    Failed(EngineError),
}

pub(crate) struct GuardPolicy {
    shared: Arc<Shared>,
    requirement: Requirement,
}

impl GuardPolicy {
    async fn decide(&self, parts: &Parts) -> Outcome {
        // Vacuously satisfied: no subject lookup, no engine call.
        if self.requirement.is_empty() {
            return Outcome::Allow;
        }

        let subject = self.shared.resolver.subject(parts).await;
        if subject.is_empty() {
            return Outcome::Unauthenticated;
        }

        let decision = match &self.requirement {
            Requirement::Permissions { permissions, rule } => {
                permission_decision(self.shared.engine.as_ref(), &subject, permissions, *rule)
                    .await
            }
            Requirement::Roles { roles, rule } => {
                // One fetch per request regardless of how many roles are
                // required; membership is tested locally afterwards.
                match self.shared.engine.roles_of(&subject).await {
                    Ok(held) => {
                        if roles_satisfied(*rule, roles, &held) {
                            Decision::Satisfied
                        } else {
                            Decision::NotSatisfied
                        }
                    }
                    Err(err) => Decision::Failed(err),
                }
            }
            Requirement::RouteIdentity => {
                // Path before method: token order is part of the engine
                // contract.
                let tokens = [
                    parts.uri.path().to_string(),
                    parts.method.as_str().to_string(),
                ];
                match self.shared.engine.evaluate(&subject, &tokens).await {
                    Ok(true) => Decision::Satisfied,
                    Ok(false) => Decision::NotSatisfied,
                    Err(err) => Decision::Failed(err),
                }
            }
        };

        match decision {
            Decision::Satisfied => Outcome::Allow,
            Decision::NotSatisfied => {
                tracing::debug!(
                    subject = %subject,
                    path = %parts.uri.path(),
                    "requirement not satisfied"
                );
                Outcome::Forbidden
            }
            Decision::Failed(err) => Outcome::EngineFailure(err),
        }
    }
}

async fn permission_decision(
    engine: &dyn DecisionEngine,
    subject: &str,
    permissions: &[Permission],
    rule: ValidationRule,
) -> Decision {
    match rule {
        ValidationRule::MatchAll => {
            for permission in permissions {
                match engine.evaluate(subject, permission.tokens()).await {
                    Ok(true) => {}
                    Ok(false) => return Decision::NotSatisfied,
                    Err(err) => return Decision::Failed(err),
                }
            }
            Decision::Satisfied
        }
        ValidationRule::AtLeastOne => {
            for permission in permissions {
                match engine.evaluate(subject, permission.tokens()).await {
                    Ok(true) => return Decision::Satisfied,
                    Ok(false) => {}
                    Err(err) => return Decision::Failed(err),
                }
            }
            Decision::NotSatisfied
        }
    }
}

fn roles_satisfied(rule: ValidationRule, required: &[String], held: &[String]) -> bool {
    match rule {
        ValidationRule::MatchAll => required.iter().all(|role| held.contains(role)),
        ValidationRule::AtLeastOne => required.iter().any(|role| held.contains(role)),
    }
}

/// Layer form of a guard, attached to a protected route.
#[derive(Clone)]
pub struct GuardLayer {
    policy: Arc<GuardPolicy>,
}

impl std::fmt::Debug for GuardLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardLayer").finish_non_exhaustive()
    }
}

impl GuardLayer {
    pub(crate) fn new(shared: Arc<Shared>, requirement: Requirement) -> Self {
        Self {
            policy: Arc::new(GuardPolicy {
                shared,
                requirement,
            }),
        }
    }
}

impl<S> Layer<S> for GuardLayer {
    type Service = Guard<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Guard {
            inner,
            policy: self.policy.clone(),
        }
    }
}

/// Guard middleware wrapping one route's service.
///
/// On allow the request continues to the inner service unchanged; on any
/// deny outcome the guard writes the response itself and the inner service
/// is never called.
#[derive(Clone)]
pub struct Guard<S> {
    inner: S,
    policy: Arc<GuardPolicy>,
}

impl<S> Service<Request> for Guard<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let policy = self.policy.clone();
        // Take the service that was polled ready; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let (parts, body) = request.into_parts();
            match policy.decide(&parts).await {
                Outcome::Allow => inner.call(Request::from_parts(parts, body)).await,
                Outcome::Unauthenticated => Ok(policy.shared.on_unauthenticated.respond(&parts)),
                Outcome::Forbidden => Ok(policy.shared.on_forbidden.respond(&parts)),
                Outcome::EngineFailure(err) => {
                    // Log details server-side; the client sees a bare 500.
                    tracing::error!(
                        error = %err,
                        path = %parts.uri.path(),
                        "decision engine failed"
                    );
                    Ok(StatusCode::INTERNAL_SERVER_ERROR.into_response())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedEngine {
        script: Vec<Result<bool, &'static str>>,
        calls: AtomicUsize,
    }

    impl ScriptedEngine {
        fn new(script: Vec<Result<bool, &'static str>>) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DecisionEngine for ScriptedEngine {
        async fn evaluate(&self, _subject: &str, _tokens: &[String]) -> Result<bool, EngineError> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script[index] {
                Ok(allowed) => Ok(allowed),
                Err(message) => Err(EngineError::message(message)),
            }
        }

        async fn roles_of(&self, _subject: &str) -> Result<Vec<String>, EngineError> {
            Ok(Vec::new())
        }
    }

    fn permissions(raws: &[&str]) -> Vec<Permission> {
        raws.iter()
            .map(|raw| Permission::parse(raw, ":").expect("permission"))
            .collect()
    }

    #[tokio::test]
    async fn match_all_stops_at_first_false() {
        let engine = ScriptedEngine::new(vec![Ok(true), Ok(false), Ok(true)]);
        let perms = permissions(&["blog:create", "blog:update", "blog:delete"]);
        let decision =
            permission_decision(&engine, "alice", &perms, ValidationRule::MatchAll).await;
        assert!(matches!(decision, Decision::NotSatisfied));
        assert_eq!(engine.calls(), 2);
    }

    #[tokio::test]
    async fn match_all_stops_at_first_error() {
        let engine = ScriptedEngine::new(vec![Ok(true), Err("storage down"), Ok(true)]);
        let perms = permissions(&["blog:create", "blog:update", "blog:delete"]);
        let decision =
            permission_decision(&engine, "alice", &perms, ValidationRule::MatchAll).await;
        assert!(matches!(decision, Decision::Failed(_)));
        assert_eq!(engine.calls(), 2);
    }

    #[tokio::test]
    async fn match_all_passes_when_every_item_passes() {
        let engine = ScriptedEngine::new(vec![Ok(true), Ok(true)]);
        let perms = permissions(&["blog:create", "blog:update"]);
        let decision =
            permission_decision(&engine, "alice", &perms, ValidationRule::MatchAll).await;
        assert!(matches!(decision, Decision::Satisfied));
        assert_eq!(engine.calls(), 2);
    }

    #[tokio::test]
    async fn at_least_one_stops_at_first_true() {
        let engine = ScriptedEngine::new(vec![Ok(false), Ok(true), Ok(false)]);
        let perms = permissions(&["comment:create", "blog:create", "blog:update"]);
        let decision =
            permission_decision(&engine, "bob", &perms, ValidationRule::AtLeastOne).await;
        assert!(matches!(decision, Decision::Satisfied));
        assert_eq!(engine.calls(), 2);
    }

    #[tokio::test]
    async fn at_least_one_error_is_not_masked_by_later_match() {
        let engine = ScriptedEngine::new(vec![Ok(false), Err("storage down"), Ok(true)]);
        let perms = permissions(&["comment:create", "blog:create", "blog:update"]);
        let decision =
            permission_decision(&engine, "bob", &perms, ValidationRule::AtLeastOne).await;
        assert!(matches!(decision, Decision::Failed(_)));
        assert_eq!(engine.calls(), 2);
    }

    #[tokio::test]
    async fn at_least_one_exhausted_is_not_satisfied() {
        let engine = ScriptedEngine::new(vec![Ok(false), Ok(false)]);
        let perms = permissions(&["comment:create", "blog:create"]);
        let decision =
            permission_decision(&engine, "bob", &perms, ValidationRule::AtLeastOne).await;
        assert!(matches!(decision, Decision::NotSatisfied));
        assert_eq!(engine.calls(), 2);
    }

    #[test]
    fn roles_satisfied_match_all() {
        let held = vec!["user".to_string(), "admin".to_string()];
        let required = vec!["user".to_string(), "admin".to_string()];
        assert!(roles_satisfied(ValidationRule::MatchAll, &required, &held));

        let missing = vec!["user".to_string(), "auditor".to_string()];
        assert!(!roles_satisfied(ValidationRule::MatchAll, &missing, &held));
    }

    #[test]
    fn roles_satisfied_at_least_one() {
        let held = vec!["user".to_string()];
        let required = vec!["admin".to_string(), "user".to_string()];
        assert!(roles_satisfied(ValidationRule::AtLeastOne, &required, &held));

        let none = vec!["admin".to_string(), "auditor".to_string()];
        assert!(!roles_satisfied(ValidationRule::AtLeastOne, &none, &held));
    }

    #[test]
    fn empty_requirements_are_vacuously_empty() {
        let empty = Requirement::Permissions {
            permissions: Vec::new(),
            rule: ValidationRule::MatchAll,
        };
        assert!(empty.is_empty());
        assert!(
            Requirement::Roles {
                roles: Vec::new(),
                rule: ValidationRule::AtLeastOne,
            }
            .is_empty()
        );
        assert!(!Requirement::RouteIdentity.is_empty());
    }
}
