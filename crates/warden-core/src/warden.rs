//! Guard factory and configuration.
//!
//! # Purpose
//! Assembles the subject resolver, decision engine, and deny handlers into
//! one immutable factory, then hands out guards bound to that wiring.
//!
//! # Key invariants
//! - Configuration is frozen at `build()`; guards and in-flight requests
//!   share it read-only, so no locking is needed anywhere.
//! - Missing resolver or engine is a construction error, not a panic: the
//!   embedding application decides how to shut down.
use crate::engine::DecisionEngine;
use crate::errors::{GuardError, GuardResult};
use crate::guard::{GuardLayer, Requirement};
use crate::options::{GuardOptions, ValidationRule};
use crate::outcome::{DenyHandler, StatusHandler};
use crate::permission::Permission;
use crate::resolver::SubjectResolver;
use axum::http::StatusCode;
use std::sync::Arc;

/// Immutable wiring shared by every guard built from one [`Warden`].
pub(crate) struct Shared {
    pub(crate) resolver: Arc<dyn SubjectResolver>,
    pub(crate) engine: Arc<dyn DecisionEngine>,
    pub(crate) on_unauthenticated: Arc<dyn DenyHandler>,
    pub(crate) on_forbidden: Arc<dyn DenyHandler>,
}

/// Guard factory bound to one subject resolver and decision engine.
///
/// Cloning is cheap; clones share the same configuration. One `Warden` is
/// typically built at startup and used to guard any number of routes.
#[derive(Clone)]
pub struct Warden {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Warden {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Warden").finish_non_exhaustive()
    }
}

impl Warden {
    pub fn builder() -> WardenBuilder {
        WardenBuilder::new()
    }

    /// Build a guard requiring the listed permissions under default options
    /// (every permission must match, `":"` separator).
    ///
    /// # Errors
    /// - [`GuardError::MalformedPermission`] if any permission string does
    ///   not split into at least two non-empty tokens. Validation happens
    ///   here so a bad declaration surfaces at wiring time, never mid-request.
    pub fn requires_permissions<I, P>(&self, permissions: I) -> GuardResult<GuardLayer>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.requires_permissions_with(permissions, GuardOptions::default())
    }

    /// Build a permission guard with explicit options.
    pub fn requires_permissions_with<I, P>(
        &self,
        permissions: I,
        options: GuardOptions,
    ) -> GuardResult<GuardLayer>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let permissions = permissions
            .into_iter()
            .map(|raw| Permission::parse(&raw.into(), options.separator()))
            .collect::<GuardResult<Vec<_>>>()?;
        Ok(GuardLayer::new(
            self.shared.clone(),
            Requirement::Permissions {
                permissions,
                rule: options.rule(),
            },
        ))
    }

    /// Build a guard requiring the listed roles under the default rule
    /// (every role must be held).
    ///
    /// Role names need no parsing, so role guards cannot fail construction.
    pub fn requires_roles<I, R>(&self, roles: I) -> GuardLayer
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        self.requires_roles_with(roles, ValidationRule::default())
    }

    /// Build a role guard with an explicit combination rule.
    pub fn requires_roles_with<I, R>(&self, roles: I, rule: ValidationRule) -> GuardLayer
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        let roles = roles.into_iter().map(Into::into).collect();
        GuardLayer::new(self.shared.clone(), Requirement::Roles { roles, rule })
    }

    /// Build a guard that treats the request's own path and method as the
    /// required permission pair, evaluated as `(subject, path, method)`.
    ///
    /// This couples policy rules to URL shape; keeping policy resource
    /// identifiers in sync with actual route paths is the caller's job.
    pub fn route_guard(&self) -> GuardLayer {
        GuardLayer::new(self.shared.clone(), Requirement::RouteIdentity)
    }
}

/// Builder for [`Warden`].
pub struct WardenBuilder {
    resolver: Option<Arc<dyn SubjectResolver>>,
    engine: Option<Arc<dyn DecisionEngine>>,
    on_unauthenticated: Arc<dyn DenyHandler>,
    on_forbidden: Arc<dyn DenyHandler>,
}

impl WardenBuilder {
    fn new() -> Self {
        Self {
            resolver: None,
            engine: None,
            on_unauthenticated: Arc::new(StatusHandler(StatusCode::UNAUTHORIZED)),
            on_forbidden: Arc::new(StatusHandler(StatusCode::FORBIDDEN)),
        }
    }

    pub fn subject_resolver(mut self, resolver: impl SubjectResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn decision_engine(mut self, engine: impl DecisionEngine + 'static) -> Self {
        self.engine = Some(Arc::new(engine));
        self
    }

    /// Override the response written when no subject can be resolved.
    pub fn on_unauthenticated(mut self, handler: impl DenyHandler + 'static) -> Self {
        self.on_unauthenticated = Arc::new(handler);
        self
    }

    /// Override the response written when evaluation denies the subject.
    pub fn on_forbidden(mut self, handler: impl DenyHandler + 'static) -> Self {
        self.on_forbidden = Arc::new(handler);
        self
    }

    /// Freeze the configuration.
    ///
    /// # Errors
    /// - [`GuardError::MissingSubjectResolver`] or
    ///   [`GuardError::MissingDecisionEngine`]: neither capability has a safe
    ///   default, so wiring fails fast instead of degrading into an open
    ///   gate.
    pub fn build(self) -> GuardResult<Warden> {
        let resolver = self.resolver.ok_or(GuardError::MissingSubjectResolver)?;
        let engine = self.engine.ok_or(GuardError::MissingDecisionEngine)?;
        Ok(Warden {
            shared: Arc::new(Shared {
                resolver,
                engine,
                on_unauthenticated: self.on_unauthenticated,
                on_forbidden: self.on_forbidden,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use async_trait::async_trait;
    use axum::http::request::Parts;

    struct DenyAll;

    #[async_trait]
    impl DecisionEngine for DenyAll {
        async fn evaluate(&self, _subject: &str, _tokens: &[String]) -> Result<bool, EngineError> {
            Ok(false)
        }

        async fn roles_of(&self, _subject: &str) -> Result<Vec<String>, EngineError> {
            Ok(Vec::new())
        }
    }

    fn anonymous(_: &Parts) -> String {
        String::new()
    }

    #[test]
    fn build_requires_subject_resolver() {
        let err = Warden::builder()
            .decision_engine(DenyAll)
            .build()
            .expect_err("missing resolver");
        assert!(matches!(err, GuardError::MissingSubjectResolver));
    }

    #[test]
    fn build_requires_decision_engine() {
        let err = Warden::builder()
            .subject_resolver(anonymous)
            .build()
            .expect_err("missing engine");
        assert!(matches!(err, GuardError::MissingDecisionEngine));
    }

    #[test]
    fn malformed_permission_fails_guard_construction() {
        let warden = Warden::builder()
            .subject_resolver(anonymous)
            .decision_engine(DenyAll)
            .build()
            .expect("warden");
        let err = warden
            .requires_permissions(["unknown"])
            .expect_err("no separator");
        assert!(matches!(
            err,
            GuardError::MalformedPermission { permission, .. } if permission == "unknown"
        ));
    }

    #[test]
    fn one_warden_builds_all_guard_shapes() {
        let warden = Warden::builder()
            .subject_resolver(anonymous)
            .decision_engine(DenyAll)
            .build()
            .expect("warden");
        let _permissions = warden
            .requires_permissions(["blog:create", "blog:update"])
            .expect("permission guard");
        let _roles = warden.requires_roles_with(["admin"], ValidationRule::AtLeastOne);
        let _route = warden.route_guard();
        let _clone = warden.clone();
    }
}
