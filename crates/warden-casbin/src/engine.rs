use async_trait::async_trait;
use casbin::{CoreApi, Enforcer, RbacApi};
use std::sync::Arc;
use tokio::sync::RwLock;
use warden_core::{DecisionEngine, EngineError};

/// Decision engine backed by a Casbin enforcer.
///
/// Evaluation passes the subject followed by the guard's tokens straight
/// through as the Casbin request values, so the enforcer's model decides what
/// each token means. Cloning shares the underlying enforcer.
#[derive(Clone)]
pub struct CasbinEngine {
    enforcer: Arc<RwLock<Enforcer>>,
}

impl CasbinEngine {
    pub fn new(enforcer: Enforcer) -> Self {
        Self {
            enforcer: Arc::new(RwLock::new(enforcer)),
        }
    }

    /// Wrap an enforcer the application also manages elsewhere, e.g. for
    /// policy reloads or admin APIs.
    pub fn shared(enforcer: Arc<RwLock<Enforcer>>) -> Self {
        Self { enforcer }
    }

    /// Handle to the underlying enforcer.
    pub fn enforcer(&self) -> Arc<RwLock<Enforcer>> {
        self.enforcer.clone()
    }
}

#[async_trait]
impl DecisionEngine for CasbinEngine {
    async fn evaluate(&self, subject: &str, tokens: &[String]) -> Result<bool, EngineError> {
        let mut rvals = Vec::with_capacity(tokens.len() + 1);
        rvals.push(subject.to_string());
        rvals.extend(tokens.iter().cloned());
        let enforcer = self.enforcer.read().await;
        enforcer.enforce(rvals).map_err(EngineError::new)
    }

    async fn roles_of(&self, subject: &str) -> Result<Vec<String>, EngineError> {
        // The role-manager API wants a mutable receiver.
        let mut enforcer = self.enforcer.write().await;
        Ok(enforcer.get_roles_for_user(subject, None))
    }
}
