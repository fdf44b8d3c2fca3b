//! Casbin-backed decision engine for Warden guards.
//!
//! # Purpose
//! Adapts a Casbin enforcer to the [`warden_core::DecisionEngine`] contract
//! and embeds the two request models Warden's guard shapes expect: the
//! permission form (`sub, obj, act`) and the route form (path/method with
//! `keyMatch2` patterns).
//!
//! # How it fits
//! The embedding application builds an `Enforcer` from whatever policy
//! storage it uses, wraps it in [`CasbinEngine`], and hands that to
//! `Warden::builder()`. Policy semantics stay entirely inside Casbin.
//!
//! # Examples
//! ```rust,no_run
//! use casbin::{CoreApi, Enforcer, MemoryAdapter};
//! use warden_casbin::{CasbinEngine, permission_model};
//!
//! # async fn build() -> casbin::Result<()> {
//! let enforcer = Enforcer::new(permission_model().await, MemoryAdapter::default()).await?;
//! let engine = CasbinEngine::new(enforcer);
//! # let _ = engine;
//! # Ok(())
//! # }
//! ```
mod engine;
mod model;

pub use engine::CasbinEngine;
pub use model::{permission_model, permission_model_string, route_model, route_model_string};
