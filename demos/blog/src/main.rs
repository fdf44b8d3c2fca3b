//! Warden demo: a small blog API guarded by Casbin-backed policies.
//!
//! # Purpose
//! Shows all three guard shapes wired onto a real axum service: permission
//! guards on the blog/comment endpoints, a role guard on the admin endpoint,
//! and a route-identity guard on the reports endpoint.
//!
//! # High-level flow
//! 1. Read config from `WARDEN_DEMO_BIND` (default `127.0.0.1:8080`).
//! 2. Build two in-memory Casbin enforcers: one for `resource:action`
//!    permissions and roles, one keyed on request path/method.
//! 3. Wire a `Warden` per enforcer and attach guards per route.
//! 4. Serve until ctrl-c.
//!
//! # Trying it
//! The subject comes from the `x-subject` header; the demo trusts it as-is,
//! real deployments resolve identity from authenticated request material.
//!
//! ```text
//! curl -X POST -H 'x-subject: alice' http://127.0.0.1:8080/blog   # 200
//! curl -X POST -H 'x-subject: bob'   http://127.0.0.1:8080/blog   # 403
//! curl -X POST                       http://127.0.0.1:8080/blog   # 401
//! ```
use anyhow::{Context, Result};
use axum::extract::Path;
use axum::http::request::Parts;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use casbin::{CoreApi, Enforcer, MemoryAdapter, MgmtApi};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use warden_casbin::{CasbinEngine, permission_model, route_model};
use warden_core::{GuardOptions, ValidationRule, Warden};

#[derive(Debug, Clone)]
struct DemoConfig {
    bind_addr: SocketAddr,
}

impl DemoConfig {
    fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("WARDEN_DEMO_BIND")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .with_context(|| "parse WARDEN_DEMO_BIND")?;
        Ok(Self { bind_addr })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn header_subject(parts: &Parts) -> String {
    parts
        .headers
        .get("x-subject")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn create_blog() -> Json<Value> {
    Json(json!({ "status": "created" }))
}

async fn update_blog(Path(id): Path<u64>) -> Json<Value> {
    Json(json!({ "status": "updated", "id": id }))
}

async fn create_comment() -> Json<Value> {
    Json(json!({ "status": "commented" }))
}

async fn admin_stats() -> Json<Value> {
    Json(json!({ "posts": 2, "comments": 5 }))
}

async fn reports() -> Json<Value> {
    Json(json!({ "reports": [] }))
}

async fn permission_enforcer() -> Result<Enforcer> {
    let mut enforcer = Enforcer::new(permission_model().await, MemoryAdapter::default()).await?;

    let policies = [
        ["alice", "blog", "create"],
        ["alice", "blog", "update"],
        ["bob", "comment", "create"],
    ];
    for policy in policies {
        enforcer
            .add_policy(policy.iter().map(|s| s.to_string()).collect())
            .await?;
    }

    let groupings = [["alice", "user"], ["alice", "admin"], ["bob", "user"]];
    for grouping in groupings {
        enforcer
            .add_grouping_policy(grouping.iter().map(|s| s.to_string()).collect())
            .await?;
    }

    enforcer.build_role_links()?;
    Ok(enforcer)
}

async fn route_enforcer() -> Result<Enforcer> {
    let mut enforcer = Enforcer::new(route_model().await, MemoryAdapter::default()).await?;
    enforcer
        .add_policy(vec![
            "alice".to_string(),
            "/reports".to_string(),
            "GET".to_string(),
        ])
        .await?;
    Ok(enforcer)
}

async fn build_app() -> Result<Router> {
    let warden = Warden::builder()
        .subject_resolver(header_subject)
        .decision_engine(CasbinEngine::new(permission_enforcer().await?))
        .build()?;
    let route_warden = Warden::builder()
        .subject_resolver(header_subject)
        .decision_engine(CasbinEngine::new(route_enforcer().await?))
        .build()?;

    let app = Router::new()
        .route(
            "/blog",
            post(create_blog).layer(warden.requires_permissions(["blog:create"])?),
        )
        .route(
            "/blog/:id",
            put(update_blog).layer(warden.requires_permissions(["blog:update"])?),
        )
        .route(
            "/comment",
            post(create_comment).layer(warden.requires_permissions_with(
                ["comment:create", "blog:create"],
                GuardOptions::new().with_rule(ValidationRule::AtLeastOne),
            )?),
        )
        .route(
            "/admin/stats",
            get(admin_stats).layer(warden.requires_roles(["admin"])),
        )
        .route("/reports", get(reports).layer(route_warden.route_guard()))
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = DemoConfig::from_env()?;
    let app = build_app().await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "blog demo listening");
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
