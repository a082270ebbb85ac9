pub mod audit;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::audit::{AuditInterceptor, AuditLogService, DiffExtractor, PgAuditLogRepository};
use crate::config::Config;
use crate::state::{AppState, SharedState};
use crate::store::PgStore;

pub fn build_app(pool: PgPool, config: Config) -> (Router, SharedState) {
    let audit_interceptor = Arc::new(AuditInterceptor::new(DiffExtractor::new(
        config.audit.max_value_length,
    )));
    let audit_log = AuditLogService::new(Arc::new(PgAuditLogRepository::new(pool.clone())));

    let state: SharedState = Arc::new(AppState {
        store: Arc::new(PgStore::new(pool.clone())),
        pool,
        config,
        audit_interceptor,
        audit_log,
    });

    let app = Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                )),
        )
        .with_state(state.clone());

    (app, state)
}

async fn health() -> &'static str {
    "ok"
}
