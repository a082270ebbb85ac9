use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::audit::ListResult;
use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::models::AuditLogEntry;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct RecentQuery {
    /// Kept as text so a malformed value falls back to the default.
    pub count: Option<String>,
}

pub async fn recent(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<ListResult<AuditLogEntry>>, AppError> {
    auth.require_admin()?;
    // Missing, malformed and non-positive counts fall back to the service default.
    let count = query
        .count
        .and_then(|c| c.trim().parse::<i64>().ok())
        .unwrap_or(0);
    let result = state.audit_log.get_recent(count).await?;
    Ok(Json(result))
}

pub async fn by_entity(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path((entity_type, entity_id)): Path<(String, Uuid)>,
) -> Result<Json<ListResult<AuditLogEntry>>, AppError> {
    auth.require_admin()?;
    let result = state
        .audit_log
        .get_by_entity(&entity_type, entity_id)
        .await?;
    Ok(Json(result))
}
