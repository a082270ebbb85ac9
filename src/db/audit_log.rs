use sqlx::PgPool;
use uuid::Uuid;

use crate::models::AuditLogEntry;

pub async fn list_by_entity(
    pool: &PgPool,
    entity_type: &str,
    entity_id: Uuid,
) -> Result<Vec<AuditLogEntry>, sqlx::Error> {
    sqlx::query_as::<_, AuditLogEntry>(
        "SELECT * FROM audit_log WHERE entity_type = $1 AND entity_id = $2
         ORDER BY \"timestamp\" DESC, id DESC",
    )
    .bind(entity_type)
    .bind(entity_id)
    .fetch_all(pool)
    .await
}

pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<AuditLogEntry>, sqlx::Error> {
    sqlx::query_as::<_, AuditLogEntry>(
        "SELECT * FROM audit_log ORDER BY \"timestamp\" DESC, id DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
