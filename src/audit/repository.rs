use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::models::AuditLogEntry;
use crate::models::audit_log::AUDIT_LOG_TABLE;
use crate::store::{MemoryStore, StoreError};

/// Read side of the audit log. Results are newest first.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn get_by_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Vec<AuditLogEntry>, StoreError>;

    async fn get_recent(&self, count: i64) -> Result<Vec<AuditLogEntry>, StoreError>;
}

pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    async fn get_by_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Vec<AuditLogEntry>, StoreError> {
        Ok(db::audit_log::list_by_entity(&self.pool, entity_type, entity_id).await?)
    }

    async fn get_recent(&self, count: i64) -> Result<Vec<AuditLogEntry>, StoreError> {
        Ok(db::audit_log::list_recent(&self.pool, count).await?)
    }
}

pub struct MemoryAuditLogRepository {
    store: Arc<MemoryStore>,
}

impl MemoryAuditLogRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    async fn newest_first(&self) -> Result<Vec<AuditLogEntry>, StoreError> {
        let mut entries = self
            .store
            .rows(AUDIT_LOG_TABLE)
            .await
            .iter()
            .map(|row| AuditLogEntry::from_columns(row))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(entries)
    }
}

#[async_trait]
impl AuditLogRepository for MemoryAuditLogRepository {
    async fn get_by_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Vec<AuditLogEntry>, StoreError> {
        Ok(self
            .newest_first()
            .await?
            .into_iter()
            .filter(|e| e.entity_type == entity_type && e.entity_id == entity_id)
            .collect())
    }

    async fn get_recent(&self, count: i64) -> Result<Vec<AuditLogEntry>, StoreError> {
        let count = usize::try_from(count).unwrap_or(0);
        Ok(self.newest_first().await?.into_iter().take(count).collect())
    }
}
