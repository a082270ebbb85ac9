use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::repository::AuditLogRepository;
use crate::models::AuditLogEntry;
use crate::store::StoreError;

/// Count used by `get_recent` when the caller asks for zero or fewer entries.
pub const DEFAULT_RECENT_COUNT: i64 = 10;

/// Collection response carrying the number of matched elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResult<T> {
    pub total_count: usize,
    pub data: Vec<T>,
}

impl<T> ListResult<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            total_count: data.len(),
            data,
        }
    }
}

/// Read-only queries over the audit trail.
#[derive(Clone)]
pub struct AuditLogService {
    repository: Arc<dyn AuditLogRepository>,
}

impl AuditLogService {
    pub fn new(repository: Arc<dyn AuditLogRepository>) -> Self {
        Self { repository }
    }

    /// All entries for one entity, newest first. Unknown entities yield an
    /// empty result.
    pub async fn get_by_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<ListResult<AuditLogEntry>, StoreError> {
        let entries = self
            .repository
            .get_by_entity(entity_type, entity_id)
            .await?;
        Ok(ListResult::new(entries))
    }

    /// The `count` most recent entries across all entity types.
    pub async fn get_recent(&self, count: i64) -> Result<ListResult<AuditLogEntry>, StoreError> {
        let count = if count <= 0 {
            DEFAULT_RECENT_COUNT
        } else {
            count
        };
        let entries = self.repository.get_recent(count).await?;
        Ok(ListResult::new(entries))
    }
}
