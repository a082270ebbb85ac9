use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::audit::value::{Property, PropertyValue};
use crate::store::{Store, StoreError, Write, WriteKind};

type Table = BTreeMap<Uuid, Vec<Property>>;

/// In-process `Store`. Batches are staged on a copy of the tables and only
/// swapped in once every write has succeeded.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<&'static str, Table>>,
    fail_next: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `apply` fail after it has received its batch.
    pub fn fail_next_apply(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub async fn rows(&self, table: &str) -> Vec<Vec<Property>> {
        self.tables
            .read()
            .await
            .get(table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn row(&self, table: &str, key: Uuid) -> Option<Vec<Property>> {
        self.tables
            .read()
            .await
            .get(table)
            .and_then(|rows| rows.get(&key).cloned())
    }

    pub async fn count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn apply(&self, batch: Vec<Write>) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        if self.fail_next.swap(false, Ordering::SeqCst) {
            tracing::debug!(rows = batch.len(), "injected failure, batch discarded");
            return Err(StoreError::Injected);
        }

        let mut staged = tables.clone();
        for write in batch {
            if let Some(column) = write
                .columns
                .iter()
                .find(|c| matches!(c.value, PropertyValue::Collection(_)))
            {
                return Err(StoreError::UnsupportedColumn {
                    table: write.table,
                    column: column.name,
                    kind: column.value.kind(),
                });
            }

            let table = staged.entry(write.table).or_default();
            match write.kind {
                WriteKind::Insert => {
                    if table.contains_key(&write.key) {
                        return Err(StoreError::DuplicateKey {
                            table: write.table,
                            key: write.key,
                        });
                    }
                    table.insert(write.key, write.columns);
                }
                WriteKind::Update => match table.get_mut(&write.key) {
                    Some(row) => *row = write.columns,
                    None => {
                        return Err(StoreError::RowNotFound {
                            table: write.table,
                            key: write.key,
                        });
                    }
                },
                WriteKind::Delete => {
                    if table.remove(&write.key).is_none() {
                        return Err(StoreError::RowNotFound {
                            table: write.table,
                            key: write.key,
                        });
                    }
                }
            }
        }

        *tables = staged;
        Ok(())
    }
}
