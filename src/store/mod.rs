pub mod memory;
pub mod postgres;
pub mod unit_of_work;

use async_trait::async_trait;
use uuid::Uuid;

use crate::audit::Auditable;
use crate::audit::value::Property;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use unit_of_work::{
    CommitContext, CommitError, InsertQueue, PendingChanges, PreCommitObserver, TrackedEntity,
    UnitOfWork,
};

/// A row the persistence layer knows how to write.
///
/// `key()` must be the value of the `id` column.
pub trait Record: Send + Sync + 'static {
    fn table(&self) -> &'static str;
    fn key(&self) -> Uuid;
    fn columns(&self) -> Vec<Property>;

    /// Opt-in capability: records that return `None` are never audited.
    fn as_auditable(&self) -> Option<&dyn Auditable> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    Added,
    Modified,
    Deleted,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Insert,
    Update,
    Delete,
}

/// One physical row operation inside an atomic batch.
#[derive(Debug, Clone)]
pub struct Write {
    pub kind: WriteKind,
    pub table: &'static str,
    pub key: Uuid,
    pub columns: Vec<Property>,
}

impl Write {
    pub fn insert(record: &dyn Record) -> Self {
        Self {
            kind: WriteKind::Insert,
            table: record.table(),
            key: record.key(),
            columns: record.columns(),
        }
    }

    pub fn update(record: &dyn Record) -> Self {
        Self {
            kind: WriteKind::Update,
            table: record.table(),
            key: record.key(),
            columns: record.columns(),
        }
    }

    pub fn delete(record: &dyn Record) -> Self {
        Self {
            kind: WriteKind::Delete,
            table: record.table(),
            key: record.key(),
            columns: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("{table}.{column}: {kind} values cannot be stored in a column")]
    UnsupportedColumn {
        table: &'static str,
        column: &'static str,
        kind: &'static str,
    },

    #[error("{table} row {key} not found")]
    RowNotFound { table: &'static str, key: Uuid },

    #[error("{table} row {key} already exists")]
    DuplicateKey { table: &'static str, key: Uuid },

    /// A referenced row is missing, or the row is still referenced.
    #[error("{table} row {key} violates a foreign key")]
    ForeignKey { table: &'static str, key: Uuid },

    #[error("cannot decode {table} row: {reason}")]
    Decode { table: &'static str, reason: String },

    #[error("injected store failure")]
    Injected,
}

/// Physical write path. A batch is applied completely or not at all.
#[async_trait]
pub trait Store: Send + Sync {
    async fn apply(&self, batch: Vec<Write>) -> Result<(), StoreError>;
}
