use std::sync::Arc;

use crate::audit::actor::ActorResolver;
use crate::audit::error::AuditError;
use crate::audit::value::Property;
use crate::store::{EntityState, Record, Store, StoreError, Write};

/// A record tracked by a unit of work, with the values it had when it was
/// loaded (for `Modified`/`Unchanged`/`Deleted` entries).
pub struct TrackedEntity {
    state: EntityState,
    record: Box<dyn Record>,
    original: Option<Vec<Property>>,
}

impl TrackedEntity {
    pub fn new(state: EntityState, record: Box<dyn Record>, original: Option<Vec<Property>>) -> Self {
        Self {
            state,
            record,
            original,
        }
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn record(&self) -> &dyn Record {
        self.record.as_ref()
    }

    pub fn original(&self) -> Option<&[Property]> {
        self.original.as_deref()
    }

    fn matches(&self, table: &str, key: uuid::Uuid) -> bool {
        self.record.table() == table && self.record.key() == key
    }
}

/// Read-only view of a unit of work handed to pre-commit observers.
pub struct PendingChanges<'a> {
    entries: &'a [TrackedEntity],
}

impl<'a> PendingChanges<'a> {
    pub fn new(entries: &'a [TrackedEntity]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'a [TrackedEntity] {
        self.entries
    }
}

/// Explicit ambient state for one commit.
pub struct CommitContext<'a> {
    pub actor: &'a dyn ActorResolver,
}

/// Extra rows an observer wants written in the same batch.
#[derive(Default)]
pub struct InsertQueue {
    records: Vec<Box<dyn Record>>,
}

impl InsertQueue {
    pub fn push<R: Record>(&mut self, record: R) {
        self.records.push(Box::new(record));
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn into_writes(self) -> impl Iterator<Item = Write> {
        self.records.into_iter().map(|r| Write::insert(r.as_ref()))
    }
}

/// Hook invoked right before the physical write of a unit of work.
///
/// Observers may only queue inserts; an error aborts the whole commit.
pub trait PreCommitObserver: Send + Sync {
    fn before_commit(
        &self,
        pending: &PendingChanges<'_>,
        ctx: &CommitContext<'_>,
        queue: &mut InsertQueue,
    ) -> Result<(), AuditError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Change tracker for one atomic group of record mutations.
pub struct UnitOfWork {
    store: Arc<dyn Store>,
    observers: Vec<Arc<dyn PreCommitObserver>>,
    entries: Vec<TrackedEntity>,
}

impl UnitOfWork {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            observers: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PreCommitObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Track a new record.
    pub fn add<R: Record>(&mut self, record: R) {
        match self.position(record.table(), record.key()) {
            Some(i) => {
                let entry = &mut self.entries[i];
                if entry.state != EntityState::Added {
                    entry.state = EntityState::Modified;
                }
                entry.record = Box::new(record);
            }
            None => self
                .entries
                .push(TrackedEntity::new(EntityState::Added, Box::new(record), None)),
        }
    }

    /// Track a loaded record without changes.
    pub fn attach<R: Record>(&mut self, record: R) {
        if self.position(record.table(), record.key()).is_some() {
            return;
        }
        let original = snapshot(&record);
        self.entries.push(TrackedEntity::new(
            EntityState::Unchanged,
            Box::new(record),
            Some(original),
        ));
    }

    /// Track `current` as the new state of a record that was loaded as `original`.
    pub fn update<R: Record>(&mut self, original: &R, current: R) {
        match self.position(current.table(), current.key()) {
            Some(i) => {
                let entry = &mut self.entries[i];
                if entry.state != EntityState::Added {
                    entry.state = EntityState::Modified;
                }
                entry.record = Box::new(current);
            }
            None => {
                let original = snapshot(original);
                self.entries.push(TrackedEntity::new(
                    EntityState::Modified,
                    Box::new(current),
                    Some(original),
                ));
            }
        }
    }

    /// Mark a record for deletion. A record added in this unit of work is
    /// simply forgotten.
    pub fn remove<R: Record>(&mut self, record: R) {
        match self.position(record.table(), record.key()) {
            Some(i) if self.entries[i].state == EntityState::Added => {
                self.entries.remove(i);
            }
            Some(i) => self.entries[i].state = EntityState::Deleted,
            None => {
                let original = snapshot(&record);
                self.entries.push(TrackedEntity::new(
                    EntityState::Deleted,
                    Box::new(record),
                    Some(original),
                ));
            }
        }
    }

    pub fn entries(&self) -> &[TrackedEntity] {
        &self.entries
    }

    pub fn has_changes(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.state != EntityState::Unchanged)
    }

    /// Run the pre-commit observers and write business rows plus queued rows
    /// as one batch. Returns the number of business rows written.
    ///
    /// On error nothing is written and tracked state is left as it was.
    pub async fn save_changes(&mut self, actor: &dyn ActorResolver) -> Result<usize, CommitError> {
        let pending = PendingChanges::new(&self.entries);
        let ctx = CommitContext { actor };
        let mut queue = InsertQueue::default();

        for observer in &self.observers {
            if let Err(e) = observer.before_commit(&pending, &ctx, &mut queue) {
                tracing::warn!(error = %e, "pre-commit observer failed, unit of work aborted");
                return Err(e.into());
            }
        }

        let mut batch: Vec<Write> = self
            .entries
            .iter()
            .filter_map(|entry| match entry.state {
                EntityState::Added => Some(Write::insert(entry.record())),
                EntityState::Modified => Some(Write::update(entry.record())),
                EntityState::Deleted => Some(Write::delete(entry.record())),
                EntityState::Unchanged => None,
            })
            .collect();
        let written = batch.len();

        if batch.is_empty() && queue.is_empty() {
            return Ok(0);
        }

        batch.extend(queue.into_writes());
        if let Err(e) = self.store.apply(batch).await {
            tracing::warn!(error = %e, "commit failed, queued rows discarded");
            return Err(e.into());
        }

        self.accept_changes();
        Ok(written)
    }

    fn accept_changes(&mut self) {
        self.entries.retain(|e| e.state != EntityState::Deleted);
        for entry in &mut self.entries {
            entry.state = EntityState::Unchanged;
            entry.original = Some(snapshot(entry.record.as_ref()));
        }
    }

    fn position(&self, table: &str, key: uuid::Uuid) -> Option<usize> {
        self.entries.iter().position(|e| e.matches(table, key))
    }
}

/// Values a record is diffed against later: its auditable properties when it
/// has them, otherwise its columns.
fn snapshot<R: Record + ?Sized>(record: &R) -> Vec<Property> {
    record
        .as_auditable()
        .map(|a| a.properties())
        .unwrap_or_else(|| record.columns())
}
