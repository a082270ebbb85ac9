use crate::audit::diff::DiffExtractor;
use crate::audit::error::AuditError;
use crate::models;
use crate::store::{CommitContext, InsertQueue, PendingChanges, PreCommitObserver};

/// Records every pending create/update/delete of an auditable record as
/// `AuditLogEntry` rows queued into the same unit of work.
#[derive(Debug, Clone, Default)]
pub struct AuditInterceptor {
    extractor: DiffExtractor,
}

impl AuditInterceptor {
    pub fn new(extractor: DiffExtractor) -> Self {
        Self { extractor }
    }
}

impl PreCommitObserver for AuditInterceptor {
    fn before_commit(
        &self,
        pending: &PendingChanges<'_>,
        ctx: &CommitContext<'_>,
        queue: &mut InsertQueue,
    ) -> Result<(), AuditError> {
        let change_sets = self.extractor.extract(pending.entries())?;
        if change_sets.is_empty() {
            return Ok(());
        }

        // One actor and one instant for the whole unit of work.
        let actor = ctx.actor.resolve();
        let committed_at = models::now();

        let count = change_sets.len();
        for change_set in change_sets {
            queue.push(change_set.into_entry(actor, committed_at));
        }

        tracing::debug!(entries = count, actor = %actor.as_uuid(), "audit entries queued");
        Ok(())
    }
}
