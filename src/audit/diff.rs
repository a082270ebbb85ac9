use uuid::Uuid;

use crate::audit::change_set::{EntityChangeSet, PropertyChange};
use crate::audit::error::AuditError;
use crate::audit::value::{Property, PropertyValue};
use crate::store::{EntityState, TrackedEntity};

/// Bookkeeping columns that change on every write.
pub const IGNORED_PROPERTIES: &[&str] = &["created_at", "updated_at"];

/// Width of the `old_value`/`new_value` columns.
pub const DEFAULT_MAX_VALUE_LENGTH: usize = 4000;

/// Turns tracked entities into the change sets that should be recorded.
#[derive(Debug, Clone)]
pub struct DiffExtractor {
    max_value_length: usize,
}

impl Default for DiffExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VALUE_LENGTH)
    }
}

impl DiffExtractor {
    pub fn new(max_value_length: usize) -> Self {
        Self { max_value_length }
    }

    pub fn extract(&self, entries: &[TrackedEntity]) -> Result<Vec<EntityChangeSet>, AuditError> {
        let mut change_sets = Vec::new();

        for entry in entries {
            let Some(entity) = entry.record().as_auditable() else {
                continue;
            };
            let entity_type = entity.entity_type();
            if entity_type.is_empty() {
                continue;
            }
            let entity_id = entity.entity_id();

            match entry.state() {
                EntityState::Added => {
                    change_sets.push(EntityChangeSet::created(entity_type, entity_id));
                }
                EntityState::Deleted => {
                    change_sets.push(EntityChangeSet::deleted(entity_type, entity_id));
                }
                EntityState::Modified => {
                    let original = entry.original().ok_or_else(|| AuditError::MissingOriginal {
                        entity_type: entity_type.to_string(),
                        entity_id,
                    })?;
                    let current = entity.properties();
                    change_sets.extend(self.diff(entity_type, entity_id, original, &current)?);
                }
                EntityState::Unchanged => {}
            }
        }

        Ok(change_sets)
    }

    /// One `Updated` change set per scalar property whose value changed.
    pub fn diff(
        &self,
        entity_type: &str,
        entity_id: Uuid,
        original: &[Property],
        current: &[Property],
    ) -> Result<Vec<EntityChangeSet>, AuditError> {
        let mut changes = Vec::new();

        for new in current.iter().filter(|p| is_diffable(p)) {
            let Some(old) = original.iter().find(|p| p.name == new.name) else {
                return Err(AuditError::PropertyMismatch {
                    entity_type: entity_type.to_string(),
                    property: new.name.to_string(),
                    side: "original",
                });
            };

            if old.value.kind() != new.value.kind() {
                return Err(AuditError::AmbiguousProperty {
                    entity_type: entity_type.to_string(),
                    property: new.name.to_string(),
                    old_kind: old.value.kind(),
                    new_kind: new.value.kind(),
                });
            }

            if old.value == new.value {
                continue;
            }

            changes.push(EntityChangeSet::updated(
                entity_type,
                entity_id,
                PropertyChange {
                    name: new.name.to_string(),
                    old_value: self.render(&old.value, old.name)?,
                    new_value: self.render(&new.value, new.name)?,
                },
            ));
        }

        if let Some(dropped) = original
            .iter()
            .filter(|p| is_diffable(p))
            .find(|old| !current.iter().any(|p| p.name == old.name))
        {
            return Err(AuditError::PropertyMismatch {
                entity_type: entity_type.to_string(),
                property: dropped.name.to_string(),
                side: "current",
            });
        }

        Ok(changes)
    }

    fn render(&self, value: &PropertyValue, name: &str) -> Result<Option<String>, AuditError> {
        Ok(value
            .render(name)?
            .map(|s| truncate(s, self.max_value_length)))
    }
}

fn is_diffable(property: &Property) -> bool {
    property.value.is_scalar() && !IGNORED_PROPERTIES.contains(&property.name)
}

fn truncate(value: String, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => value[..cut].to_string(),
        None => value,
    }
}
