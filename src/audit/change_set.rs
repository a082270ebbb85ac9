use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::actor::ActorId;
use crate::models::AuditLogEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Created => "Created",
            ChangeAction::Updated => "Updated",
            ChangeAction::Deleted => "Deleted",
        }
    }
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown audit action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for ChangeAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(ChangeAction::Created),
            "Updated" => Ok(ChangeAction::Updated),
            "Deleted" => Ok(ChangeAction::Deleted),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

impl TryFrom<String> for ChangeAction {
    type Error = UnknownAction;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Before/after rendering of one changed scalar property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChange {
    pub name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// In-memory description of one entity transition, or of one changed field
/// within an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityChangeSet {
    pub entity_type: String,
    pub entity_id: Uuid,
    pub action: ChangeAction,
    /// `Some` only for `Updated`.
    pub change: Option<PropertyChange>,
}

impl EntityChangeSet {
    pub fn created(entity_type: impl Into<String>, entity_id: Uuid) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id,
            action: ChangeAction::Created,
            change: None,
        }
    }

    pub fn deleted(entity_type: impl Into<String>, entity_id: Uuid) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id,
            action: ChangeAction::Deleted,
            change: None,
        }
    }

    pub fn updated(entity_type: impl Into<String>, entity_id: Uuid, change: PropertyChange) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id,
            action: ChangeAction::Updated,
            change: Some(change),
        }
    }

    /// Stamp the change set with the committing actor and commit instant.
    pub fn into_entry(self, actor: ActorId, timestamp: DateTime<Utc>) -> AuditLogEntry {
        let (property_name, old_value, new_value) = match self.change {
            Some(change) => (Some(change.name), change.old_value, change.new_value),
            None => (None, None, None),
        };

        AuditLogEntry {
            id: Uuid::now_v7(),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            action: self.action,
            property_name,
            old_value,
            new_value,
            user_id: actor.as_uuid(),
            timestamp,
        }
    }
}
