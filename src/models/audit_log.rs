use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::change_set::ChangeAction;
use crate::audit::value::{Property, PropertyValue};
use crate::store::{Record, StoreError};

pub const AUDIT_LOG_TABLE: &str = "audit_log";

/// Persisted, append-only record of one entity transition or one changed field.
///
/// Audit entries are a plain `Record`; they are never audited themselves.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    /// Logical entity name, e.g. `Person`.
    pub entity_type: String,
    pub entity_id: Uuid,
    #[sqlx(try_from = "String")]
    pub action: ChangeAction,
    pub property_name: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    /// Nil when no actor was available.
    pub user_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl Record for AuditLogEntry {
    fn table(&self) -> &'static str {
        AUDIT_LOG_TABLE
    }

    fn key(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<Property> {
        vec![
            Property::new("id", self.id),
            Property::new("entity_type", self.entity_type.as_str()),
            Property::new("entity_id", self.entity_id),
            Property::new("action", PropertyValue::enumeration(Some(self.action.as_str()))),
            Property::new("property_name", self.property_name.as_deref()),
            Property::new("old_value", self.old_value.as_deref()),
            Property::new("new_value", self.new_value.as_deref()),
            Property::new("user_id", self.user_id),
            Property::new("timestamp", self.timestamp),
        ]
    }
}

impl AuditLogEntry {
    /// Rebuild an entry from the column list it was written with.
    pub fn from_columns(columns: &[Property]) -> Result<Self, StoreError> {
        let action = required(text_column(columns, "action")?, "action")?
            .parse::<ChangeAction>()
            .map_err(|e| decode_error(e.to_string()))?;

        let timestamp = match column(columns, "timestamp")? {
            PropertyValue::Timestamp(Some(t)) => *t,
            other => {
                return Err(decode_error(format!(
                    "timestamp: expected timestamp, got {other:?}"
                )));
            }
        };

        Ok(Self {
            id: uuid_column(columns, "id")?,
            entity_type: required(text_column(columns, "entity_type")?, "entity_type")?,
            entity_id: uuid_column(columns, "entity_id")?,
            action,
            property_name: text_column(columns, "property_name")?,
            old_value: text_column(columns, "old_value")?,
            new_value: text_column(columns, "new_value")?,
            user_id: uuid_column(columns, "user_id")?,
            timestamp,
        })
    }
}

fn column<'a>(columns: &'a [Property], name: &str) -> Result<&'a PropertyValue, StoreError> {
    columns
        .iter()
        .find(|c| c.name == name)
        .map(|c| &c.value)
        .ok_or_else(|| decode_error(format!("missing column {name}")))
}

fn uuid_column(columns: &[Property], name: &str) -> Result<Uuid, StoreError> {
    match column(columns, name)? {
        PropertyValue::Uuid(Some(id)) => Ok(*id),
        other => Err(decode_error(format!("{name}: expected uuid, got {other:?}"))),
    }
}

fn text_column(columns: &[Property], name: &str) -> Result<Option<String>, StoreError> {
    match column(columns, name)? {
        PropertyValue::Text(v) | PropertyValue::Enum(v) => Ok(v.clone()),
        other => Err(decode_error(format!("{name}: expected text, got {other:?}"))),
    }
}

fn required(value: Option<String>, name: &str) -> Result<String, StoreError> {
    value.ok_or_else(|| decode_error(format!("{name} is null")))
}

fn decode_error(reason: String) -> StoreError {
    StoreError::Decode {
        table: AUDIT_LOG_TABLE,
        reason,
    }
}
