use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::Auditable;
use crate::audit::value::Property;
use crate::store::Record;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub company_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Person {
    fn table(&self) -> &'static str {
        "persons"
    }

    fn key(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<Property> {
        vec![
            Property::new("id", self.id),
            Property::new("title", self.title.as_deref()),
            Property::new("first_name", self.first_name.as_str()),
            Property::new("last_name", self.last_name.as_str()),
            Property::new("date_of_birth", self.date_of_birth),
            Property::new("company_id", self.company_id),
            Property::new("notes", self.notes.as_deref()),
            Property::new("created_at", self.created_at),
            Property::new("updated_at", self.updated_at),
        ]
    }

    fn as_auditable(&self) -> Option<&dyn Auditable> {
        Some(self)
    }
}

impl Auditable for Person {
    fn entity_type(&self) -> &'static str {
        "Person"
    }

    fn entity_id(&self) -> Uuid {
        self.id
    }

    fn properties(&self) -> Vec<Property> {
        self.columns()
    }
}
