use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::Auditable;
use crate::audit::value::{Property, PropertyValue};
use crate::store::Record;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub website: Option<String>,
    pub email: Option<String>,
    pub founding_date: Option<NaiveDate>,
    pub employee_count: Option<i64>,
    pub revenue: Option<f64>,
    pub parent_company_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Company {
    fn table(&self) -> &'static str {
        "companies"
    }

    fn key(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<Property> {
        vec![
            Property::new("id", self.id),
            Property::new("name", self.name.as_str()),
            Property::new("website", self.website.as_deref()),
            Property::new("email", self.email.as_deref()),
            Property::new("founding_date", self.founding_date),
            Property::new("employee_count", self.employee_count),
            Property::new("revenue", self.revenue),
            Property::new("parent_company_id", self.parent_company_id),
            Property::new("notes", self.notes.as_deref()),
            Property::new("created_at", self.created_at),
            Property::new("updated_at", self.updated_at),
        ]
    }

    fn as_auditable(&self) -> Option<&dyn Auditable> {
        Some(self)
    }
}

impl Auditable for Company {
    fn entity_type(&self) -> &'static str {
        "Company"
    }

    fn entity_id(&self) -> Uuid {
        self.id
    }

    fn properties(&self) -> Vec<Property> {
        let mut properties = self.columns();
        // The navigation itself is not diffed; the foreign key column is.
        properties.push(Property::new(
            "parent_company",
            PropertyValue::Reference(self.parent_company_id),
        ));
        properties
    }
}
