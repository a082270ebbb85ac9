use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::Auditable;
use crate::audit::value::Property;
use crate::store::Record;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Product {
    fn table(&self) -> &'static str {
        "products"
    }

    fn key(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<Property> {
        vec![
            Property::new("id", self.id),
            Property::new("name", self.name.as_str()),
            Property::new("description", self.description.as_deref()),
            Property::new("price", self.price),
            Property::new("stock", self.stock),
            Property::new("is_active", self.is_active),
            Property::new("created_at", self.created_at),
            Property::new("updated_at", self.updated_at),
        ]
    }

    fn as_auditable(&self) -> Option<&dyn Auditable> {
        Some(self)
    }
}

impl Auditable for Product {
    fn entity_type(&self) -> &'static str {
        "Product"
    }

    fn entity_id(&self) -> Uuid {
        self.id
    }

    fn properties(&self) -> Vec<Property> {
        self.columns()
    }
}
