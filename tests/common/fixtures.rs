use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use recordkeeper::audit::value::Property;
use recordkeeper::audit::{
    ActorId, ActorResolver, AuditInterceptor, AuditLogService, Auditable, ChangeAction,
    MemoryAuditLogRepository,
};
use recordkeeper::models::{AuditLogEntry, Company};
use recordkeeper::store::{MemoryStore, Record, UnitOfWork};

/// Auditable record with an arbitrary property list.
#[derive(Debug, Clone)]
pub struct Gadget {
    pub id: Uuid,
    pub properties: Vec<Property>,
}

impl Gadget {
    pub fn new(properties: Vec<Property>) -> Self {
        Self {
            id: Uuid::now_v7(),
            properties,
        }
    }

    pub fn with(&self, properties: Vec<Property>) -> Self {
        Self {
            id: self.id,
            properties,
        }
    }
}

impl Record for Gadget {
    fn table(&self) -> &'static str {
        "gadgets"
    }

    fn key(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<Property> {
        self.properties
            .iter()
            .filter(|p| p.value.is_scalar())
            .cloned()
            .collect()
    }

    fn as_auditable(&self) -> Option<&dyn Auditable> {
        Some(self)
    }
}

impl Auditable for Gadget {
    fn entity_type(&self) -> &'static str {
        "Gadget"
    }

    fn entity_id(&self) -> Uuid {
        self.id
    }

    fn properties(&self) -> Vec<Property> {
        self.properties.clone()
    }
}

/// Record that never opts into auditing.
#[derive(Debug, Clone)]
pub struct SessionRow {
    pub id: Uuid,
    pub token: String,
}

impl Record for SessionRow {
    fn table(&self) -> &'static str {
        "sessions"
    }

    fn key(&self) -> Uuid {
        self.id
    }

    fn columns(&self) -> Vec<Property> {
        vec![
            Property::new("id", self.id),
            Property::new("token", self.token.as_str()),
        ]
    }
}

/// Resolver that counts how often it is asked.
pub struct CountingActor {
    pub id: Uuid,
    pub calls: AtomicUsize,
}

impl CountingActor {
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ActorResolver for CountingActor {
    fn resolve(&self) -> ActorId {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ActorId::User(self.id)
    }
}

/// In-memory persistence with auditing wired the way the server wires it.
pub struct AuditHarness {
    pub store: Arc<MemoryStore>,
    pub interceptor: Arc<AuditInterceptor>,
    pub service: AuditLogService,
}

impl AuditHarness {
    pub fn new() -> Self {
        Self::with_interceptor(AuditInterceptor::default())
    }

    pub fn with_interceptor(interceptor: AuditInterceptor) -> Self {
        let store = Arc::new(MemoryStore::new());
        let service = AuditLogService::new(Arc::new(MemoryAuditLogRepository::new(store.clone())));
        Self {
            store,
            interceptor: Arc::new(interceptor),
            service,
        }
    }

    pub fn unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::new(self.store.clone()).with_observer(self.interceptor.clone())
    }

    pub async fn audit_rows(&self) -> usize {
        self.store.count("audit_log").await
    }
}

pub fn company(name: &str) -> Company {
    Company {
        id: Uuid::now_v7(),
        name: name.to_string(),
        website: None,
        email: None,
        founding_date: None,
        employee_count: None,
        revenue: None,
        parent_company_id: None,
        notes: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_767_225_600 + secs, 0).unwrap()
}

pub fn audit_entry(entity_type: &str, entity_id: Uuid, timestamp: DateTime<Utc>) -> AuditLogEntry {
    AuditLogEntry {
        id: Uuid::now_v7(),
        entity_type: entity_type.to_string(),
        entity_id,
        action: ChangeAction::Updated,
        property_name: Some("last_name".to_string()),
        old_value: Some("Meyer".to_string()),
        new_value: Some("Maier".to_string()),
        user_id: Uuid::nil(),
        timestamp,
    }
}
