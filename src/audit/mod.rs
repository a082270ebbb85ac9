pub mod actor;
pub mod change_set;
pub mod diff;
pub mod error;
pub mod interceptor;
pub mod repository;
pub mod service;
pub mod value;

use uuid::Uuid;

use value::Property;

pub use actor::{ActorId, ActorResolver, SystemActor};
pub use change_set::{ChangeAction, EntityChangeSet, PropertyChange};
pub use diff::DiffExtractor;
pub use error::AuditError;
pub use interceptor::AuditInterceptor;
pub use repository::{AuditLogRepository, MemoryAuditLogRepository, PgAuditLogRepository};
pub use service::{AuditLogService, ListResult};

/// Capability an entity implements to take part in auditing.
pub trait Auditable {
    /// Stable logical name, independent of where the entity is stored.
    fn entity_type(&self) -> &'static str;
    fn entity_id(&self) -> Uuid;
    /// Current values, navigation properties included.
    fn properties(&self) -> Vec<Property>;
}
