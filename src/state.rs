use std::sync::Arc;

use sqlx::PgPool;

use crate::audit::{AuditInterceptor, AuditLogService};
use crate::config::Config;
use crate::store::{Store, UnitOfWork};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub audit_interceptor: Arc<AuditInterceptor>,
    pub audit_log: AuditLogService,
}

impl AppState {
    /// Fresh unit of work with auditing attached.
    pub fn unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::new(self.store.clone()).with_observer(self.audit_interceptor.clone())
    }
}
