pub mod audit_log;
pub mod company;
pub mod person;
pub mod product;

use chrono::{DateTime, SubsecRound, Utc};

pub use audit_log::AuditLogEntry;
pub use company::Company;
pub use person::Person;
pub use product::Product;

/// Current instant truncated to the microsecond precision of `TIMESTAMPTZ`,
/// so a stored value reads back unchanged.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
