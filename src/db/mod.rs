pub mod audit_log;
pub mod companies;
pub mod persons;
pub mod products;
