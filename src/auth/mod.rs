pub mod extractor;
pub mod jwt;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
