// Database entities - SeaORM models
pub mod audit_event;
pub mod password_reset_token;
pub mod user;

pub use user::Role;
