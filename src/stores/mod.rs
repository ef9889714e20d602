pub mod audit_store;
pub mod reset_token_store;
pub mod user_store;

pub use audit_store::AuditStore;
pub use reset_token_store::ResetTokenStore;
pub use user_store::UserStore;
