pub mod auth;
pub mod internal;

pub use auth::AuthError;
pub use internal::{CredentialError, DatabaseError, InternalError};
