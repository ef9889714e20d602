pub mod crypto;
pub mod password_hasher;
pub mod token_service;

pub use password_hasher::PasswordHasher;
pub use token_service::{extract_bearer_credential, TokenConfig, TokenService};
