pub mod auth_coordinator;

pub use auth_coordinator::AuthCoordinator;
