// Internal types shared between services, stores and the API layer
pub mod audit;
pub mod auth;
