// API request/response models
pub mod admin;
pub mod auth;
pub mod common;
