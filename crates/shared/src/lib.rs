//! Shared errors, configuration and environment helpers for Depot.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - Typed lookups over process environment variables

pub mod config;
pub mod env;
pub mod error;

pub use config::{AppConfig, DatabaseBackend, StorageProviderConfig};
pub use env::EnvError;
pub use error::AppError;
