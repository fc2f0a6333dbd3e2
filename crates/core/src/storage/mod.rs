//! Object storage for uploaded files using Apache OpenDAL.
//!
//! Supported backends:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem
//! - Memory (tests and throwaway servers)
//!
//! # Layout
//!
//! ```text
//! {path}/{hash}{ext}        object key, path segments sanitized
//! {public_url}/{key}        URL stored on the file record
//! ```

mod config;
mod error;
mod service;

pub use config::StorageConfig;
pub use error::StorageError;
pub use service::{StorageService, object_key};
