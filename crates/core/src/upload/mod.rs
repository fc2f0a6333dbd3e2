//! Upload workflow: request validation, settings, file queries.
//!
//! # Request flow
//!
//! ```text
//! RawFile[] ─► UploadHandler ─► enabled? ─► non-empty? ─► bufferize
//!                                                            │
//!                           StorageProvider::upload ◄── size limit ◄┘
//! ```
//!
//! Collaborators are injected as trait objects:
//! - [`SettingsStore`] - per-environment plugin settings
//! - [`StorageProvider`] - stores bytes and returns file records
//! - [`FileRepository`] - file metadata persistence

mod bufferize;
mod error;
mod files;
mod handler;
mod provider;
mod settings;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub(crate) use bufferize::sanitize_filename;

pub use bufferize::bufferize;
pub use error::UploadError;
pub use files::{FileRepository, FileService};
pub use handler::{UploadHandler, check_size_limit};
pub use provider::StorageProvider;
pub use settings::{CONFIG_KEY, PLUGIN_NAME, SettingsService, SettingsStore};
pub use types::{
    CreateFileInput, FileQuery, IncomingFile, ProviderDescriptor, RawFile, RelationRef,
    SortField, SortOrder, StoredFile, UploadBody, UploadConfig, UploadFile, UploadSettings,
};
