//! Repository implementations for data access.
//!
//! Each backend implements the collaborator traits declared by the core
//! crate, hiding storage details from the rest of the application.

pub mod file;
pub mod memory;
pub mod settings;

pub use file::SqlFileRepository;
pub use memory::{MemoryFileRepository, MemorySettingsStore};
pub use settings::SqlSettingsStore;
