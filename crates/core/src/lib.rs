//! Upload domain logic for Depot.
//!
//! This crate contains the upload workflow with ZERO web or database
//! dependencies. Persistence is reached through the collaborator traits
//! declared here and implemented by the db crate.
//!
//! # Modules
//!
//! - `upload` - Upload validation, settings, file queries and their collaborator traits
//! - `storage` - Object storage provider backed by Apache OpenDAL

pub mod storage;
pub mod upload;
