//! `SeaORM` entity definitions.

pub mod core_store;
pub mod upload_file_morph;
pub mod upload_files;
