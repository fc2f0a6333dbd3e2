//! Conversion of received file parts into buffered files.

use std::path::Path;

use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::types::{IncomingFile, RawFile};

/// Buffer every received part, keeping their order.
#[must_use]
pub fn bufferize(files: Vec<RawFile>) -> Vec<IncomingFile> {
    files.into_iter().map(buffer_one).collect()
}

fn buffer_one(raw: RawFile) -> IncomingFile {
    let path = Path::new(&raw.name);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let mime = raw
        .mime
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            mime_guess::from_path(&raw.name)
                .first_or_octet_stream()
                .to_string()
        });

    let mut hasher = Sha256::new();
    hasher.update(&raw.content);

    IncomingFile {
        hash: format!("{}_{}", sanitize_filename(stem), Uuid::new_v4().simple()),
        ext,
        mime,
        size: raw.content.len() as u64,
        sha256: format!("{:x}", hasher.finalize()),
        name: raw.name,
        content: raw.content,
    }
}

/// Sanitize a file name for use in storage keys.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
pub(crate) fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("invoice.pdf"), "invoice.pdf");
        assert_eq!(sanitize_filename("my file (1).pdf"), "my_file__1_.pdf");
        assert_eq!(sanitize_filename("test@#$%.doc"), "test____.doc");
        assert_eq!(sanitize_filename("日本語.pdf"), "___.pdf");
    }

    #[test]
    fn test_bufferize_derives_metadata() {
        let files = bufferize(vec![RawFile::new("Photo Rec.JPG", None, vec![0u8; 50])]);
        assert_eq!(files.len(), 1);

        let file = &files[0];
        assert_eq!(file.name, "Photo Rec.JPG");
        assert_eq!(file.ext, ".jpg");
        assert_eq!(file.mime, "image/jpeg");
        assert_eq!(file.size, 50);
        assert_eq!(file.sha256.len(), 64);
        assert!(file.hash.starts_with("Photo_Rec_"));
    }

    #[test]
    fn test_bufferize_prefers_client_mime() {
        let files = bufferize(vec![
            RawFile::new("data", Some("text/csv".into()), "a,b"),
            RawFile::new("blob", None, "x"),
        ]);
        assert_eq!(files[0].mime, "text/csv");
        assert_eq!(files[0].ext, "");
        assert_eq!(files[1].mime, "application/octet-stream");
    }

    #[test]
    fn test_hashes_are_unique_for_same_name() {
        let files = bufferize(vec![
            RawFile::new("a.png", None, "1"),
            RawFile::new("a.png", None, "1"),
        ]);
        assert_ne!(files[0].hash, files[1].hash);
        assert_eq!(files[0].sha256, files[1].sha256);
    }
}
