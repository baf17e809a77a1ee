//! Image storage for Memwall.
//!
//! Uploaded images are written to a local directory under a generated
//! unique name; `public_url` maps stored names back to client-visible
//! paths. An OSS backend can be selected by configuration but only the
//! dispatch seam exists; the upload itself is not implemented.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::UploadsConfig;
use crate::{Result, WallError};

/// Storage backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Local filesystem.
    Local,
    /// Object storage service (placeholder).
    Oss,
}

/// Image storage service.
#[derive(Debug, Clone)]
pub struct ImageStore {
    backend: StorageBackend,
    base_path: PathBuf,
    public_base: String,
}

impl ImageStore {
    /// Create an ImageStore from the uploads configuration.
    ///
    /// For the local backend the base directory is created if missing.
    pub fn new(config: &UploadsConfig) -> Result<Self> {
        let backend = match config.backend.as_str() {
            "local" => StorageBackend::Local,
            "oss" => StorageBackend::Oss,
            other => {
                return Err(WallError::Config(format!("unknown uploads backend: {other}")))
            }
        };

        let base_path = PathBuf::from(&config.dir);
        if backend == StorageBackend::Local {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            backend,
            base_path,
            public_base: config.public_base.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base path of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Check whether a filename looks like an image by its extension.
    pub fn is_image_filename(name: &str) -> bool {
        mime_guess::from_path(name)
            .first()
            .map(|mime| mime.type_() == mime_guess::mime::IMAGE)
            .unwrap_or(false)
    }

    /// Save image content under a new unique stored name.
    ///
    /// Returns the stored name (UUID plus the original extension).
    pub fn save(&self, content: &[u8], original_name: &str) -> Result<String> {
        if !Self::is_image_filename(original_name) {
            return Err(WallError::Storage(format!(
                "not an image file: {original_name}"
            )));
        }

        match self.backend {
            StorageBackend::Local => {
                let ext = extract_extension(original_name);
                let stored_name = format!("{}.{ext}", Uuid::new_v4());
                fs::write(self.base_path.join(&stored_name), content)?;
                Ok(stored_name)
            }
            StorageBackend::Oss => Err(WallError::Storage(
                "oss backend is not implemented".to_string(),
            )),
        }
    }

    /// Map a stored name to its public URL.
    ///
    /// Empty input maps to an empty string, and names that are already
    /// absolute http(s) URLs pass through unchanged (previously migrated
    /// data carries full URLs).
    pub fn public_url(&self, stored_name: &str) -> String {
        if stored_name.is_empty() {
            return String::new();
        }
        if stored_name.starts_with("http://") || stored_name.starts_with("https://") {
            return stored_name.to_string();
        }

        match self.backend {
            StorageBackend::Local => format!("{}/{stored_name}", self.public_base),
            // OSS URL construction waits on the backend itself
            StorageBackend::Oss => String::new(),
        }
    }
}

/// Extract a lowercase file extension, defaulting to "bin".
fn extract_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config(dir: &Path) -> UploadsConfig {
        UploadsConfig {
            backend: "local".to_string(),
            dir: dir.to_string_lossy().into_owned(),
            public_base: "/uploads".to_string(),
            max_upload_size_mb: 10,
        }
    }

    #[test]
    fn test_save_and_url() {
        let temp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(&local_config(temp.path())).unwrap();

        let stored = store.save(b"fake image bytes", "photo.JPG").unwrap();
        assert!(stored.ends_with(".jpg"));
        assert!(temp.path().join(&stored).exists());

        let url = store.public_url(&stored);
        assert_eq!(url, format!("/uploads/{stored}"));
    }

    #[test]
    fn test_rejects_non_image() {
        let temp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(&local_config(temp.path())).unwrap();

        assert!(store.save(b"#!/bin/sh", "script.sh").is_err());
        assert!(store.save(b"bytes", "noextension").is_err());
    }

    #[test]
    fn test_public_url_edge_cases() {
        let temp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(&local_config(temp.path())).unwrap();

        assert_eq!(store.public_url(""), "");
        assert_eq!(
            store.public_url("https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(store.public_url("a.jpg"), "/uploads/a.jpg");
    }

    #[test]
    fn test_oss_backend_is_stubbed() {
        let temp = tempfile::tempdir().unwrap();
        let mut config = local_config(temp.path());
        config.backend = "oss".to_string();
        let store = ImageStore::new(&config).unwrap();

        assert!(store.save(b"bytes", "a.jpg").is_err());
        assert_eq!(store.public_url("a.jpg"), "");
        // Absolute URLs still pass through
        assert_eq!(
            store.public_url("http://cdn/a.jpg"),
            "http://cdn/a.jpg"
        );
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let mut config = local_config(temp.path());
        config.backend = "ftp".to_string();
        assert!(ImageStore::new(&config).is_err());
    }

    #[test]
    fn test_is_image_filename() {
        assert!(ImageStore::is_image_filename("a.png"));
        assert!(ImageStore::is_image_filename("b.jpeg"));
        assert!(!ImageStore::is_image_filename("c.txt"));
        assert!(!ImageStore::is_image_filename("d"));
    }
}
