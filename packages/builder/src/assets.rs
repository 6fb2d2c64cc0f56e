//! Filesystem-backed asset store.
//!
//! Uploads land in a single directory under sanitized, collision-free
//! names; the returned path is the public one the content tree references.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use pagecraft_editor::{AssetStore, AssetUpload, StoreError, UploadedAsset};

pub struct FsAssetStore {
    uploads_dir: PathBuf,
    /// Prefix of the public path returned for stored assets
    public_prefix: String,
}

impl FsAssetStore {
    pub fn new(uploads_dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            public_prefix: public_prefix.into(),
        }
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn upload(&self, upload: AssetUpload) -> Result<UploadedAsset, StoreError> {
        tokio::fs::create_dir_all(&self.uploads_dir).await?;

        let (stem, extension) = split_file_name(&upload.file_name);
        let mut file_name = if extension.is_empty() {
            stem.clone()
        } else {
            format!("{stem}.{extension}")
        };
        let mut counter = 1;
        while tokio::fs::try_exists(self.uploads_dir.join(&file_name)).await? {
            file_name = if extension.is_empty() {
                format!("{stem}-{counter}")
            } else {
                format!("{stem}-{counter}.{extension}")
            };
            counter += 1;
        }

        tokio::fs::write(self.uploads_dir.join(&file_name), &upload.bytes).await?;
        info!(file_name, "asset stored");

        Ok(UploadedAsset {
            file_path: format!("{}/{}", self.public_prefix.trim_end_matches('/'), file_name),
        })
    }
}

/// Sanitized (stem, extension) of an uploaded file name
fn split_file_name(file_name: &str) -> (String, String) {
    let trimmed = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let (stem, extension) = match trimmed.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext),
        _ => (trimmed, ""),
    };
    (sanitize(stem, "upload"), sanitize(extension, ""))
}

fn sanitize(part: &str, fallback: &str) -> String {
    let cleaned: String = part
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('-').to_string();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn uploads_get_public_paths_and_unique_names() {
        let dir = TempDir::new().unwrap();
        let store = FsAssetStore::new(dir.path(), "/uploads");

        let first = store
            .upload(AssetUpload {
                file_name: "Hero Image.PNG".to_string(),
                bytes: vec![1, 2, 3],
            })
            .await
            .unwrap();
        assert_eq!(first.file_path, "/uploads/hero-image.png");

        // a second upload with the same name must not clobber the first
        let second = store
            .upload(AssetUpload {
                file_name: "Hero Image.PNG".to_string(),
                bytes: vec![4, 5],
            })
            .await
            .unwrap();
        assert_eq!(second.file_path, "/uploads/hero-image-1.png");

        let stored = std::fs::read(dir.path().join("hero-image.png")).unwrap();
        assert_eq!(stored, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn hostile_file_names_are_neutralized() {
        let dir = TempDir::new().unwrap();
        let store = FsAssetStore::new(dir.path(), "/uploads");

        let asset = store
            .upload(AssetUpload {
                file_name: "../../etc/passwd".to_string(),
                bytes: vec![0],
            })
            .await
            .unwrap();
        // the stored file stays inside the uploads directory
        assert!(asset.file_path.starts_with("/uploads/"));
        assert!(!asset.file_path.contains(".."));
    }
}
