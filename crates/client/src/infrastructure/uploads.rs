//! Load picked files from disk as multipart uploads.

use std::path::{Path, PathBuf};

use greenbidz_domain::{DomainError, Upload};
use thiserror::Error;
use tokio::fs;

/// Largest file the client will send. The server answers 413 above this.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is empty", path.display())]
    Empty { path: PathBuf },

    #[error("{} is {size} bytes, the limit is {limit}", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Read `path` into an [`Upload`] for the form field `field`.
pub async fn load_upload(path: &Path, field: &str) -> Result<Upload, UploadError> {
    let io_err = |source| UploadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = fs::metadata(path).await.map_err(io_err)?.len();
    if size == 0 {
        return Err(UploadError::Empty {
            path: path.to_path_buf(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }

    let bytes = fs::read(path).await.map_err(io_err)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let upload = Upload::guess(field, file_name, bytes)?;
    tracing::debug!(file = %upload.file_name, mime = %upload.mime_type, bytes = upload.len(), "Loaded upload");
    Ok(upload)
}

/// Load several files for the same field, stopping at the first failure.
pub async fn load_uploads(paths: &[PathBuf], field: &str) -> Result<Vec<Upload>, UploadError> {
    let mut uploads = Vec::with_capacity(paths.len());
    for path in paths {
        uploads.push(load_upload(path, field).await?);
    }
    Ok(uploads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_loads_file_with_guessed_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Front.JPG");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let upload = load_upload(&path, "images[]").await.unwrap();
        assert_eq!(upload.field, "images[]");
        assert_eq!(upload.file_name, "Front.JPG");
        assert_eq!(upload.mime_type, "image/jpeg");
        assert_eq!(upload.len(), 3);
    }

    #[tokio::test]
    async fn test_rejects_empty_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.png");
        std::fs::write(&empty, []).unwrap();

        assert!(matches!(
            load_upload(&empty, "avatar").await,
            Err(UploadError::Empty { .. })
        ));
        assert!(matches!(
            load_upload(&dir.path().join("gone.png"), "avatar").await,
            Err(UploadError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.jpg");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(MAX_UPLOAD_BYTES + 1).unwrap();

        assert!(matches!(
            load_upload(&path, "images[]").await,
            Err(UploadError::TooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_uploads_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = ["a.png", "b.webp"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                std::fs::write(&path, [1]).unwrap();
                path
            })
            .collect();

        let uploads = load_uploads(&paths, "images[]").await.unwrap();
        let names: Vec<_> = uploads.iter().map(|u| u.file_name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.webp"]);
        assert_eq!(uploads[1].mime_type, "image/webp");
    }
}
