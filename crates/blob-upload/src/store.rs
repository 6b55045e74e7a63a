//! Blob storage backends.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

use crate::path::BlobPath;
use crate::{UploadError, UploadResult};

/// A store that accepts whole files and hands out download references.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Streams `source` into the store at `path`. Returns bytes written.
    async fn put_file(&self, path: &BlobPath, source: &Path) -> UploadResult<u64>;

    /// A fetchable reference to a blob that has already been stored.
    async fn download_url(&self, path: &BlobPath) -> UploadResult<Url>;
}

/// Blobs as files under a root directory, referenced under a base URL.
///
/// Writes land in a temporary sibling first and are renamed into place, so
/// a reader never sees a partial blob.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
    root: PathBuf,
    base_url: Url,
}

impl FsBlobStore {
    /// `base_url` must end in `/` for references to nest under it.
    pub fn new(root: impl Into<PathBuf>, base_url: Url) -> Self {
        Self {
            root: root.into(),
            base_url,
        }
    }

    /// Where `path` lives on disk.
    pub fn file_path(&self, path: &BlobPath) -> PathBuf {
        path.segments()
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    async fn write_atomic(&self, target: &Path, source: &Path) -> io::Result<u64> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut part = target.as_os_str().to_owned();
        part.push(".part");
        let tmp_path = PathBuf::from(part);

        let result: io::Result<u64> = async {
            let mut input = fs::File::open(source).await?;
            let mut output = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&tmp_path)
                .await?;
            let written = tokio::io::copy(&mut input, &mut output).await?;
            output.flush().await?;
            output.sync_all().await?;
            fs::rename(&tmp_path, target).await?;
            Ok(written)
        }
        .await;

        if result.is_err() {
            let _ = fs::remove_file(&tmp_path).await;
        }
        result
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put_file(&self, path: &BlobPath, source: &Path) -> UploadResult<u64> {
        let metadata = fs::metadata(source).await.map_err(|e| UploadError::Read {
            path: source.to_path_buf(),
            source: e,
        })?;
        if !metadata.is_file() {
            return Err(UploadError::Read {
                path: source.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a file"),
            });
        }

        let target = self.file_path(path);
        let written = self
            .write_atomic(&target, source)
            .await
            .map_err(|e| UploadError::Write {
                path: path.to_string(),
                source: e,
            })?;

        debug!(blob = %path, bytes = written, "blob stored");
        Ok(written)
    }

    async fn download_url(&self, path: &BlobPath) -> UploadResult<Url> {
        let resolve_error = |reason: String| UploadError::Resolve {
            path: path.to_string(),
            reason,
        };

        let exists = fs::try_exists(self.file_path(path))
            .await
            .map_err(|e| resolve_error(e.to_string()))?;
        if !exists {
            return Err(resolve_error("blob does not exist".to_string()));
        }

        self.base_url
            .join(path.as_str())
            .map_err(|e| resolve_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn base_url() -> Url {
        Url::parse("http://localhost:9199/blobs/").unwrap()
    }

    #[tokio::test]
    async fn put_file_copies_bytes_under_root() {
        let src_dir = tempdir().unwrap();
        let root = tempdir().unwrap();
        let source = src_dir.path().join("photo.png");
        std::fs::write(&source, b"not really a png").unwrap();

        let store = FsBlobStore::new(root.path(), base_url());
        let path = BlobPath::random_image();
        let written = store.put_file(&path, &source).await.unwrap();

        assert_eq!(written, 16);
        let target = store.file_path(&path);
        assert!(target.starts_with(root.path().join("images")));
        assert_eq!(std::fs::read(&target).unwrap(), b"not really a png");
        let leftovers = std::fs::read_dir(root.path().join("images")).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[tokio::test]
    async fn put_file_missing_source_is_read_error() {
        let root = tempdir().unwrap();
        let store = FsBlobStore::new(root.path(), base_url());
        let path = BlobPath::random_image();

        let result = store.put_file(&path, Path::new("/definitely/not/here.jpg")).await;
        assert!(matches!(result, Err(UploadError::Read { .. })));
        assert!(!store.file_path(&path).exists());
    }

    #[tokio::test]
    async fn put_file_directory_source_is_read_error() {
        let root = tempdir().unwrap();
        let store = FsBlobStore::new(root.path(), base_url());
        let path = BlobPath::random_image();

        let result = store.put_file(&path, root.path()).await;
        assert!(matches!(result, Err(UploadError::Read { .. })));
    }

    #[tokio::test]
    async fn download_url_nests_under_base() {
        let src_dir = tempdir().unwrap();
        let root = tempdir().unwrap();
        let source = src_dir.path().join("a.jpg");
        std::fs::write(&source, b"x").unwrap();

        let store = FsBlobStore::new(root.path(), base_url());
        let path = BlobPath::random_image();
        store.put_file(&path, &source).await.unwrap();

        let url = store.download_url(&path).await.unwrap();
        assert_eq!(
            url.as_str(),
            format!("http://localhost:9199/blobs/{path}")
        );
    }

    #[tokio::test]
    async fn download_url_for_missing_blob_fails() {
        let root = tempdir().unwrap();
        let store = FsBlobStore::new(root.path(), base_url());
        let path = BlobPath::random_image();

        let result = store.download_url(&path).await;
        assert!(matches!(result, Err(UploadError::Resolve { .. })));
    }
}
