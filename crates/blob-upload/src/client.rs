use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use url::Url;

use crate::path::BlobPath;
use crate::store::BlobStore;
use crate::UploadResult;

/// A stored blob and where to fetch it from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadReference {
    pub path: BlobPath,
    pub url: Url,
}

impl fmt::Display for DownloadReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Uploads single images to a [`BlobStore`].
#[derive(Clone)]
pub struct BlobUploadClient {
    store: Arc<dyn BlobStore>,
}

impl BlobUploadClient {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Stores `source` under a fresh `images/<uuid>.jpg` path and resolves
    /// its download reference.
    pub async fn upload(&self, source: &Path) -> UploadResult<DownloadReference> {
        let path = BlobPath::random_image();
        info!(source = %source.display(), blob = %path, "uploading image");

        match self.store_and_resolve(&path, source).await {
            Ok(url) => {
                info!(blob = %path, url = %url, "upload finished");
                Ok(DownloadReference { path, url })
            }
            Err(e) => {
                warn!(blob = %path, error = %e, "upload failed");
                Err(e)
            }
        }
    }

    async fn store_and_resolve(&self, path: &BlobPath, source: &Path) -> UploadResult<Url> {
        self.store.put_file(path, source).await?;
        self.store.download_url(path).await
    }
}
