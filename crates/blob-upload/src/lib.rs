//! Blob upload: one local file to `images/<uuid>.jpg`, then a download
//! reference for it.
//!
//! ```text
//! BlobUploadClient::upload(source)
//!   → BlobPath::random_image()
//!   → BlobStore::put_file      (stream the bytes)
//!   → BlobStore::download_url  (resolve a fetchable reference)
//! ```
//!
//! Either step failing yields a single [`UploadError`]. Nothing is retried.

mod client;
mod path;
mod store;

pub use client::{BlobUploadClient, DownloadReference};
pub use path::BlobPath;
pub use store::{BlobStore, FsBlobStore};

use std::io;
use std::path::PathBuf;

/// Errors from uploading a blob.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write blob {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to resolve download reference for {path}: {reason}")]
    Resolve { path: String, reason: String },
}

/// Result type alias using UploadError.
pub type UploadResult<T> = Result<T, UploadError>;
