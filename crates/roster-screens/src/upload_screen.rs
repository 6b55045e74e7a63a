//! The upload screen: pick an image, upload it, show the result.
//!
//! A pick starts a background upload and returns immediately. While it is
//! in flight further picks are rejected. The outcome is shown as a
//! transient message the front end takes once, and on success the new
//! reference replaces whatever was displayed before. Dropping the screen
//! does not cancel a running upload.

use std::path::{Path, PathBuf};

use blob_upload::{BlobUploadClient, DownloadReference, UploadResult};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What the screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState<'a> {
    Idle,
    Uploading { source: &'a Path },
    Displaying(&'a DownloadReference),
}

/// Result of a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    Started,
    /// Another upload is still running; this pick was dropped.
    Busy,
    /// Called outside a tokio runtime; nothing was started.
    NoRuntime,
}

struct InFlight {
    source: PathBuf,
    task: JoinHandle<UploadResult<DownloadReference>>,
}

pub struct UploadScreen {
    client: BlobUploadClient,
    in_flight: Option<InFlight>,
    displayed: Option<DownloadReference>,
    message: Option<String>,
}

impl UploadScreen {
    pub fn new(client: BlobUploadClient) -> Self {
        Self {
            client,
            in_flight: None,
            displayed: None,
            message: None,
        }
    }

    pub fn state(&self) -> UploadState<'_> {
        match (&self.in_flight, &self.displayed) {
            (Some(upload), _) => UploadState::Uploading {
                source: &upload.source,
            },
            (None, Some(reference)) => UploadState::Displaying(reference),
            (None, None) => UploadState::Idle,
        }
    }

    pub fn displayed(&self) -> Option<&DownloadReference> {
        self.displayed.as_ref()
    }

    /// Takes the pending user message, if any.
    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    /// Starts uploading `source` unless an upload is already running.
    ///
    /// Outside a tokio runtime the pick fails with a message instead.
    pub fn pick(&mut self, source: impl Into<PathBuf>) -> PickOutcome {
        let source = source.into();
        if self.in_flight.is_some() {
            debug!(source = %source.display(), "upload already in progress, pick ignored");
            return PickOutcome::Busy;
        }

        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                self.finish(Err(e.to_string()));
                return PickOutcome::NoRuntime;
            }
        };

        let client = self.client.clone();
        let task_source = source.clone();
        let task = runtime.spawn(async move { client.upload(&task_source).await });
        self.in_flight = Some(InFlight { source, task });
        PickOutcome::Started
    }

    /// Waits for the running upload, if any, and applies its outcome.
    pub async fn settle(&mut self) -> UploadState<'_> {
        if let Some(upload) = self.in_flight.take() {
            let outcome = match upload.task.await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            self.finish(outcome);
        }
        self.state()
    }

    /// Applies the running upload's outcome only if it already finished.
    pub async fn poll(&mut self) -> UploadState<'_> {
        if self
            .in_flight
            .as_ref()
            .is_some_and(|upload| upload.task.is_finished())
        {
            return self.settle().await;
        }
        self.state()
    }

    fn finish(&mut self, outcome: Result<DownloadReference, String>) {
        match outcome {
            Ok(reference) => {
                self.message = Some("Upload successful".to_string());
                self.displayed = Some(reference);
            }
            Err(e) => {
                warn!(error = %e, "image upload failed");
                self.message = Some(format!("Upload failed: {e}"));
            }
        }
    }
}
