//! Upload screen over a filesystem blob store and a few scripted stores.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use blob_upload::{BlobPath, BlobStore, BlobUploadClient, FsBlobStore, UploadError, UploadResult};
use roster_screens::{PickOutcome, UploadScreen, UploadState};
use tempfile::TempDir;
use tokio::sync::Semaphore;
use url::Url;

fn base_url() -> Url {
    Url::parse("http://localhost:9199/blobs/").unwrap()
}

struct Fixture {
    _root: TempDir,
    source_dir: TempDir,
    screen: UploadScreen,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let source_dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(root.path(), base_url());
        let screen = UploadScreen::new(BlobUploadClient::new(Arc::new(store)));
        Self {
            _root: root,
            source_dir,
            screen,
        }
    }

    fn source(&self, name: &str) -> std::path::PathBuf {
        let path = self.source_dir.path().join(name);
        std::fs::write(&path, b"image bytes").unwrap();
        path
    }
}

/// Blocks every write until a permit is added.
struct GatedStore {
    gate: Arc<Semaphore>,
}

#[async_trait]
impl BlobStore for GatedStore {
    async fn put_file(&self, _path: &BlobPath, _source: &Path) -> UploadResult<u64> {
        let _permit = self.gate.acquire().await;
        Ok(0)
    }

    async fn download_url(&self, path: &BlobPath) -> UploadResult<Url> {
        Ok(base_url().join(path.as_str()).unwrap())
    }
}

/// Stores fine but never resolves a reference.
struct UnresolvableStore;

#[async_trait]
impl BlobStore for UnresolvableStore {
    async fn put_file(&self, _path: &BlobPath, _source: &Path) -> UploadResult<u64> {
        Ok(0)
    }

    async fn download_url(&self, path: &BlobPath) -> UploadResult<Url> {
        Err(UploadError::Resolve {
            path: path.to_string(),
            reason: "bucket offline".to_string(),
        })
    }
}

#[tokio::test]
async fn starts_idle() {
    let mut fixture = Fixture::new();
    assert_eq!(fixture.screen.state(), UploadState::Idle);
    assert!(fixture.screen.take_message().is_none());
}

#[tokio::test]
async fn successful_upload_displays_reference() {
    let mut fixture = Fixture::new();
    let source = fixture.source("cat.png");

    assert_eq!(fixture.screen.pick(&source), PickOutcome::Started);
    assert!(matches!(
        fixture.screen.state(),
        UploadState::Uploading { source: s } if s == source
    ));

    match fixture.screen.settle().await {
        UploadState::Displaying(reference) => {
            let url = reference.url.as_str();
            assert!(url.contains("images/"));
            assert!(url.ends_with(".jpg"));
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(fixture.screen.take_message().as_deref(), Some("Upload successful"));
    assert!(fixture.screen.take_message().is_none());
}

#[tokio::test]
async fn each_upload_gets_a_new_path() {
    let mut fixture = Fixture::new();
    let source = fixture.source("cat.jpg");

    fixture.screen.pick(&source);
    fixture.screen.settle().await;
    let first = fixture.screen.displayed().cloned().unwrap();

    fixture.screen.pick(&source);
    fixture.screen.settle().await;
    let second = fixture.screen.displayed().cloned().unwrap();

    assert_ne!(first.path, second.path);
}

#[tokio::test]
async fn failed_upload_shows_message_and_keeps_previous_image() {
    let mut fixture = Fixture::new();
    let source = fixture.source("cat.jpg");
    fixture.screen.pick(&source);
    fixture.screen.settle().await;
    let shown = fixture.screen.displayed().cloned().unwrap();
    fixture.screen.take_message();

    fixture.screen.pick(fixture.source_dir.path().join("missing.jpg"));
    let state = fixture.screen.settle().await;
    assert_eq!(state, UploadState::Displaying(&shown));

    let message = fixture.screen.take_message().unwrap();
    assert!(message.starts_with("Upload failed:"), "{message}");
}

#[tokio::test]
async fn unresolvable_reference_is_an_upload_failure() {
    let mut screen = UploadScreen::new(BlobUploadClient::new(Arc::new(UnresolvableStore)));

    screen.pick("/any/file.jpg");
    assert_eq!(screen.settle().await, UploadState::Idle);

    let message = screen.take_message().unwrap();
    assert!(message.contains("bucket offline"), "{message}");
}

#[test]
fn pick_outside_runtime_fails_without_panicking() {
    let root = tempfile::tempdir().unwrap();
    let store = FsBlobStore::new(root.path(), base_url());
    let mut screen = UploadScreen::new(BlobUploadClient::new(Arc::new(store)));

    assert_eq!(screen.pick("/cat.jpg"), PickOutcome::NoRuntime);
    assert_eq!(screen.state(), UploadState::Idle);

    let message = screen.take_message().unwrap();
    assert!(message.starts_with("Upload failed:"), "{message}");
}

#[tokio::test]
async fn pick_while_uploading_is_rejected() {
    let gate = Arc::new(Semaphore::new(0));
    let store = GatedStore {
        gate: Arc::clone(&gate),
    };
    let mut screen = UploadScreen::new(BlobUploadClient::new(Arc::new(store)));

    assert_eq!(screen.pick("/first.jpg"), PickOutcome::Started);
    assert_eq!(screen.pick("/second.jpg"), PickOutcome::Busy);
    assert!(matches!(
        screen.poll().await,
        UploadState::Uploading { source } if source == Path::new("/first.jpg")
    ));

    gate.add_permits(1);
    match screen.settle().await {
        UploadState::Displaying(_) => {}
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(screen.pick("/third.jpg"), PickOutcome::Started);
}
