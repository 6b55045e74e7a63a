//! Subcommand handlers. Each one drives a screen the way a user would.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use blob_upload::{BlobUploadClient, FsBlobStore};
use roster_config::{Config, Paths};
use roster_screens::{ActionOutcome, ListChange, StudentsScreen, UploadScreen, UploadState};
use roster_store::{MutationKind, MutationReport, RecordStoreClient, SqliteCollection};
use tracing::info;

use crate::output::{self, OutputFormat};

async fn students_screen(
    config: &Config,
    paths: &Paths,
) -> anyhow::Result<(SqliteCollection, StudentsScreen<SqliteCollection>)> {
    let collection = SqliteCollection::open(&paths.database_file(), config.collection.as_str())
        .await
        .context("failed to open the student database")?;
    let screen = StudentsScreen::new(RecordStoreClient::new(collection.clone()));
    Ok((collection, screen))
}

async fn fill_form(
    config: &Config,
    paths: &Paths,
    name: &str,
    age: &str,
) -> anyhow::Result<StudentsScreen<SqliteCollection>> {
    let (_, mut screen) = students_screen(config, paths).await?;
    screen.form_mut().set_name(name);
    screen.form_mut().set_age_text(age);
    Ok(screen)
}

fn report_outcome(outcome: ActionOutcome, format: OutputFormat) -> anyhow::Result<()> {
    match outcome {
        ActionOutcome::Rejected(e) => bail!(e),
        ActionOutcome::Failed(e) => bail!(e),
        ActionOutcome::Created(id) => {
            output::print_success(&format!("Added student {id}"), format);
            Ok(())
        }
        ActionOutcome::Mutated(report) => report_mutation(&report, format),
    }
}

fn report_mutation(report: &MutationReport, format: OutputFormat) -> anyhow::Result<()> {
    let verb = match report.kind() {
        MutationKind::Delete => "Deleted",
        MutationKind::UpdateAge => "Updated",
    };
    let summary = format!(
        "{verb} {} of {} matching students",
        report.succeeded(),
        report.matched()
    );
    if report.failed() > 0 {
        bail!("{summary}; {} failed", report.failed());
    }
    output::print_success(&summary, format);
    Ok(())
}

pub async fn add(
    config: &Config,
    paths: &Paths,
    name: &str,
    age: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut screen = fill_form(config, paths, name, age).await?;
    report_outcome(screen.on_add().await, format)
}

pub async fn delete(
    config: &Config,
    paths: &Paths,
    name: &str,
    age: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut screen = fill_form(config, paths, name, age).await?;
    report_outcome(screen.on_delete().await, format)
}

pub async fn update(
    config: &Config,
    paths: &Paths,
    name: &str,
    age: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut screen = fill_form(config, paths, name, age).await?;
    report_outcome(screen.on_update().await, format)
}

pub async fn list(config: &Config, paths: &Paths, format: OutputFormat) -> anyhow::Result<()> {
    let (_, mut screen) = students_screen(config, paths).await?;
    screen.start().await;
    screen.pump();
    output::print_students(screen.list().students(), &screen.cards(), format);
    screen.close();
    Ok(())
}

pub async fn watch(
    config: &Config,
    paths: &Paths,
    interval_ms: u64,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (collection, mut screen) = students_screen(config, paths).await?;
    let poller = collection.spawn_change_poller(Duration::from_millis(interval_ms.max(1)));
    screen.start().await;
    info!(collection = %config.collection, "watching for changes");

    loop {
        tokio::select! {
            change = screen.next_event() => match change {
                Some(ListChange::Replaced) => {
                    output::print_divider();
                    output::print_students(screen.list().students(), &screen.cards(), format);
                }
                Some(ListChange::Unchanged) => {}
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.abort();
    screen.close();
    Ok(())
}

pub async fn upload(
    config: &Config,
    paths: &Paths,
    file: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let store = FsBlobStore::new(paths.blobs_dir(), config.download_base_url()?);
    let mut screen = UploadScreen::new(BlobUploadClient::new(Arc::new(store)));

    screen.pick(file);
    let reference = match screen.settle().await {
        UploadState::Displaying(reference) => Some(reference.to_string()),
        _ => None,
    };
    let message = screen.take_message().unwrap_or_default();

    match reference {
        Some(url) => {
            output::print_success(&format!("{message}: {url}"), format);
            Ok(())
        }
        None => bail!(message),
    }
}
