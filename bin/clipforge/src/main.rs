//! # Clipforge Binary
//!
//! The composition root: assembles the store, pipeline and session from
//! compile-time features and settings, then turns each video path given on
//! the command line into a stored project plus a downloadable report.
//! Without arguments it lists the stored projects.

mod probe;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use cf_app::Studio;
use cf_core::format::format_file_size;
use cf_core::traits::{KeyValueStore, SessionProvider};
use cf_pipeline::{Pipeline, PipelineConfig, ProgressProfile};
use cf_store::{JsonProjectPersistence, ProjectStore};
use configs::{LogSettings, PipelineSettings, Settings, StorageSettings};
use secrecy::ExposeSecret;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "storage-local")]
use cf_storage_local::LocalKeyValueStore;

#[cfg(all(feature = "storage-memory", not(feature = "storage-local")))]
use cf_storage_memory::MemoryKeyValueStore;

#[cfg(feature = "auth-simple")]
use cf_auth_simple::SimpleSessionProvider;

#[cfg(not(any(feature = "storage-local", feature = "storage-memory")))]
compile_error!("enable one of the `storage-local` or `storage-memory` features");

#[cfg(not(feature = "auth-simple"))]
compile_error!("the `auth-simple` feature is required");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_tracing(&settings.log)?;

    // 1. Storage
    let persistence = JsonProjectPersistence::new(build_kv(&settings.storage), settings.storage.key.clone());
    let store = Arc::new(ProjectStore::new(Arc::new(persistence)));
    store.initialize().await;

    // 2. Pipeline
    let pipeline = Arc::new(Pipeline::new(pipeline_config(&settings.pipeline)?));

    // 3. Session
    let session = SimpleSessionProvider::new();
    session
        .sign_up(&settings.account.email, settings.account.password.expose_secret())
        .await
        .context("signing in the configured account")?;

    let studio = Studio::new(store, pipeline, Arc::new(session));
    info!("🎬 Clipforge ready");

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        return list_projects(&studio).await;
    }

    let report_dir = PathBuf::from(&settings.report.dir);
    let mut failures = 0;
    for path in &paths {
        if let Err(err) = process(&studio, path, &report_dir).await {
            error!(path = %path.display(), error = %err, "could not generate shorts");
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} file(s) failed", paths.len());
    }
    Ok(())
}

fn init_tracing(log: &LogSettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&log.filter).context("parsing log filter")?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[cfg(feature = "storage-local")]
fn build_kv(storage: &StorageSettings) -> Arc<dyn KeyValueStore> {
    Arc::new(LocalKeyValueStore::new(&storage.dir))
}

#[cfg(all(feature = "storage-memory", not(feature = "storage-local")))]
fn build_kv(_storage: &StorageSettings) -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryKeyValueStore::new())
}

fn pipeline_config(pipeline: &PipelineSettings) -> anyhow::Result<PipelineConfig> {
    Ok(PipelineConfig {
        upload: ProgressProfile::new(
            Duration::from_millis(pipeline.upload_interval_ms),
            pipeline.min_increment,
            pipeline.upload_max_increment,
        )?,
        processing: ProgressProfile::new(
            Duration::from_millis(pipeline.processing_interval_ms),
            pipeline.min_increment,
            pipeline.processing_max_increment,
        )?,
        seed: pipeline.seed,
        video_url: pipeline.video_url(),
    })
}

async fn process(studio: &Studio, path: &Path, report_dir: &Path) -> anyhow::Result<()> {
    let file = probe::probe(path).await?;
    studio.select(&file)?;
    info!(file = %file.name, size = %format_file_size(file.size), "processing video");

    let (tx, mut rx) = mpsc::unbounded_channel::<cf_pipeline::ProgressEvent>();
    // Log at every quarter so the terminal isn't flooded with ticks
    let reporter = tokio::spawn(async move {
        let mut last_quarter = None;
        while let Some(event) = rx.recv().await {
            let quarter = (event.percent / 25.0).floor() as u8;
            if last_quarter != Some((event.phase, quarter)) {
                last_quarter = Some((event.phase, quarter));
                info!(phase = %event.phase, percent = event.percent.round(), "progress");
            }
        }
    });

    let generation = studio.generate(&file, Some(&tx)).await;
    drop(tx);
    finish_reporter(reporter).await;
    let generation = generation?;

    let report = generation.report().write_to(report_dir).await?;
    println!(
        "{} -> project {} ({} shorts), report {}",
        file.name,
        generation.project.id,
        generation.project.shorts.len(),
        report.display()
    );
    Ok(())
}

/// Waits for the progress logger. A failed logger costs log lines, not the run.
async fn finish_reporter(reporter: JoinHandle<()>) -> bool {
    match reporter.await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "progress reporter failed");
            false
        }
    }
}

async fn list_projects(studio: &Studio) -> anyhow::Result<()> {
    let projects = studio.projects().await?;
    if projects.is_empty() {
        println!("No projects yet. Pass one or more video files to generate shorts.");
        return Ok(());
    }
    for project in projects {
        println!(
            "{}  {}  {}  {}  {} shorts",
            project.id,
            project.upload_date,
            project.title,
            project.file_size,
            project.shorts.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_finish_reporter_reports_task_failure() {
        assert!(finish_reporter(tokio::spawn(async {})).await);

        let panicked = tokio::spawn(async { panic!("logger blew up") });
        assert!(!finish_reporter(panicked).await);

        let aborted = tokio::spawn(std::future::pending::<()>());
        aborted.abort();
        assert!(!finish_reporter(aborted).await);
    }
}
