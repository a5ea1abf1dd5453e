//! PolyAR - Places a catalog 3D asset in front of the viewer
//!
//! This is the demo entry point. It starts a (headless) tracking session,
//! runs the asset pipeline in the background and drives the scene's update
//! loop until the asset is placed or the pipeline gives up.

mod settings;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use polyar_core::AssetIdentifier;
use polyar_pipeline::{
    AssetPipeline, FileOutcome, PipelineClient, PipelineContext, PipelineReport, RunStatus,
};
use polyar_scene::{scene_channel, HeadlessSession, Presentation, Scene, TrackingSession};

use crate::settings::AppSettings;

/// Target frame time of the headless update loop
const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    let loaded = AppSettings::load();
    let settings = loaded.as_ref().ok().cloned().unwrap_or_default();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    if let Err(e) = &loaded {
        warn!("{:#}; using default settings", e);
    }

    let identifier: AssetIdentifier = std::env::args()
        .nth(1)
        .unwrap_or_else(|| settings.asset.identifier.clone())
        .into();
    let storage_root = settings.storage.resolved_root();
    info!(
        "Starting PolyAR - asset '{}', storage {}",
        identifier,
        storage_root.display()
    );

    let mut session = HeadlessSession::new();
    session.run(settings.session);

    let (queue, inbox) = scene_channel();
    let ctx = PipelineContext::new(
        &settings.catalog,
        storage_root,
        Arc::new(queue),
        Presentation::default(),
    )
    .context("Failed to set up asset pipeline")?;
    let client =
        PipelineClient::new(AssetPipeline::new(ctx)).context("Failed to start pipeline runtime")?;

    let pending = client.run(identifier.clone());
    let mut scene = Scene::new();
    let mut last_frame = Instant::now();

    // Update loop: insertions are only applied here, on the scene's own turn.
    let report = loop {
        let now = Instant::now();
        let delta = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        for id in scene.apply_pending(&inbox) {
            info!("Scene node {} inserted", id.0);
        }
        scene.update(delta);

        match pending.poll() {
            RunStatus::Running => std::thread::sleep(FRAME),
            RunStatus::Finished(report) => break report,
            RunStatus::Abandoned => {
                session.pause();
                anyhow::bail!("Pipeline for '{}' stopped without a report", identifier);
            }
        }
    };
    scene.apply_pending(&inbox);

    log_report(&report);
    info!(
        "Scene has {} node(s) after {:.2}s",
        scene.len(),
        scene.elapsed()
    );
    session.pause();

    match report.error() {
        Some(reason) => Err(anyhow::anyhow!("Asset '{}' was not placed: {}", identifier, reason)),
        None => Ok(()),
    }
}

fn log_report(report: &PipelineReport) {
    for file in &report.files {
        match &file.outcome {
            FileOutcome::Placed(stored) => info!("placed  {}", stored.path.display()),
            FileOutcome::Stored(stored) => {
                info!("stored  {} ({:?})", stored.path.display(), stored.role)
            }
            FileOutcome::Failed { stage, error } => {
                warn!("failed  {} at {:?}: {}", file.url, stage, error)
            }
        }
    }
    if let Some(reason) = report.error() {
        error!("Asset '{}' failed: {}", report.identifier, reason);
    }
}
