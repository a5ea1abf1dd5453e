use std::sync::mpsc;
use std::sync::Arc;

use polyar_core::AssetIdentifier;

use crate::pipeline::{AssetPipeline, PipelineReport};

/// Progress of a [`PendingRun`]
#[derive(Debug)]
pub enum RunStatus {
    Running,
    Finished(PipelineReport),
    /// The run was torn down without producing a report
    Abandoned,
}

/// A non-blocking handle to an in-flight pipeline run.
/// Call `try_recv()` each frame to check for the report without blocking
/// the render loop.
pub struct PendingRun {
    receiver: mpsc::Receiver<PipelineReport>,
}

impl PendingRun {
    /// Non-blocking check for the report. Returns `None` while still running.
    pub fn try_recv(&self) -> Option<PipelineReport> {
        self.receiver.try_recv().ok()
    }

    /// Like `try_recv`, but tells a still-running run apart from one that
    /// can no longer finish.
    pub fn poll(&self) -> RunStatus {
        match self.receiver.try_recv() {
            Ok(report) => RunStatus::Finished(report),
            Err(mpsc::TryRecvError::Empty) => RunStatus::Running,
            Err(mpsc::TryRecvError::Disconnected) => RunStatus::Abandoned,
        }
    }

    /// Blocking wait for the report. `None` if the run was torn down
    /// (runtime shut down) before finishing.
    pub fn wait(self) -> Option<PipelineReport> {
        self.receiver.recv().ok()
    }
}

/// Owns a background tokio runtime and dispatches pipeline runs onto it.
pub struct PipelineClient {
    runtime: tokio::runtime::Runtime,
    pipeline: Arc<AssetPipeline>,
}

impl PipelineClient {
    pub fn new(pipeline: AssetPipeline) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("polyar-pipeline")
            .enable_all()
            .build()?;

        Ok(Self {
            runtime,
            pipeline: Arc::new(pipeline),
        })
    }

    /// Start a fresh run for `identifier`.
    pub fn run(&self, identifier: AssetIdentifier) -> PendingRun {
        let (tx, rx) = mpsc::channel();
        let pipeline = Arc::clone(&self.pipeline);

        self.runtime.spawn(async move {
            let report = pipeline.run(&identifier).await;
            let _ = tx.send(report);
        });

        PendingRun { receiver: rx }
    }
}
