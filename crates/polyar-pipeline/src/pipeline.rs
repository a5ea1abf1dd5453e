use std::path::Path;

use polyar_assets::{classify, StoredAsset};
use polyar_catalog::{destination_key, CatalogError, DownloadHandler, DownloadTask, Url};
use polyar_core::AssetIdentifier;
use tracing::{debug, info, warn};

use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::state::{PipelineState, StateMachine};

/// Per-file stage at which a file's processing stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStage {
    Downloading,
    Storing,
    Placing,
}

/// What happened to one remote file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Stored; not an object file, so nothing further was done
    Stored(StoredAsset),
    /// Stored and inserted into the scene
    Placed(StoredAsset),
    Failed { stage: FileStage, error: PipelineError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub url: Url,
    pub outcome: FileOutcome,
}

/// Structured result of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub identifier: AssetIdentifier,
    pub state: PipelineState,
    /// Every state visited, starting with `Idle`
    pub history: Vec<PipelineState>,
    /// One entry per downloaded URL, in completion order
    pub files: Vec<FileReport>,
}

impl PipelineReport {
    pub fn is_placed(&self) -> bool {
        self.state == PipelineState::Placed
    }

    /// The reason the run failed, if it did
    pub fn error(&self) -> Option<&PipelineError> {
        match &self.state {
            PipelineState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn placed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Placed(_)))
            .count()
    }

    pub fn file(&self, name: &str) -> Option<&FileReport> {
        self.files
            .iter()
            .find(|f| destination_key(&f.url).is_ok_and(|key| key == name))
    }
}

/// Runs identifier → catalog → downloads → storage → scene.
#[derive(Clone)]
pub struct AssetPipeline {
    ctx: PipelineContext,
}

impl AssetPipeline {
    pub fn new(ctx: PipelineContext) -> Self {
        Self { ctx }
    }

    /// Run the whole pipeline for `identifier`. Failures end up in the
    /// report; nothing here panics or affects other runs.
    pub async fn run(&self, identifier: &AssetIdentifier) -> PipelineReport {
        info!("Pipeline started for asset '{}'", identifier);
        let mut run = RunTracker::new();

        run.machine.advance(PipelineState::Resolving);
        let urls = match self.resolve(identifier).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!("Asset '{}' could not be resolved: {}", identifier, e);
                run.machine.fail(e);
                return run.finish(identifier);
            }
        };

        if let Err(e) = self.ctx.store.ensure_dirs() {
            let e = PipelineError::from(e);
            warn!("Storage root unavailable: {}", e);
            run.machine.fail(e);
            return run.finish(identifier);
        }

        run.machine.advance(PipelineState::Fetching);
        debug!("Fetching {} files for '{}'", urls.len(), identifier);
        {
            let mut handler = FileHandler {
                ctx: &self.ctx,
                run: &mut run,
            };
            self.ctx.fetcher.drive(urls, &mut handler).await;
        }

        self.place_objects(&mut run).await;
        run.finish(identifier)
    }

    /// Identifier → catalog URL → catalog entry → file URLs.
    pub async fn resolve(&self, identifier: &AssetIdentifier) -> Result<Vec<Url>, PipelineError> {
        let url = self.ctx.locator.resolve_asset(identifier)?;
        let asset = self.ctx.catalog.lookup(&url).await?;
        Ok(asset.download_urls()?)
    }

    async fn place_objects(&self, run: &mut RunTracker) {
        let objects = std::mem::take(&mut run.objects);
        if objects.is_empty() {
            // Prefer the reason the object file itself went missing.
            let reason = run
                .files
                .iter()
                .find_map(|f| match &f.outcome {
                    FileOutcome::Failed { error, .. }
                        if destination_key(&f.url)
                            .is_ok_and(|key| classify(Path::new(&key)).triggers_placement()) =>
                    {
                        Some(error.clone())
                    }
                    _ => None,
                })
                .unwrap_or_else(|| PipelineError::LoadFailed("asset contains no object file".into()));
            run.machine.fail(reason);
            return;
        }

        let mut first_error = None;
        for (url, stored) in objects {
            run.machine.advance(PipelineState::Placing);
            let outcome = match self.place(&stored).await {
                Ok(()) => FileOutcome::Placed(stored),
                Err(error) => {
                    warn!("Placing {} failed: {}", stored.path.display(), error);
                    first_error.get_or_insert_with(|| error.clone());
                    FileOutcome::Failed {
                        stage: FileStage::Placing,
                        error,
                    }
                }
            };
            run.files.push(FileReport { url, outcome });
        }

        if run.files.iter().any(|f| matches!(f.outcome, FileOutcome::Placed(_))) {
            run.machine.advance(PipelineState::Placed);
        } else if let Some(error) = first_error {
            run.machine.fail(error);
        }
    }

    /// Model parsing and texture decoding run on the blocking pool so they
    /// never hold up downloads on the async workers.
    async fn place(&self, stored: &StoredAsset) -> Result<(), PipelineError> {
        let loader = self.ctx.loader.clone();
        let path = stored.path.clone();
        match tokio::task::spawn_blocking(move || loader.place_in_scene(&path)).await {
            Ok(result) => result.map_err(PipelineError::from),
            Err(e) => Err(PipelineError::LoadFailed(format!("placement task ended: {}", e))),
        }
    }
}

struct RunTracker {
    machine: StateMachine,
    files: Vec<FileReport>,
    /// Object files stored during fetching, placed once fetching ends
    objects: Vec<(Url, StoredAsset)>,
}

impl RunTracker {
    fn new() -> Self {
        Self {
            machine: StateMachine::new(),
            files: Vec::new(),
            objects: Vec::new(),
        }
    }

    fn finish(self, identifier: &AssetIdentifier) -> PipelineReport {
        let (state, history) = self.machine.into_parts();
        info!("Pipeline for '{}' finished: {}", identifier, state);
        PipelineReport {
            identifier: identifier.clone(),
            state,
            history,
            files: self.files,
        }
    }
}

/// Stores and classifies each file as its download completes.
struct FileHandler<'a> {
    ctx: &'a PipelineContext,
    run: &'a mut RunTracker,
}

impl DownloadHandler for FileHandler<'_> {
    fn on_download_complete(&mut self, task: DownloadTask) {
        self.run.machine.advance(PipelineState::Storing);
        let stored = match self.ctx.store.relocate(&task.temp_path, task.destination_key()) {
            Ok(stored) => stored,
            Err(e) => {
                let error = PipelineError::from(e);
                warn!("Storing {} failed: {}", task.url, error);
                self.run.machine.advance(PipelineState::Fetching);
                self.run.files.push(FileReport {
                    url: task.url,
                    outcome: FileOutcome::Failed {
                        stage: FileStage::Storing,
                        error,
                    },
                });
                return;
            }
        };

        self.run.machine.advance(PipelineState::Classifying);
        if stored.role.triggers_placement() {
            debug!("{} is an object file", stored.path.display());
            self.run.objects.push((task.url, stored));
        } else {
            self.run.files.push(FileReport {
                url: task.url,
                outcome: FileOutcome::Stored(stored),
            });
        }
        self.run.machine.advance(PipelineState::Fetching);
    }

    fn on_download_failed(&mut self, url: Url, error: CatalogError) {
        self.run.files.push(FileReport {
            url,
            outcome: FileOutcome::Failed {
                stage: FileStage::Downloading,
                error: error.into(),
            },
        });
    }
}
