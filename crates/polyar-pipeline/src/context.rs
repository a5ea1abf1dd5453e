use std::path::PathBuf;
use std::sync::Arc;

use polyar_assets::AssetStore;
use polyar_catalog::{AssetFetcher, AssetLocator, CatalogClient, CatalogConfig, CatalogError};
use polyar_scene::{Presentation, SceneInsert, SceneLoader};

/// Everything a pipeline stage needs, passed explicitly instead of living
/// in shared view state.
#[derive(Clone)]
pub struct PipelineContext {
    pub locator: AssetLocator,
    pub catalog: CatalogClient,
    pub fetcher: AssetFetcher,
    pub store: AssetStore,
    pub loader: SceneLoader,
}

impl PipelineContext {
    /// Wire up the stages around one HTTP client, one storage root and one
    /// scene-insertion capability.
    pub fn new(
        config: &CatalogConfig,
        storage_root: impl Into<PathBuf>,
        scene: Arc<dyn SceneInsert>,
        presentation: Presentation,
    ) -> Result<Self, CatalogError> {
        let http = CatalogClient::http_client(config)?;
        let locator = AssetLocator::from_config(config)?;
        let store = AssetStore::new(storage_root);
        let fetcher = AssetFetcher::new(http.clone(), store.staging_dir());

        Ok(Self {
            locator,
            catalog: CatalogClient::new(http),
            fetcher,
            store,
            loader: SceneLoader::new(scene, presentation),
        })
    }
}
