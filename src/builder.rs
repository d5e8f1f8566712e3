//! Storage builder for flexible configuration
//!
//! Wires the imagery provider, the feature extractor and an optional
//! snapshot path into a [`MapStorage`].

use crate::config::Config;
use crate::db::{MapStorage, StorageInner};
use crate::error::{GeoTilesError, Result};
use crate::features::{FeatureExtractor, UnconfiguredExtractor};
use crate::provider::{GoogleStaticMapsProvider, HttpClient, MapProvider};
#[cfg(feature = "snapshot")]
use crate::storage::SnapshotFile;
use parking_lot::RwLock;
#[cfg(feature = "snapshot")]
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for [`MapStorage`].
pub struct MapStorageBuilder {
    #[cfg(feature = "snapshot")]
    snapshot_path: Option<PathBuf>,
    config: Config,
    provider: Option<Arc<dyn MapProvider>>,
    extractor: Option<Arc<dyn FeatureExtractor>>,
}

impl MapStorageBuilder {
    /// In-memory storage with default configuration, no provider and no
    /// feature extractor.
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "snapshot")]
            snapshot_path: None,
            config: Config::default(),
            provider: None,
            extractor: None,
        }
    }

    /// Set the snapshot path. An existing snapshot is loaded on build.
    #[cfg(feature = "snapshot")]
    pub fn snapshot_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn provider<P: MapProvider + 'static>(mut self, provider: P) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Use Google Static Maps over `http_client`, configured from the
    /// provider section of the current config.
    pub fn google_static_maps<C: HttpClient + 'static>(self, http_client: C) -> Result<Self> {
        let provider = GoogleStaticMapsProvider::from_config(http_client, &self.config.provider)?;
        Ok(self.provider(provider))
    }

    pub fn feature_extractor<E: FeatureExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    /// Build the storage. Loads the snapshot if one is configured and exists.
    pub fn build(self) -> Result<MapStorage> {
        self.config.validate().map_err(GeoTilesError::Config)?;

        #[allow(unused_mut)]
        let mut inner = StorageInner::new();

        #[cfg(feature = "snapshot")]
        if let Some(snapshot_path) = self.snapshot_path {
            let snapshot_file = SnapshotFile::new(&snapshot_path, self.config.snapshot.clone());
            inner.load_from_snapshot(&snapshot_file)?;
            inner.snapshot_file = Some(snapshot_file);
        }

        Ok(MapStorage {
            inner: Arc::new(RwLock::new(inner)),
            provider: self.provider,
            extractor: self
                .extractor
                .unwrap_or_else(|| Arc::new(UnconfiguredExtractor)),
            config: Arc::new(self.config),
        })
    }
}

impl Default for MapStorageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::provider::HttpResponse;

    struct NoopClient;

    impl HttpClient for NoopClient {
        fn get(&self, _url: &str) -> Result<HttpResponse> {
            Ok(HttpResponse::new(200, &b"img"[..]))
        }
    }

    #[test]
    fn test_builder_default() {
        let storage = MapStorageBuilder::new().build().unwrap();
        assert!(storage.provider.is_none());
        assert_eq!(storage.stats().layer_count, 0);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let mut config = Config::default();
        config.provider.max_tile_size_px = 0;
        assert!(matches!(
            MapStorageBuilder::new().config(config).build(),
            Err(GeoTilesError::Config(_))
        ));
    }

    #[test]
    fn test_google_provider_needs_api_key() {
        assert!(MapStorageBuilder::new().google_static_maps(NoopClient).is_err());

        let config = Config::default().with_provider(ProviderConfig::default().with_api_key("k"));
        let storage = MapStorageBuilder::new()
            .config(config)
            .google_static_maps(NoopClient)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(storage.provider.as_ref().unwrap().max_tile_size_px(), 640);
    }

    #[cfg(feature = "snapshot")]
    #[test]
    fn test_builder_with_snapshot_path() {
        use geotiles_types::coordinate::Coordinate;
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tiles.snap");

        let storage = MapStorageBuilder::new().snapshot_path(&path).build().unwrap();
        storage
            .create_rectangle_profile("p", Coordinate::new(1.0, 1.0), Coordinate::new(0.0, 2.0), None)
            .unwrap();
        storage.snapshot().unwrap();

        let reopened = MapStorageBuilder::new().snapshot_path(&path).build().unwrap();
        assert_eq!(reopened.list_profiles().unwrap().len(), 1);
    }
}
