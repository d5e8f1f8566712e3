//! Map tile storage facade.
//!
//! [`MapStorage`] wires the tile store, the imagery provider, the feature
//! extractor and optional snapshot persistence behind one thread-safe handle.

use crate::builder::MapStorageBuilder;
use crate::config::Config;
use crate::error::{GeoTilesError, Result};
use crate::features::FeatureExtractor;
use crate::import::{ImportActions, ImportMapLayerCommand, build_layer};
use crate::profiles::{ImportProfile, ProfileId, validate_profile_name};
use crate::provider::MapProvider;
use crate::query::{RectangleQuery, SquareQuery, TileResponse};
use crate::storage::{LayerDetails, LayerSummary, StoreStats, TileStore};
use crate::tile::LayerId;
use geotiles_types::coordinate::Coordinate;
use parking_lot::RwLock;
use std::sync::Arc;

mod internal;

pub(crate) use internal::StorageInner;

/// Embedded store of imported map layers.
///
/// Cloning is cheap; clones share the same underlying store.
///
/// # Examples
///
/// ```rust
/// use geotiles::{Coordinate, MapStorage, RectangleQuery, TileSelection};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let storage = MapStorage::memory()?;
/// let profile = storage.create_rectangle_profile(
///     "fields",
///     Coordinate::new(50.0, 30.0),
///     Coordinate::new(49.9, 30.1),
///     None,
/// )?;
/// assert_eq!(storage.profile(profile)?.name, "fields");
///
/// let query = RectangleQuery::new(
///     TileSelection::new([1]),
///     Coordinate::new(50.0, 30.0),
///     Coordinate::new(49.9, 30.1),
/// );
/// assert!(storage.tiles_in_rectangle(&query)?.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MapStorage {
    pub(crate) inner: Arc<RwLock<StorageInner>>,
    pub(crate) provider: Option<Arc<dyn MapProvider>>,
    pub(crate) extractor: Arc<dyn FeatureExtractor>,
    pub(crate) config: Arc<Config>,
}

impl MapStorage {
    pub fn builder() -> MapStorageBuilder {
        MapStorageBuilder::new()
    }

    /// In-memory storage with default configuration and no provider.
    pub fn memory() -> Result<Self> {
        MapStorageBuilder::new().build()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Import a new layer: tile the region, fetch every tile and store the
    /// layer with all its tiles at once.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a malformed command, `Conflict` if the name is
    /// taken, `InvalidRegion` for degenerate regions, and `Provider` or
    /// `Extraction` failures from the collaborators. Nothing is stored on
    /// error. A failed automatic snapshot after the layer is stored is logged
    /// and does not fail the import.
    pub fn import_layer(&self, command: &ImportMapLayerCommand) -> Result<LayerId> {
        command.validate(&self.config.import)?;
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| GeoTilesError::Config("no map provider configured".to_string()))?;

        let layer_id = {
            let mut inner = self.inner.write();
            if inner.store.layer_name_exists(&command.layer_name)? {
                return Err(GeoTilesError::Conflict(format!(
                    "map layer with name '{}' already exists",
                    command.layer_name
                )));
            }
            inner.store.allocate_layer_id()
        };

        let layer = build_layer(layer_id, command, provider.as_ref(), self.extractor.as_ref())
            .inspect_err(|e| log::warn!("import of '{}' failed: {}", command.layer_name, e))?;
        let tile_count = layer.len();

        let mut inner = self.inner.write();
        let id = inner.store.insert_layer(layer)?;
        inner.record_mutation();
        log::info!(
            "imported layer {} '{}' with {} tiles",
            id,
            command.layer_name,
            tile_count
        );
        Ok(id)
    }

    /// Import the region saved in a profile.
    pub fn import_from_profile(
        &self,
        profile_id: ProfileId,
        layer_name: impl Into<String>,
        zoom: f64,
        actions: ImportActions,
    ) -> Result<LayerId> {
        let profile = self.profile(profile_id)?;
        let command = ImportMapLayerCommand::new(layer_name, zoom, profile.region())
            .with_actions(actions);
        self.import_layer(&command)
    }

    pub fn list_layers(&self) -> Result<Vec<LayerSummary>> {
        self.inner.read().store.list_layers()
    }

    pub fn layer_details(&self, id: LayerId) -> Result<LayerDetails> {
        self.inner
            .read()
            .store
            .layer_details(id)?
            .ok_or_else(|| GeoTilesError::NotFound(format!("map layer {}", id)))
    }

    pub fn delete_layer(&self, id: LayerId) -> Result<()> {
        let mut inner = self.inner.write();
        let layer = inner.store.delete_layer(id)?;
        inner.record_mutation();
        log::info!("deleted layer {} '{}'", id, layer.name);
        Ok(())
    }

    /// Tiles of the selected layers whose center lies in the rectangle.
    pub fn tiles_in_rectangle(&self, query: &RectangleQuery) -> Result<Vec<TileResponse>> {
        self.inner.read().store.tiles_in_rectangle(query)
    }

    /// Tiles of the selected layers with a corner inside the square.
    pub fn tiles_overlapping_square(&self, query: &SquareQuery) -> Result<Vec<TileResponse>> {
        self.inner.read().store.tiles_overlapping_square(query)
    }

    pub fn create_rectangle_profile(
        &self,
        name: impl Into<String>,
        start: Coordinate,
        end: Coordinate,
        description: Option<String>,
    ) -> Result<ProfileId> {
        let mut profile = ImportProfile::rectangle(name, start, end);
        profile.description = description;
        profile.validate(&self.config.import)?;

        let mut inner = self.inner.write();
        let id = inner.store.insert_profile(profile)?;
        inner.record_mutation();
        Ok(id)
    }

    pub fn rename_profile(&self, id: ProfileId, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_profile_name(&name, &self.config.import)?;

        let mut inner = self.inner.write();
        let mut profile = inner
            .store
            .profile(id)?
            .ok_or_else(|| GeoTilesError::NotFound(format!("import profile {}", id)))?;
        profile.name = name;
        inner.store.update_profile(profile)?;
        inner.record_mutation();
        Ok(())
    }

    pub fn delete_profile(&self, id: ProfileId) -> Result<()> {
        let mut inner = self.inner.write();
        inner.store.delete_profile(id)?;
        inner.record_mutation();
        Ok(())
    }

    pub fn profile(&self, id: ProfileId) -> Result<ImportProfile> {
        self.inner
            .read()
            .store
            .profile(id)?
            .ok_or_else(|| GeoTilesError::NotFound(format!("import profile {}", id)))
    }

    pub fn list_profiles(&self) -> Result<Vec<ImportProfile>> {
        self.inner.read().store.list_profiles()
    }

    pub fn stats(&self) -> StoreStats {
        self.inner.read().store.stats()
    }

    /// Write a snapshot now. Does nothing without a snapshot path.
    #[cfg(feature = "snapshot")]
    pub fn snapshot(&self) -> Result<()> {
        if !self.inner.write().save_snapshot()? {
            log::debug!("snapshot requested but no snapshot path is configured");
        }
        Ok(())
    }
}
