//! Persistence boundary for layers, tiles and import profiles.
//!
//! [`TileStore`] is the contract the import flow and the query API depend
//! on. A store must keep every payload byte-exact across a write/read cycle
//! and must insert a layer with all of its tiles or not at all.

use crate::error::Result;
use crate::layer::{ImportType, Layer, LayerCapabilities};
use crate::profiles::{ImportProfile, ProfileId};
use crate::query::{RectangleQuery, SquareQuery, TileResponse};
use crate::tile::{LayerId, TileId};
use geotiles_types::cell::TileCell;
use serde::{Deserialize, Serialize};

mod memory;
#[cfg(feature = "snapshot")]
pub mod snapshot;

pub use memory::{MemoryStore, StoreState};

#[cfg(feature = "snapshot")]
pub use snapshot::{SnapshotConfig, SnapshotFile};

/// Storage contract for layers, tiles and import profiles.
pub trait TileStore: Send + Sync {
    /// Reserve a fresh layer id; ids are never reused.
    fn allocate_layer_id(&mut self) -> LayerId;

    fn layer_name_exists(&self, name: &str) -> Result<bool>;

    /// Store a layer and all its tiles, assigning tile ids.
    ///
    /// Fails with `Conflict` if the id or name is taken, leaving the store
    /// unchanged.
    fn insert_layer(&mut self, layer: Layer) -> Result<LayerId>;

    /// Remove a layer with all its tiles; `NotFound` for unknown ids.
    fn delete_layer(&mut self, id: LayerId) -> Result<Layer>;

    fn list_layers(&self) -> Result<Vec<LayerSummary>>;

    fn layer_details(&self, id: LayerId) -> Result<Option<LayerDetails>>;

    fn tiles_in_rectangle(&self, query: &RectangleQuery) -> Result<Vec<TileResponse>>;

    fn tiles_overlapping_square(&self, query: &SquareQuery) -> Result<Vec<TileResponse>>;

    /// Store a profile under a fresh id, which is returned.
    fn insert_profile(&mut self, profile: ImportProfile) -> Result<ProfileId>;

    fn profile(&self, id: ProfileId) -> Result<Option<ImportProfile>>;

    /// Replace an existing profile; `NotFound` for unknown ids.
    fn update_profile(&mut self, profile: ImportProfile) -> Result<()>;

    fn delete_profile(&mut self, id: ProfileId) -> Result<ImportProfile>;

    fn list_profiles(&self) -> Result<Vec<ImportProfile>>;

    fn stats(&self) -> StoreStats;
}

/// One row of the layer listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSummary {
    pub id: LayerId,
    pub name: String,
    pub import_type: ImportType,
    pub zoom: f64,
    pub tile_count: usize,
}

/// Tile identity and footprint, without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileFootprint {
    pub id: TileId,
    pub cell: TileCell,
}

/// A layer with the footprints of all its tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDetails {
    pub id: LayerId,
    pub name: String,
    pub description: Option<String>,
    pub import_type: ImportType,
    pub zoom: f64,
    pub capabilities: LayerCapabilities,
    pub tiles: Vec<TileFootprint>,
}

/// Store statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub layer_count: usize,
    pub tile_count: usize,
    pub profile_count: usize,
    /// Approximate bytes held in image payloads.
    pub image_bytes: usize,
    /// Number of mutating operations performed.
    pub operations_count: u64,
}
