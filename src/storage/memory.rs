//! In-memory tile store with R*-tree indexes over tile centers and corners.

use super::{LayerDetails, LayerSummary, StoreStats, TileFootprint, TileStore};
use crate::error::{GeoTilesError, Result};
use crate::layer::Layer;
use crate::profiles::{ImportProfile, ProfileId};
use crate::query::{RectangleQuery, SquareQuery, TileQuery, TileResponse};
use crate::tile::{LayerId, Tile, TileId};
use geotiles_types::bounds::LatLongBounds;
use geotiles_types::coordinate::Coordinate;
use rstar::{AABB, RTree, RTreeObject};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A tile vertex (center or corner) in the R*-tree, as `[lat, long]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedVertex {
    point: [f64; 2],
    layer_id: LayerId,
    tile_index: usize,
}

impl IndexedVertex {
    fn new(at: Coordinate, layer_id: LayerId, tile_index: usize) -> Self {
        Self {
            point: [at.latitude, at.longitude],
            layer_id,
            tile_index,
        }
    }
}

impl RTreeObject for IndexedVertex {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

fn envelope_of(bounds: &LatLongBounds) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [bounds.min_lat(), bounds.min_long()],
        [bounds.max_lat(), bounds.max_long()],
    )
}

fn center_vertices(layer: &Layer) -> impl Iterator<Item = IndexedVertex> + '_ {
    let id = layer.id();
    layer
        .tiles()
        .iter()
        .enumerate()
        .map(move |(i, t)| IndexedVertex::new(t.center(), id, i))
}

fn corner_vertices(layer: &Layer) -> impl Iterator<Item = IndexedVertex> + '_ {
    let id = layer.id();
    layer.tiles().iter().enumerate().flat_map(move |(i, t)| {
        t.vertices()
            .into_iter()
            .map(move |c| IndexedVertex::new(c, id, i))
    })
}

/// Serializable contents of a store, used by snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    pub next_layer_id: LayerId,
    pub next_tile_id: TileId,
    pub next_profile_id: ProfileId,
    pub layers: Vec<Layer>,
    pub profiles: Vec<ImportProfile>,
}

/// In-memory [`TileStore`].
///
/// Layers own their tiles; two R*-trees map tile centers and tile corners
/// back to `(layer, position)` so queries only test nearby tiles.
pub struct MemoryStore {
    layers: FxHashMap<LayerId, Layer>,
    centers: RTree<IndexedVertex>,
    corners: RTree<IndexedVertex>,
    profiles: BTreeMap<ProfileId, ImportProfile>,
    next_layer_id: LayerId,
    next_tile_id: TileId,
    next_profile_id: ProfileId,
    operations_count: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            layers: FxHashMap::default(),
            centers: RTree::new(),
            corners: RTree::new(),
            profiles: BTreeMap::new(),
            next_layer_id: 1,
            next_tile_id: 1,
            next_profile_id: 1,
            operations_count: 0,
        }
    }

    /// Rebuild a store, including its indexes, from saved state.
    pub fn from_state(state: StoreState) -> Self {
        let centers = RTree::bulk_load(state.layers.iter().flat_map(center_vertices).collect());
        let corners = RTree::bulk_load(state.layers.iter().flat_map(corner_vertices).collect());

        let max_layer = state.layers.iter().map(Layer::id).max().unwrap_or(0);
        let max_tile = state
            .layers
            .iter()
            .flat_map(|l| l.tiles().iter().filter_map(Tile::id))
            .max()
            .unwrap_or(0);
        let max_profile = state.profiles.iter().map(|p| p.id).max().unwrap_or(0);

        Self {
            layers: state.layers.into_iter().map(|l| (l.id(), l)).collect(),
            centers,
            corners,
            profiles: state.profiles.into_iter().map(|p| (p.id, p)).collect(),
            next_layer_id: state.next_layer_id.max(max_layer + 1),
            next_tile_id: state.next_tile_id.max(max_tile + 1),
            next_profile_id: state.next_profile_id.max(max_profile + 1),
            operations_count: 0,
        }
    }

    /// Copy of the store contents, layers and profiles ordered by id.
    pub fn to_state(&self) -> StoreState {
        let mut layers: Vec<Layer> = self.layers.values().cloned().collect();
        layers.sort_by_key(Layer::id);
        StoreState {
            next_layer_id: self.next_layer_id,
            next_tile_id: self.next_tile_id,
            next_profile_id: self.next_profile_id,
            layers,
            profiles: self.profiles.values().cloned().collect(),
        }
    }

    /// Borrow a stored layer.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    fn tile(&self, layer_id: LayerId, index: usize) -> Option<&Tile> {
        self.layers.get(&layer_id)?.tiles().get(index)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TileStore for MemoryStore {
    fn allocate_layer_id(&mut self) -> LayerId {
        let id = self.next_layer_id;
        self.next_layer_id += 1;
        id
    }

    fn layer_name_exists(&self, name: &str) -> Result<bool> {
        Ok(self.layers.values().any(|l| l.name == name))
    }

    fn insert_layer(&mut self, mut layer: Layer) -> Result<LayerId> {
        let id = layer.id();
        if self.layers.contains_key(&id) {
            return Err(GeoTilesError::Conflict(format!(
                "layer id {} already exists",
                id
            )));
        }
        if self.layer_name_exists(&layer.name)? {
            return Err(GeoTilesError::Conflict(format!(
                "map layer with name '{}' already exists",
                layer.name
            )));
        }

        for tile in layer.tiles_mut() {
            tile.set_id(self.next_tile_id);
            self.next_tile_id += 1;
        }
        self.next_layer_id = self.next_layer_id.max(id + 1);

        for vertex in center_vertices(&layer) {
            self.centers.insert(vertex);
        }
        for vertex in corner_vertices(&layer) {
            self.corners.insert(vertex);
        }

        log::debug!("stored layer {} '{}' with {} tiles", id, layer.name, layer.len());
        self.layers.insert(id, layer);
        self.operations_count += 1;
        Ok(id)
    }

    fn delete_layer(&mut self, id: LayerId) -> Result<Layer> {
        let layer = self
            .layers
            .remove(&id)
            .ok_or_else(|| GeoTilesError::NotFound(format!("map layer {}", id)))?;

        for vertex in center_vertices(&layer) {
            self.centers.remove(&vertex);
        }
        for vertex in corner_vertices(&layer) {
            self.corners.remove(&vertex);
        }

        self.operations_count += 1;
        Ok(layer)
    }

    fn list_layers(&self) -> Result<Vec<LayerSummary>> {
        let mut layers: Vec<LayerSummary> = self
            .layers
            .values()
            .map(|l| LayerSummary {
                id: l.id(),
                name: l.name.clone(),
                import_type: l.import_type(),
                zoom: l.zoom(),
                tile_count: l.len(),
            })
            .collect();
        layers.sort_by_key(|l| l.id);
        Ok(layers)
    }

    fn layer_details(&self, id: LayerId) -> Result<Option<LayerDetails>> {
        Ok(self.layers.get(&id).map(|l| LayerDetails {
            id: l.id(),
            name: l.name.clone(),
            description: l.description.clone(),
            import_type: l.import_type(),
            zoom: l.zoom(),
            capabilities: *l.capabilities(),
            tiles: l
                .tiles()
                .iter()
                .filter_map(|t| {
                    t.id().map(|id| TileFootprint {
                        id,
                        cell: t.cell,
                    })
                })
                .collect(),
        }))
    }

    fn tiles_in_rectangle(&self, query: &RectangleQuery) -> Result<Vec<TileResponse>> {
        query.validate()?;
        let envelope = envelope_of(&query.bounds());
        let candidates = self
            .centers
            .locate_in_envelope_intersecting(&envelope)
            .filter(|v| query.selection.includes_layer(v.layer_id))
            .filter_map(|v| self.tile(v.layer_id, v.tile_index));
        query.execute(candidates)
    }

    fn tiles_overlapping_square(&self, query: &SquareQuery) -> Result<Vec<TileResponse>> {
        query.validate()?;
        let envelope = envelope_of(&query.bounds());
        let hits: FxHashSet<(LayerId, usize)> = self
            .corners
            .locate_in_envelope_intersecting(&envelope)
            .filter(|v| query.selection.includes_layer(v.layer_id))
            .map(|v| (v.layer_id, v.tile_index))
            .collect();
        let candidates = hits
            .into_iter()
            .filter_map(|(layer_id, index)| self.tile(layer_id, index));
        query.execute(candidates)
    }

    fn insert_profile(&mut self, mut profile: ImportProfile) -> Result<ProfileId> {
        let id = self.next_profile_id;
        self.next_profile_id += 1;
        profile.id = id;
        self.profiles.insert(id, profile);
        self.operations_count += 1;
        Ok(id)
    }

    fn profile(&self, id: ProfileId) -> Result<Option<ImportProfile>> {
        Ok(self.profiles.get(&id).cloned())
    }

    fn update_profile(&mut self, profile: ImportProfile) -> Result<()> {
        let slot = self
            .profiles
            .get_mut(&profile.id)
            .ok_or_else(|| GeoTilesError::NotFound(format!("import profile {}", profile.id)))?;
        *slot = profile;
        self.operations_count += 1;
        Ok(())
    }

    fn delete_profile(&mut self, id: ProfileId) -> Result<ImportProfile> {
        let removed = self
            .profiles
            .remove(&id)
            .ok_or_else(|| GeoTilesError::NotFound(format!("import profile {}", id)))?;
        self.operations_count += 1;
        Ok(removed)
    }

    fn list_profiles(&self) -> Result<Vec<ImportProfile>> {
        Ok(self.profiles.values().cloned().collect())
    }

    fn stats(&self) -> StoreStats {
        StoreStats {
            layer_count: self.layers.len(),
            tile_count: self.layers.values().map(Layer::len).sum(),
            profile_count: self.profiles.len(),
            image_bytes: self
                .layers
                .values()
                .flat_map(|l| l.tiles().iter())
                .filter_map(|t| t.image.as_ref().map(|b| b.len()))
                .sum(),
            operations_count: self.operations_count,
        }
    }
}
