//! Map layer import: validate a command, tile its region, fetch imagery and
//! assemble the layer.

use crate::config::ImportConfig;
use crate::error::{GeoTilesError, Result};
use crate::features::FeatureExtractor;
use crate::grid::{ImportRegion, build_tiles_grid};
use crate::layer::{FastParams, Layer, LayerCapabilities, SurfParams};
use crate::provider::{MAX_ZOOM, MapProvider};
use crate::tile::{LayerId, Tile};
use serde::{Deserialize, Serialize};

/// What to keep for every imported tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImportActions {
    #[serde(default = "ImportActions::default_save_image")]
    pub save_image: bool,
    #[serde(default)]
    pub surf: Option<SurfParams>,
    #[serde(default)]
    pub fast: Option<FastParams>,
}

impl ImportActions {
    const fn default_save_image() -> bool {
        true
    }

    pub fn without_image(mut self) -> Self {
        self.save_image = false;
        self
    }

    pub fn with_surf(mut self, params: SurfParams) -> Self {
        self.surf = Some(params);
        self
    }

    pub fn with_fast(mut self, params: FastParams) -> Self {
        self.fast = Some(params);
        self
    }

    pub fn capabilities(&self) -> LayerCapabilities {
        LayerCapabilities {
            save_images: self.save_image,
            surf: self.surf,
            fast: self.fast,
        }
    }
}

impl Default for ImportActions {
    fn default() -> Self {
        Self {
            save_image: Self::default_save_image(),
            surf: None,
            fast: None,
        }
    }
}

/// Request to import a new map layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportMapLayerCommand {
    pub layer_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub zoom: f64,
    pub region: ImportRegion,
    #[serde(default)]
    pub actions: ImportActions,
}

impl ImportMapLayerCommand {
    pub fn new(layer_name: impl Into<String>, zoom: f64, region: ImportRegion) -> Self {
        Self {
            layer_name: layer_name.into(),
            description: None,
            zoom,
            region,
            actions: ImportActions::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_actions(mut self, actions: ImportActions) -> Self {
        self.actions = actions;
        self
    }

    /// Checks field limits before any imagery is fetched.
    pub fn validate(&self, limits: &ImportConfig) -> Result<()> {
        let name_len = self.layer_name.chars().count();
        if name_len == 0 || name_len > limits.max_layer_name_len {
            return Err(GeoTilesError::InvalidInput(format!(
                "layer name must be 1 to {} characters, got {}",
                limits.max_layer_name_len, name_len
            )));
        }

        if let Some(description) = &self.description
            && description.chars().count() > limits.max_description_len
        {
            return Err(GeoTilesError::InvalidInput(format!(
                "description must be at most {} characters",
                limits.max_description_len
            )));
        }

        if !self.zoom.is_finite() || !(0.0..=MAX_ZOOM).contains(&self.zoom) {
            return Err(GeoTilesError::InvalidInput(format!(
                "zoom level must be within 0..={}, got {}",
                MAX_ZOOM, self.zoom
            )));
        }

        if let ImportRegion::Polyline {
            waypoints,
            load_distance_m,
        } = &self.region
        {
            if waypoints.len() < 2 {
                return Err(GeoTilesError::InvalidInput(
                    "polyline import needs at least two waypoints".to_string(),
                ));
            }
            if waypoints.iter().any(|w| !w.is_finite()) {
                return Err(GeoTilesError::InvalidInput(
                    "polyline waypoints must be finite".to_string(),
                ));
            }
            if load_distance_m.is_nan() || *load_distance_m < limits.min_load_distance_m {
                return Err(GeoTilesError::InvalidInput(format!(
                    "load distance must be at least {} m, got {}",
                    limits.min_load_distance_m, load_distance_m
                )));
            }
        }

        if let Some(surf) = &self.actions.surf
            && surf.hessian_threshold < 1
        {
            return Err(GeoTilesError::InvalidInput(
                "SURF hessian threshold must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Fetch and assemble every tile of a new layer.
///
/// Imagery is requested at each cell center with the grid's pixel size.
/// Requested features are extracted from the fetched image even when the
/// image itself is not kept. Any failure aborts the whole layer.
pub fn build_layer(
    id: LayerId,
    command: &ImportMapLayerCommand,
    provider: &dyn MapProvider,
    extractor: &dyn FeatureExtractor,
) -> Result<Layer> {
    let meters_per_pixel = provider.meters_per_pixel(command.zoom)?;
    let grid = build_tiles_grid(&command.region, meters_per_pixel, provider.max_tile_size_px())?;
    log::info!(
        "importing layer '{}' from {}: {} tiles of {}x{} px at zoom {}",
        command.layer_name,
        provider.name(),
        grid.len(),
        grid.tile_width_px(),
        grid.tile_height_px(),
        command.zoom
    );

    let actions = &command.actions;
    let mut layer = Layer::new(
        id,
        command.layer_name.clone(),
        command.zoom,
        command.region.import_type(),
        actions.capabilities(),
    );
    if let Some(description) = &command.description {
        layer = layer.with_description(description.clone());
    }

    for (index, cell) in grid.cells().iter().enumerate() {
        let image = provider.load_tile(
            cell.center,
            command.zoom,
            grid.tile_width_px(),
            grid.tile_height_px(),
        )?;
        if image.is_empty() {
            return Err(GeoTilesError::Provider(
                "map provider returned no image".to_string(),
            ));
        }

        let mut tile = Tile::new(*cell).with_image_shape(image.width_px, image.height_px);
        if let Some(params) = &actions.surf {
            tile = tile.with_surf_features(extractor.detect_surf(&image, params)?);
        }
        if let Some(params) = &actions.fast {
            tile = tile.with_corner_keypoints(extractor.detect_corners(&image, params)?);
        }
        if actions.save_image {
            tile = tile.with_image(image);
        }

        layer.add_tile(tile)?;
        log::debug!("tile {}/{} of '{}' ready", index + 1, grid.len(), command.layer_name);
    }

    Ok(layer)
}
