//! Map layers: the aggregate owning all tiles of one import.

use crate::error::{GeoTilesError, Result};
use crate::tile::{LayerId, Tile};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SURF detector settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfParams {
    pub hessian_threshold: u32,
}

/// FAST / corner detector settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FastParams {
    pub threshold: u32,
    pub nonmax_suppression: bool,
    #[serde(default)]
    pub detector_type: Option<u32>,
}

/// Payloads every tile of a layer carries, fixed when the layer is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerCapabilities {
    pub save_images: bool,
    pub surf: Option<SurfParams>,
    pub fast: Option<FastParams>,
}

impl LayerCapabilities {
    pub fn has_images(&self) -> bool {
        self.save_images
    }

    pub fn has_surf_features(&self) -> bool {
        self.surf.is_some()
    }

    pub fn has_fast_features(&self) -> bool {
        self.fast.is_some()
    }
}

impl Default for LayerCapabilities {
    fn default() -> Self {
        Self {
            save_images: true,
            surf: None,
            fast: None,
        }
    }
}

/// How a layer's grid was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportType {
    Rectangle,
    Polyline,
}

impl fmt::Display for ImportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportType::Rectangle => f.write_str("rectangle"),
            ImportType::Polyline => f.write_str("polyline"),
        }
    }
}

/// A named set of tiles produced by one import.
///
/// Capabilities are fixed at construction. Every tile added must carry
/// exactly the payloads the capabilities promise, never more and never less.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    id: LayerId,
    pub name: String,
    pub description: Option<String>,
    zoom: f64,
    import_type: ImportType,
    capabilities: LayerCapabilities,
    tiles: Vec<Tile>,
}

impl Layer {
    pub fn new(
        id: LayerId,
        name: impl Into<String>,
        zoom: f64,
        import_type: ImportType,
        capabilities: LayerCapabilities,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            zoom,
            import_type,
            capabilities,
            tiles: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn import_type(&self) -> ImportType {
        self.import_type
    }

    pub fn capabilities(&self) -> &LayerCapabilities {
        &self.capabilities
    }

    pub fn has_images(&self) -> bool {
        self.capabilities.has_images()
    }

    pub fn has_surf_features(&self) -> bool {
        self.capabilities.has_surf_features()
    }

    pub fn has_fast_features(&self) -> bool {
        self.capabilities.has_fast_features()
    }

    /// Tiles in insertion order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Appends a tile after checking its payloads against the capabilities.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` when the tile is missing a payload the layer
    /// expects or carries one it does not. The layer is left unchanged.
    pub fn add_tile(&mut self, mut tile: Tile) -> Result<()> {
        check_presence("image", self.has_images(), tile.has_image())?;
        check_presence("surf_features", self.has_surf_features(), tile.has_surf_features())?;
        check_presence(
            "corner_keypoints",
            self.has_fast_features(),
            tile.has_corner_keypoints(),
        )?;

        tile.set_layer_id(self.id);
        self.tiles.push(tile);
        Ok(())
    }
}

fn check_presence(field: &str, expected: bool, present: bool) -> Result<()> {
    match (expected, present) {
        (true, false) => Err(GeoTilesError::InvariantViolation(format!(
            "tile {} expected but not provided",
            field
        ))),
        (false, true) => Err(GeoTilesError::InvariantViolation(format!(
            "tile {} provided when none is expected",
            field
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{KeyPoint, PixelPoint, SurfFeatures, TileImage};
    use geotiles_types::cell::TileCell;
    use geotiles_types::coordinate::Coordinate;

    fn tile() -> Tile {
        Tile::new(TileCell::from_anchor(Coordinate::new(1.0, 1.0), -0.1, 0.1))
    }

    fn image() -> TileImage {
        TileImage::new(vec![0xFFu8, 0xD8], 64, 64)
    }

    fn layer(capabilities: LayerCapabilities) -> Layer {
        Layer::new(7, "layer", 17.0, ImportType::Rectangle, capabilities)
    }

    #[test]
    fn test_image_presence_must_match() {
        let mut without = layer(LayerCapabilities {
            save_images: false,
            ..Default::default()
        });
        let err = without.add_tile(tile().with_image(image())).unwrap_err();
        assert!(matches!(err, GeoTilesError::InvariantViolation(_)));

        let mut with = layer(LayerCapabilities::default());
        let err = with.add_tile(tile()).unwrap_err();
        assert!(matches!(err, GeoTilesError::InvariantViolation(_)));
        assert!(with.is_empty());
    }

    #[test]
    fn test_surf_presence_must_match() {
        let caps = LayerCapabilities {
            save_images: false,
            surf: Some(SurfParams {
                hessian_threshold: 400,
            }),
            fast: None,
        };
        let mut l = layer(caps);
        assert!(l.add_tile(tile()).is_err());
        let features = SurfFeatures::new(vec![KeyPoint::default()], vec![0.0; 64], 64);
        l.add_tile(tile().with_surf_features(features)).unwrap();
        assert_eq!(l.len(), 1);
    }

    #[test]
    fn test_corner_presence_must_match() {
        let mut l = layer(LayerCapabilities {
            save_images: false,
            ..Default::default()
        });
        let err = l
            .add_tile(tile().with_corner_keypoints(vec![PixelPoint::new(1, 2)]))
            .unwrap_err();
        assert!(err.to_string().contains("corner_keypoints"));
    }

    #[test]
    fn test_add_tile_stamps_layer_and_keeps_order() {
        let mut l = layer(LayerCapabilities::default());
        for i in 0..3 {
            let t = Tile::new(TileCell::from_anchor(Coordinate::new(i as f64, 0.0), -1.0, 1.0))
                .with_image(image());
            l.add_tile(t).unwrap();
        }
        assert!(l.tiles().iter().all(|t| t.layer_id() == Some(7)));
        let norths: Vec<f64> = l.tiles().iter().map(|t| t.cell.northwest.latitude).collect();
        assert_eq!(norths, vec![0.0, 1.0, 2.0]);
    }
}
