//! Tiles: grid cells with identity and optional imagery/feature payloads.

use bytes::Bytes;
use geotiles_types::cell::TileCell;
use geotiles_types::coordinate::Coordinate;
use serde::{Deserialize, Serialize};

pub type TileId = u64;
pub type LayerId = u64;

/// Encoded raster bytes as returned by a map provider, plus pixel shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileImage {
    pub data: Bytes,
    pub width_px: u32,
    pub height_px: u32,
}

impl TileImage {
    pub fn new(data: impl Into<Bytes>, width_px: u32, height_px: u32) -> Self {
        Self {
            data: data.into(),
            width_px,
            height_px,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A scale-invariant keypoint, laid out like OpenCV's `KeyPoint`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyPoint {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub angle: f32,
    pub response: f32,
    pub octave: i32,
    pub class_id: i32,
}

/// SURF keypoints with their descriptor matrix stored row-major.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfFeatures {
    pub keypoints: Vec<KeyPoint>,
    pub descriptors: Vec<f32>,
    /// Floats per descriptor row (64 or 128 for SURF).
    pub descriptor_len: usize,
}

impl SurfFeatures {
    pub fn new(keypoints: Vec<KeyPoint>, descriptors: Vec<f32>, descriptor_len: usize) -> Self {
        Self {
            keypoints,
            descriptors,
            descriptor_len,
        }
    }

    /// Descriptor row of keypoint `index`.
    pub fn descriptor(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.descriptor_len)?;
        self.descriptors.get(start..start + self.descriptor_len)
    }
}

/// Pixel position of a corner or line keypoint, `x` to the right, `y` down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

impl PixelPoint {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// One stored grid cell.
///
/// Tiles are created from a [`TileCell`] and become part of a layer through
/// [`crate::Layer::add_tile`], which checks payload presence against the
/// layer's capabilities and stamps the layer id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    id: Option<TileId>,
    layer_id: Option<LayerId>,
    pub cell: TileCell,
    /// Rotation in degrees; grids always produce 0.
    pub azimuth: f64,
    pub image: Option<Bytes>,
    pub image_width_px: u32,
    pub image_height_px: u32,
    pub surf_features: Option<SurfFeatures>,
    pub corner_keypoints: Option<Vec<PixelPoint>>,
}

impl Tile {
    pub fn new(cell: TileCell) -> Self {
        Self {
            id: None,
            layer_id: None,
            cell,
            azimuth: 0.0,
            image: None,
            image_width_px: 0,
            image_height_px: 0,
            surf_features: None,
            corner_keypoints: None,
        }
    }

    /// Record the fetched image's pixel shape without keeping its bytes.
    pub fn with_image_shape(mut self, width_px: u32, height_px: u32) -> Self {
        self.image_width_px = width_px;
        self.image_height_px = height_px;
        self
    }

    /// Keep the image bytes and shape.
    pub fn with_image(mut self, image: TileImage) -> Self {
        self.image_width_px = image.width_px;
        self.image_height_px = image.height_px;
        self.image = Some(image.data);
        self
    }

    pub fn with_surf_features(mut self, features: SurfFeatures) -> Self {
        self.surf_features = Some(features);
        self
    }

    pub fn with_corner_keypoints(mut self, keypoints: Vec<PixelPoint>) -> Self {
        self.corner_keypoints = Some(keypoints);
        self
    }

    pub fn id(&self) -> Option<TileId> {
        self.id
    }

    pub fn layer_id(&self) -> Option<LayerId> {
        self.layer_id
    }

    pub(crate) fn set_layer_id(&mut self, layer_id: LayerId) {
        self.layer_id = Some(layer_id);
    }

    pub(crate) fn set_id(&mut self, id: TileId) {
        self.id = Some(id);
    }

    pub fn center(&self) -> Coordinate {
        self.cell.center
    }

    /// `[NW, NE, SE, SW]`.
    pub fn vertices(&self) -> [Coordinate; 4] {
        self.cell.corners()
    }

    /// `(height, width)` in pixels.
    pub fn image_shape(&self) -> (u32, u32) {
        (self.image_height_px, self.image_width_px)
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn has_surf_features(&self) -> bool {
        self.surf_features.is_some()
    }

    pub fn has_corner_keypoints(&self) -> bool {
        self.corner_keypoints.is_some()
    }
}
