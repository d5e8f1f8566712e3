//! Map imagery providers.
//!
//! A [`MapProvider`] turns a tile center, zoom level and pixel size into an
//! encoded raster image. Providers also define the ground resolution of each
//! zoom level and the largest tile they can serve.

use crate::error::{GeoTilesError, Result};
use crate::tile::TileImage;
use bytes::Bytes;
use geotiles_types::coordinate::Coordinate;

mod google;

pub use google::{GoogleStaticMapsProvider, STATIC_MAPS_MAX_TILE_PX, STATIC_MAPS_URL};

/// Web-mercator ground resolution at the equator, in meters per pixel,
/// indexed by integer zoom level.
pub const ZOOM_METERS_PER_PIXEL: [f64; 21] = [
    156543.03392,
    78271.51696,
    39135.75848,
    19567.87924,
    9783.93962,
    4891.96981,
    2445.98490,
    1222.99245,
    611.49622,
    305.74811,
    152.87405,
    76.43702,
    38.21851,
    19.10925,
    9.55462,
    4.77731,
    2.38865,
    1.19432,
    0.59716,
    0.2435625,
    0.12453125,
];

pub const MAX_ZOOM: f64 = 20.0;

/// Resolution for a (possibly fractional) zoom level; the fraction is
/// truncated.
pub fn meters_per_pixel_for_zoom(zoom: f64) -> Result<f64> {
    if !zoom.is_finite() || zoom < 0.0 || zoom >= MAX_ZOOM + 1.0 {
        return Err(GeoTilesError::InvalidInput(format!(
            "zoom level {} outside 0..={}",
            zoom, MAX_ZOOM
        )));
    }
    Ok(ZOOM_METERS_PER_PIXEL[zoom as usize])
}

/// Source of map imagery.
pub trait MapProvider: Send + Sync {
    fn name(&self) -> &str;

    fn meters_per_pixel(&self, zoom: f64) -> Result<f64> {
        meters_per_pixel_for_zoom(zoom)
    }

    /// Largest edge, in pixels, of a single tile request.
    fn max_tile_size_px(&self) -> u32;

    /// Fetch the image centered on `center`.
    ///
    /// Fails with `Provider` when the backend reports an error or returns no
    /// image data.
    fn load_tile(
        &self,
        center: Coordinate,
        zoom: f64,
        width_px: u32,
        height_px: u32,
    ) -> Result<TileImage>;
}

/// Raw response of an HTTP GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Blocking HTTP transport used by HTTP-backed providers.
///
/// Implemented by the embedding application so the crate stays free of a
/// network stack; tests substitute canned responses.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}
