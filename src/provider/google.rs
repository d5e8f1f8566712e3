//! Google Static Maps provider

use super::{HttpClient, MapProvider};
use crate::config::ProviderConfig;
use crate::error::{GeoTilesError, Result};
use crate::tile::TileImage;
use geotiles_types::coordinate::Coordinate;

pub const STATIC_MAPS_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";
pub const STATIC_MAPS_MAX_TILE_PX: u32 = 640;

/// Satellite imagery from the Google Static Maps API.
pub struct GoogleStaticMapsProvider<C: HttpClient> {
    http_client: C,
    api_key: String,
    base_url: String,
    map_type: String,
    max_tile_size_px: u32,
}

impl<C: HttpClient> GoogleStaticMapsProvider<C> {
    pub fn new(http_client: C, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: STATIC_MAPS_URL.to_string(),
            map_type: "satellite".to_string(),
            max_tile_size_px: STATIC_MAPS_MAX_TILE_PX,
        }
    }

    /// Provider configured from settings; an API key is required.
    pub fn from_config(http_client: C, config: &ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| GeoTilesError::Config("static maps API key is not set".to_string()))?;
        Ok(Self::new(http_client, api_key)
            .with_base_url(config.base_url.clone())
            .with_map_type(config.map_type.clone())
            .with_max_tile_size_px(config.max_tile_size_px))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_map_type(mut self, map_type: impl Into<String>) -> Self {
        self.map_type = map_type.into();
        self
    }

    pub fn with_max_tile_size_px(mut self, max_tile_size_px: u32) -> Self {
        self.max_tile_size_px = max_tile_size_px;
        self
    }

    /// Request URL for one tile. Zoom is rounded to the nearest level.
    pub fn build_url(&self, center: Coordinate, zoom: f64, width_px: u32, height_px: u32) -> String {
        format!(
            "{}?center={},{}&zoom={}&size={}x{}&maptype={}&key={}",
            self.base_url,
            center.latitude,
            center.longitude,
            zoom.round() as i64,
            width_px,
            height_px,
            self.map_type,
            self.api_key
        )
    }
}

impl<C: HttpClient> MapProvider for GoogleStaticMapsProvider<C> {
    fn name(&self) -> &str {
        "Google Static Maps"
    }

    fn max_tile_size_px(&self) -> u32 {
        self.max_tile_size_px
    }

    fn load_tile(
        &self,
        center: Coordinate,
        zoom: f64,
        width_px: u32,
        height_px: u32,
    ) -> Result<TileImage> {
        let url = self.build_url(center, zoom, width_px, height_px);
        log::trace!("requesting tile at {} zoom {}", center, zoom);

        let response = self.http_client.get(&url)?;
        if !response.is_success() {
            let message = String::from_utf8_lossy(&response.body).into_owned();
            log::warn!("static maps returned status {}: {}", response.status, message);
            return Err(GeoTilesError::Provider(message));
        }
        if response.body.is_empty() {
            return Err(GeoTilesError::Provider(
                "static maps returned an empty response body".to_string(),
            ));
        }

        Ok(TileImage::new(response.body, width_px, height_px))
    }
}
