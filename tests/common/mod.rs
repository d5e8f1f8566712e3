#![allow(dead_code)]

use geotiles::prelude::*;
use geotiles::{FastParams, PixelPoint, SurfFeatures, SurfParams, TileImage, KeyPoint};
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Provider whose images encode the requested center, failing after
/// `fail_after` successful requests when set.
pub struct FakeProvider {
    pub fail_after: Option<usize>,
    pub calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            fail_after: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            calls: AtomicUsize::new(0),
        }
    }
}

pub fn image_for(center: Coordinate) -> Vec<u8> {
    format!("img:{:.9},{:.9}", center.latitude, center.longitude).into_bytes()
}

impl MapProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn max_tile_size_px(&self) -> u32 {
        640
    }

    fn load_tile(&self, center: Coordinate, _zoom: f64, w: u32, h: u32) -> Result<TileImage> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.fail_after
            && n >= limit
        {
            return Err(GeoTilesError::Provider("quota exceeded".to_string()));
        }
        Ok(TileImage::new(image_for(center), w, h))
    }
}

/// Extractor deriving deterministic features from the image length.
pub struct FakeExtractor;

impl FeatureExtractor for FakeExtractor {
    fn detect_surf(&self, image: &TileImage, params: &SurfParams) -> Result<SurfFeatures> {
        let keypoint = KeyPoint {
            x: image.width_px as f32 / 2.0,
            y: image.height_px as f32 / 2.0,
            size: params.hessian_threshold as f32,
            ..KeyPoint::default()
        };
        Ok(SurfFeatures::new(vec![keypoint], vec![image.data.len() as f32; 64], 64))
    }

    fn detect_corners(&self, image: &TileImage, params: &FastParams) -> Result<Vec<PixelPoint>> {
        Ok((0..params.threshold)
            .map(|i| PixelPoint::new(i % image.width_px, i % image.height_px))
            .collect())
    }
}

pub fn storage() -> MapStorage {
    init_logging();
    MapStorage::builder()
        .provider(FakeProvider::new())
        .feature_extractor(FakeExtractor)
        .build()
        .unwrap()
}
