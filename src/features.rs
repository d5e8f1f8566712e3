//! Feature extraction boundary.
//!
//! Keypoint detection runs outside this crate. The import flow hands each
//! fetched image to a [`FeatureExtractor`] and stores whatever it returns.

use crate::error::{GeoTilesError, Result};
use crate::layer::{FastParams, SurfParams};
use crate::tile::{PixelPoint, SurfFeatures, TileImage};

pub trait FeatureExtractor: Send + Sync {
    /// SURF keypoints and descriptors for an encoded image.
    fn detect_surf(&self, image: &TileImage, params: &SurfParams) -> Result<SurfFeatures>;

    /// Line/corner keypoints, in pixel coordinates, for an encoded image.
    fn detect_corners(&self, image: &TileImage, params: &FastParams) -> Result<Vec<PixelPoint>>;
}

/// Extractor used when none is configured; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredExtractor;

impl FeatureExtractor for UnconfiguredExtractor {
    fn detect_surf(&self, _image: &TileImage, _params: &SurfParams) -> Result<SurfFeatures> {
        Err(GeoTilesError::Extraction(
            "no feature extractor configured for SURF detection".to_string(),
        ))
    }

    fn detect_corners(&self, _image: &TileImage, _params: &FastParams) -> Result<Vec<PixelPoint>> {
        Err(GeoTilesError::Extraction(
            "no feature extractor configured for corner detection".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_extractor_fails() {
        let image = TileImage::new(vec![1u8, 2, 3], 1, 1);
        let extractor = UnconfiguredExtractor;
        assert!(matches!(
            extractor.detect_surf(&image, &SurfParams { hessian_threshold: 100 }),
            Err(GeoTilesError::Extraction(_))
        ));
        let fast = FastParams {
            threshold: 10,
            nonmax_suppression: true,
            detector_type: None,
        };
        assert!(matches!(
            extractor.detect_corners(&image, &fast),
            Err(GeoTilesError::Extraction(_))
        ));
    }
}
