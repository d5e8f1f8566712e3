//! Spatial tile queries.
//!
//! Both query forms are pure predicates over stored tiles: a rectangle query
//! matches tile **centers**, a square query matches tiles with **any corner**
//! inside the square's latitude/longitude window. Matches are ordered by
//! center latitude, then center longitude, then paginated. Payload selection
//! flags only change what is copied into each [`TileResponse`].

use crate::error::{GeoTilesError, Result};
use crate::geodesy::{bearing, destination_point};
use crate::tile::{LayerId, PixelPoint, SurfFeatures, Tile, TileId};
use bytes::Bytes;
use geotiles_types::bounds::LatLongBounds;
use geotiles_types::coordinate::Coordinate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Layers to search, page window, and which payloads to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSelection {
    pub layer_ids: Vec<LayerId>,
    pub offset: usize,
    pub limit: usize,
    #[serde(default)]
    pub select_image: bool,
    #[serde(default)]
    pub select_surf: bool,
    #[serde(default)]
    pub select_fast: bool,
}

impl TileSelection {
    pub const DEFAULT_LIMIT: usize = 100;

    pub fn new<I: IntoIterator<Item = LayerId>>(layer_ids: I) -> Self {
        Self {
            layer_ids: layer_ids.into_iter().collect(),
            offset: 0,
            limit: Self::DEFAULT_LIMIT,
            select_image: false,
            select_surf: false,
            select_fast: false,
        }
    }

    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    pub fn with_image(mut self) -> Self {
        self.select_image = true;
        self
    }

    pub fn with_surf(mut self) -> Self {
        self.select_surf = true;
        self
    }

    pub fn with_fast(mut self) -> Self {
        self.select_fast = true;
        self
    }

    pub fn includes_layer(&self, layer_id: LayerId) -> bool {
        self.layer_ids.contains(&layer_id)
    }

    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(GeoTilesError::InvalidInput(
                "limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// A spatial tile predicate with a candidate window.
///
/// `bounds` is computed once per evaluation and is also usable by an index
/// to narrow candidates; `matches_within` is the exact predicate.
pub trait TileQuery {
    fn selection(&self) -> &TileSelection;

    fn validate(&self) -> Result<()> {
        self.selection().validate()
    }

    /// Window every matching tile has its center (rectangle) or some corner
    /// (square) inside.
    fn bounds(&self) -> LatLongBounds;

    fn matches_within(&self, window: &LatLongBounds, tile: &Tile) -> bool;

    fn matches(&self, tile: &Tile) -> bool {
        self.matches_within(&self.bounds(), tile)
    }

    /// Evaluates the query over any set of tiles.
    fn execute<'a, I>(&self, tiles: I) -> Result<Vec<TileResponse>>
    where
        I: IntoIterator<Item = &'a Tile>,
        Self: Sized,
    {
        self.validate()?;
        let window = self.bounds();
        let selection = self.selection();
        let matched: Vec<&Tile> = tiles
            .into_iter()
            .filter(|t| t.layer_id().is_some_and(|id| selection.includes_layer(id)))
            .filter(|t| self.matches_within(&window, t))
            .collect();
        Ok(paginate(matched, selection)
            .into_iter()
            .map(|t| TileResponse::project(t, selection))
            .collect())
    }
}

/// Tiles whose center lies inside the rectangle spanned by `start` and `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleQuery {
    pub selection: TileSelection,
    pub start: Coordinate,
    pub end: Coordinate,
}

impl RectangleQuery {
    pub fn new(selection: TileSelection, start: Coordinate, end: Coordinate) -> Self {
        Self {
            selection,
            start,
            end,
        }
    }
}

impl TileQuery for RectangleQuery {
    fn selection(&self) -> &TileSelection {
        &self.selection
    }

    fn bounds(&self) -> LatLongBounds {
        LatLongBounds::from_corners(self.start, self.end)
    }

    fn matches_within(&self, window: &LatLongBounds, tile: &Tile) -> bool {
        window.contains(&tile.center())
    }
}

/// Tiles with any corner inside a square of side `size_m` around `center`.
///
/// The square is the latitude window between the points `size_m / 2` due
/// north and south of the center and the longitude window between the points
/// due east and west. A large tile that contains the whole square without a
/// corner inside it is not matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquareQuery {
    pub selection: TileSelection,
    pub center: Coordinate,
    pub size_m: f64,
}

impl SquareQuery {
    pub fn new(selection: TileSelection, center: Coordinate, size_m: f64) -> Self {
        Self {
            selection,
            center,
            size_m,
        }
    }
}

impl TileQuery for SquareQuery {
    fn selection(&self) -> &TileSelection {
        &self.selection
    }

    fn bounds(&self) -> LatLongBounds {
        let half = self.size_m / 2.0;
        let north = destination_point(self.center, bearing::NORTH, half);
        let south = destination_point(self.center, bearing::SOUTH, half);
        let east = destination_point(self.center, bearing::EAST, half);
        let west = destination_point(self.center, bearing::WEST, half);
        LatLongBounds::from_intervals(
            (north.latitude, south.latitude),
            (east.longitude, west.longitude),
        )
    }

    fn validate(&self) -> Result<()> {
        if !self.size_m.is_finite() || self.size_m <= 0.0 {
            return Err(GeoTilesError::InvalidInput(format!(
                "square size must be a positive number of meters, got: {}",
                self.size_m
            )));
        }
        self.selection.validate()
    }

    fn matches_within(&self, window: &LatLongBounds, tile: &Tile) -> bool {
        tile.vertices().iter().any(|corner| window.contains(corner))
    }
}

/// Orders by (center latitude, center longitude, id) and applies the page.
pub fn paginate<'a>(mut tiles: Vec<&'a Tile>, selection: &TileSelection) -> Vec<&'a Tile> {
    tiles.sort_by(|a, b| compare_centers(a, b));
    tiles
        .into_iter()
        .skip(selection.offset)
        .take(selection.limit)
        .collect()
}

fn compare_centers(a: &Tile, b: &Tile) -> Ordering {
    let (ca, cb) = (a.center(), b.center());
    ca.latitude
        .total_cmp(&cb.latitude)
        .then_with(|| ca.longitude.total_cmp(&cb.longitude))
        .then_with(|| a.id().cmp(&b.id()))
}

/// A matched tile with only the requested payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileResponse {
    pub id: Option<TileId>,
    pub layer_id: Option<LayerId>,
    pub center: Coordinate,
    /// `[NW, NE, SE, SW]`.
    pub vertices: [Coordinate; 4],
    pub azimuth: f64,
    pub image: Option<Bytes>,
    pub surf_features: Option<SurfFeatures>,
    pub corner_keypoints: Option<Vec<PixelPoint>>,
    /// `(height, width)` in pixels.
    pub image_shape: (u32, u32),
}

impl TileResponse {
    pub fn project(tile: &Tile, selection: &TileSelection) -> Self {
        Self {
            id: tile.id(),
            layer_id: tile.layer_id(),
            center: tile.center(),
            vertices: tile.vertices(),
            azimuth: tile.azimuth,
            image: if selection.select_image {
                tile.image.clone()
            } else {
                None
            },
            surf_features: if selection.select_surf {
                tile.surf_features.clone()
            } else {
                None
            },
            corner_keypoints: if selection.select_fast {
                tile.corner_keypoints.clone()
            } else {
                None
            },
            image_shape: tile.image_shape(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileImage;
    use geotiles_types::cell::TileCell;

    fn tile_at(id: TileId, layer: LayerId, nw: Coordinate, lat_step: f64, long_step: f64) -> Tile {
        let mut t = Tile::new(TileCell::from_anchor(nw, lat_step, long_step))
            .with_image(TileImage::new(vec![id as u8], 10, 10));
        t.set_id(id);
        t.set_layer_id(layer);
        t
    }

    #[test]
    fn test_square_bounds_at_equator() {
        let q = SquareQuery::new(TileSelection::new([1]), Coordinate::new(0.0, 0.0), 2000.0);
        let b = q.bounds();
        assert!((b.min_lat() + 0.00899).abs() < 1e-4);
        assert!((b.max_lat() - 0.00899).abs() < 1e-4);
        assert!((b.min_long() + 0.00899).abs() < 1e-4);
        assert!((b.max_long() - 0.00899).abs() < 1e-4);
    }

    #[test]
    fn test_square_matches_any_corner() {
        let q = SquareQuery::new(TileSelection::new([1]), Coordinate::new(0.0, 0.0), 2000.0);
        // SE corner at (0.005, 0.005) lies inside.
        let inside = tile_at(1, 1, Coordinate::new(0.01, -0.01), -0.005, 0.015);
        // Entirely north-east of the square.
        let outside = tile_at(2, 1, Coordinate::new(0.05, 0.05), -0.01, 0.01);
        // Covers the square with every corner outside it.
        let covering = tile_at(3, 1, Coordinate::new(1.0, -1.0), -2.0, 2.0);

        assert!(q.matches(&inside));
        assert!(!q.matches(&outside));
        assert!(!q.matches(&covering));
    }

    #[test]
    fn test_rectangle_matches_centers_inclusively() {
        let q = RectangleQuery::new(
            TileSelection::new([1]),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.0, 0.0),
        );
        // Center lands exactly on (0.5, 1.0).
        let edge = tile_at(1, 1, Coordinate::new(0.75, 0.75), -0.5, 0.5);
        let out = tile_at(2, 1, Coordinate::new(2.0, 2.0), -0.5, 0.5);
        assert!(q.matches(&edge));
        assert!(!q.matches(&out));
    }

    #[test]
    fn test_execute_orders_filters_and_pages() {
        let tiles = vec![
            tile_at(1, 1, Coordinate::new(0.3, 0.2), -0.1, 0.1),
            tile_at(2, 1, Coordinate::new(0.3, 0.1), -0.1, 0.1),
            tile_at(3, 1, Coordinate::new(0.2, 0.5), -0.1, 0.1),
            tile_at(4, 2, Coordinate::new(0.2, 0.1), -0.1, 0.1),
        ];
        let q = RectangleQuery::new(
            TileSelection::new([1]),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 1.0),
        );
        let ids: Vec<_> = q.execute(&tiles).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Some(3), Some(2), Some(1)]);

        let paged = RectangleQuery::new(
            TileSelection::new([1, 2]).page(1, 2),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 1.0),
        );
        let ids: Vec<_> = paged.execute(&tiles).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Some(3), Some(2)]);
    }

    #[test]
    fn test_selection_controls_payload_not_matching() {
        let tiles = vec![tile_at(1, 1, Coordinate::new(0.3, 0.2), -0.1, 0.1)];
        let start = Coordinate::new(0.0, 0.0);
        let end = Coordinate::new(1.0, 1.0);

        let bare = RectangleQuery::new(TileSelection::new([1]), start, end)
            .execute(&tiles)
            .unwrap();
        let full = RectangleQuery::new(TileSelection::new([1]).with_image(), start, end)
            .execute(&tiles)
            .unwrap();

        assert_eq!(bare.len(), full.len());
        assert!(bare[0].image.is_none());
        assert_eq!(full[0].image.as_deref(), Some(&[1u8][..]));
        assert_eq!(bare[0].image_shape, (10, 10));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let q = SquareQuery::new(
            TileSelection::new([1]).page(0, 0),
            Coordinate::new(0.0, 0.0),
            10.0,
        );
        assert!(q.execute(&Vec::<Tile>::new()).is_err());
    }

    #[test]
    fn test_non_positive_square_rejected() {
        let q = SquareQuery::new(TileSelection::new([1]), Coordinate::new(0.0, 0.0), -5.0);
        assert!(matches!(q.validate(), Err(GeoTilesError::InvalidInput(_))));
    }
}
