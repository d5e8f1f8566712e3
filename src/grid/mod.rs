//! Tile grid construction.
//!
//! A [`Grid`] is an ordered sequence of [`TileCell`]s plus the pixel footprint
//! shared by every cell. Rectangle grids are enumerated row-major from the
//! north-west corner; polyline grids are the subsequence of their bounding
//! rectangle grid that lies inside the corridor.

use crate::error::{GeoTilesError, Result};
use crate::layer::ImportType;
use geotiles_types::cell::TileCell;
use geotiles_types::coordinate::Coordinate;
use serde::{Deserialize, Serialize};

mod polyline;
mod rectangle;

pub use polyline::build_polyline_grid;
pub use rectangle::build_rectangle_grid;

/// Largest number of cells a single grid may hold.
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Ordered grid cells sharing one pixel footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    tile_width_px: u32,
    tile_height_px: u32,
    cells: Vec<TileCell>,
}

impl Grid {
    pub(crate) fn new(tile_width_px: u32, tile_height_px: u32, cells: Vec<TileCell>) -> Self {
        Self {
            tile_width_px,
            tile_height_px,
            cells,
        }
    }

    /// Cells in enumeration order.
    pub fn cells(&self) -> &[TileCell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<TileCell> {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn tile_width_px(&self) -> u32 {
        self.tile_width_px
    }

    pub fn tile_height_px(&self) -> u32 {
        self.tile_height_px
    }

    /// Cells as a GeoJSON FeatureCollection of polygons, for map display.
    ///
    /// Each feature carries its enumeration `index` and the cell `center` as
    /// `[latitude, longitude]`.
    #[cfg(feature = "geojson")]
    pub fn to_geojson(&self) -> geojson::FeatureCollection {
        use geojson::{Feature, FeatureCollection, Geometry, Value};
        use serde_json::{Map, json};

        let features = self
            .cells
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let mut ring: Vec<Vec<f64>> = cell
                    .corners()
                    .iter()
                    .map(|c| vec![c.longitude, c.latitude])
                    .collect();
                ring.push(vec![cell.northwest.longitude, cell.northwest.latitude]);

                let mut props = Map::new();
                props.insert("index".to_string(), json!(index));
                props.insert(
                    "center".to_string(),
                    json!([cell.center.latitude, cell.center.longitude]),
                );
                props.insert("width_px".to_string(), json!(self.tile_width_px));
                props.insert("height_px".to_string(), json!(self.tile_height_px));

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
                    id: None,
                    properties: Some(props),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

/// The region an import covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImportRegion {
    /// Axis-aligned rectangle between two opposite corners, in any order.
    Rectangle { start: Coordinate, end: Coordinate },
    /// Corridor of `load_distance_m` around the polyline through `waypoints`.
    Polyline {
        waypoints: Vec<Coordinate>,
        load_distance_m: f64,
    },
}

impl ImportRegion {
    pub fn rectangle(start: Coordinate, end: Coordinate) -> Self {
        ImportRegion::Rectangle { start, end }
    }

    pub fn polyline(waypoints: Vec<Coordinate>, load_distance_m: f64) -> Self {
        ImportRegion::Polyline {
            waypoints,
            load_distance_m,
        }
    }

    /// Import type recorded on the layer.
    pub fn import_type(&self) -> ImportType {
        match self {
            ImportRegion::Rectangle { .. } => ImportType::Rectangle,
            ImportRegion::Polyline { .. } => ImportType::Polyline,
        }
    }
}

/// Builds the grid for any import region.
pub fn build_tiles_grid(
    region: &ImportRegion,
    meters_per_pixel: f64,
    max_tile_size_px: u32,
) -> Result<Grid> {
    match region {
        ImportRegion::Rectangle { start, end } => {
            build_rectangle_grid(*start, *end, meters_per_pixel, max_tile_size_px)
        }
        ImportRegion::Polyline {
            waypoints,
            load_distance_m,
        } => build_polyline_grid(
            waypoints,
            *load_distance_m,
            meters_per_pixel,
            max_tile_size_px,
        ),
    }
}

pub(crate) fn validate_resolution(meters_per_pixel: f64, max_tile_size_px: u32) -> Result<()> {
    if !meters_per_pixel.is_finite() || meters_per_pixel <= 0.0 {
        return Err(GeoTilesError::InvalidInput(format!(
            "meters per pixel must be a positive number, got: {}",
            meters_per_pixel
        )));
    }
    if max_tile_size_px == 0 {
        return Err(GeoTilesError::InvalidInput(
            "max tile size must be at least one pixel".to_string(),
        ));
    }
    Ok(())
}
