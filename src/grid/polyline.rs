//! Corridor grids around polylines.

use super::{Grid, build_rectangle_grid};
use crate::error::{GeoTilesError, Result};
use crate::geodesy::distance_to_segment;
use geotiles_types::bounds::LatLongBounds;
use geotiles_types::cell::TileCell;
use geotiles_types::coordinate::Coordinate;

/// Builds the grid of tiles lying within `load_distance_m` of a polyline.
///
/// The waypoints' bounding rectangle is gridded first, then a cell is kept
/// when any of its four corners is closer than the effective load distance
/// to any segment. The effective distance is never smaller than half the
/// grid's larger tile side, so a tile straddling the line cannot drop out.
/// Kept cells preserve the rectangle grid's row-major order and pixel size.
///
/// # Errors
///
/// `InvalidInput` for fewer than two waypoints or a negative load distance;
/// `InvalidRegion` when all waypoints share a latitude or a longitude.
pub fn build_polyline_grid(
    waypoints: &[Coordinate],
    load_distance_m: f64,
    meters_per_pixel: f64,
    max_tile_size_px: u32,
) -> Result<Grid> {
    if waypoints.len() < 2 {
        return Err(GeoTilesError::InvalidInput(format!(
            "polyline needs at least 2 waypoints, got {}",
            waypoints.len()
        )));
    }
    if load_distance_m.is_nan() || load_distance_m < 0.0 {
        return Err(GeoTilesError::InvalidInput(format!(
            "load distance must be non-negative, got: {}",
            load_distance_m
        )));
    }

    let bounds = LatLongBounds::enclosing(waypoints).ok_or_else(|| {
        GeoTilesError::InvalidInput("polyline has no waypoints".to_string())
    })?;
    if bounds.is_degenerate() {
        return Err(GeoTilesError::InvalidRegion(format!(
            "waypoints span a zero-area bounding box from {} to {}",
            bounds.southwest(),
            bounds.northeast()
        )));
    }
    let rectangle = build_rectangle_grid(
        bounds.southwest(),
        bounds.northeast(),
        meters_per_pixel,
        max_tile_size_px,
    )?;

    let segments: Vec<(Coordinate, Coordinate)> =
        waypoints.windows(2).map(|w| (w[0], w[1])).collect();

    let tile_footprint_m =
        f64::from(rectangle.tile_width_px().max(rectangle.tile_height_px())) * meters_per_pixel;
    let effective_load_m = load_distance_m.max(tile_footprint_m / 2.0);

    let total = rectangle.len();
    let (tile_width_px, tile_height_px) = (rectangle.tile_width_px(), rectangle.tile_height_px());
    let cells: Vec<TileCell> = rectangle
        .into_cells()
        .into_iter()
        .filter(|cell| corner_segment_distance(cell, &segments) < effective_load_m)
        .collect();

    log::debug!(
        "polyline grid over {} segments: kept {}/{} cells within {:.1} m",
        segments.len(),
        cells.len(),
        total,
        effective_load_m
    );

    Ok(Grid::new(tile_width_px, tile_height_px, cells))
}

/// Smallest distance from any corner of `cell` to any segment.
fn corner_segment_distance(cell: &TileCell, segments: &[(Coordinate, Coordinate)]) -> f64 {
    cell.corners()
        .iter()
        .flat_map(|corner| {
            segments
                .iter()
                .map(move |(start, end)| distance_to_segment(*corner, *start, *end))
        })
        .fold(f64::INFINITY, f64::min)
}
