//! Uniform grids over axis-aligned latitude/longitude rectangles.

use super::{Grid, MAX_GRID_CELLS, validate_resolution};
use crate::error::{GeoTilesError, Result};
use crate::geodesy::geodesic_distance;
use geotiles_types::cell::TileCell;
use geotiles_types::coordinate::Coordinate;

/// Partitions the rectangle spanned by `start` and `end` into a tile grid.
///
/// The corners may be given in any order; the grid is anchored at the
/// north-west corner and enumerated row-major, north to south and then west
/// to east. Each axis gets `floor(span_m / (max_tile_size_px * meters_per_pixel)) + 1`
/// cells, so coverage is never truncated.
///
/// # Errors
///
/// `InvalidRegion` when both corners share a latitude or a longitude, when
/// the resulting tiles would be less than one pixel wide or high, or when the
/// grid would exceed [`MAX_GRID_CELLS`] cells.
///
/// # Examples
///
/// ```rust
/// use geotiles::grid::build_rectangle_grid;
/// use geotiles::Coordinate;
///
/// let grid = build_rectangle_grid(
///     Coordinate::new(10.0, 10.0),
///     Coordinate::new(9.99, 10.02),
///     10.0,
///     640,
/// )?;
/// assert_eq!(grid.len(), 1);
/// assert_eq!(grid.cells()[0].northwest, Coordinate::new(10.0, 10.0));
/// # Ok::<(), geotiles::GeoTilesError>(())
/// ```
pub fn build_rectangle_grid(
    start: Coordinate,
    end: Coordinate,
    meters_per_pixel: f64,
    max_tile_size_px: u32,
) -> Result<Grid> {
    if start.latitude == end.latitude || start.longitude == end.longitude {
        return Err(GeoTilesError::InvalidRegion(format!(
            "start {} and end {} must lie on different latitude and longitude",
            start, end
        )));
    }
    validate_resolution(meters_per_pixel, max_tile_size_px)?;

    let north = start.latitude.max(end.latitude);
    let south = start.latitude.min(end.latitude);
    let west = start.longitude.min(end.longitude);
    let east = start.longitude.max(end.longitude);

    let northwest = Coordinate::new(north, west);
    let lat_span_m = geodesic_distance(northwest, Coordinate::new(south, west));
    let long_span_m = geodesic_distance(northwest, Coordinate::new(north, east));

    let max_tile_span_m = f64::from(max_tile_size_px) * meters_per_pixel;
    let lat_cells = cells_along(lat_span_m, max_tile_span_m)?;
    let long_cells = cells_along(long_span_m, max_tile_span_m)?;
    let cell_count = lat_cells
        .checked_mul(long_cells)
        .filter(|&n| n <= MAX_GRID_CELLS)
        .ok_or_else(|| too_many_cells(lat_cells, long_cells))?;

    let lat_step = (south - north) / lat_cells as f64;
    let long_step = (east - west) / long_cells as f64;

    let tile_width_px = (long_span_m / meters_per_pixel / long_cells as f64) as u32;
    let tile_height_px = (lat_span_m / meters_per_pixel / lat_cells as f64) as u32;
    if tile_width_px == 0 || tile_height_px == 0 {
        return Err(GeoTilesError::InvalidRegion(format!(
            "region of {:.2} x {:.2} m is smaller than one {} m pixel",
            lat_span_m, long_span_m, meters_per_pixel
        )));
    }

    let mut cells = Vec::with_capacity(cell_count);
    for i in 0..lat_cells {
        let cell_north = north + lat_step * i as f64;
        for j in 0..long_cells {
            let cell_west = west + long_step * j as f64;
            cells.push(TileCell::from_anchor(
                Coordinate::new(cell_north, cell_west),
                lat_step,
                long_step,
            ));
        }
    }

    log::debug!(
        "rectangle grid {} -> {}: {}x{} cells of {}x{} px",
        northwest,
        Coordinate::new(south, east),
        lat_cells,
        long_cells,
        tile_width_px,
        tile_height_px
    );

    Ok(Grid::new(tile_width_px, tile_height_px, cells))
}

/// Cells needed along one axis: `floor(span / max_span) + 1`.
fn cells_along(span_m: f64, max_tile_span_m: f64) -> Result<usize> {
    let cells = (span_m / max_tile_span_m).floor() + 1.0;
    if !cells.is_finite() || cells > MAX_GRID_CELLS as f64 {
        return Err(GeoTilesError::InvalidRegion(format!(
            "{:.2} m span needs more than {} tiles of {} m",
            span_m, MAX_GRID_CELLS, max_tile_span_m
        )));
    }
    Ok(cells as usize)
}

fn too_many_cells(lat_cells: usize, long_cells: usize) -> GeoTilesError {
    GeoTilesError::InvalidRegion(format!(
        "grid of {}x{} cells exceeds the limit of {} cells",
        lat_cells, long_cells, MAX_GRID_CELLS
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Coordinate, b: Coordinate) -> bool {
        (a.latitude - b.latitude).abs() < EPS && (a.longitude - b.longitude).abs() < EPS
    }

    #[test]
    fn test_degenerate_latitude_fails() {
        let result = build_rectangle_grid(
            Coordinate::new(10.0, 10.0),
            Coordinate::new(10.0, 11.0),
            10.0,
            640,
        );
        assert!(matches!(result, Err(GeoTilesError::InvalidRegion(_))));
    }

    #[test]
    fn test_degenerate_longitude_fails() {
        let result = build_rectangle_grid(
            Coordinate::new(10.0, 10.0),
            Coordinate::new(11.0, 10.0),
            10.0,
            640,
        );
        assert!(matches!(result, Err(GeoTilesError::InvalidRegion(_))));
    }

    #[test]
    fn test_single_cell_example() {
        let grid = build_rectangle_grid(
            Coordinate::new(10.0, 10.0),
            Coordinate::new(9.99, 10.02),
            10.0,
            640,
        )
        .unwrap();

        assert_eq!(grid.len(), 1);
        let cell = grid.cells()[0];
        assert!(close(cell.northwest, Coordinate::new(10.0, 10.0)));
        assert!(close(cell.southeast, Coordinate::new(9.99, 10.02)));
        assert!(close(cell.center, Coordinate::new(9.995, 10.01)));
        // ~1106 m / 10 m/px and ~2192 m / 10 m/px
        assert!((100..=115).contains(&grid.tile_height_px()));
        assert!((215..=225).contains(&grid.tile_width_px()));
    }

    #[test]
    fn test_corner_order_is_normalized() {
        let a = build_rectangle_grid(
            Coordinate::new(9.9, 10.2),
            Coordinate::new(10.0, 10.0),
            10.0,
            640,
        )
        .unwrap();
        let b = build_rectangle_grid(
            Coordinate::new(10.0, 10.0),
            Coordinate::new(9.9, 10.2),
            10.0,
            640,
        )
        .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cells()[0].northwest, Coordinate::new(10.0, 10.0));
    }

    #[test]
    fn test_cells_tile_rectangle_without_gaps() {
        let grid = build_rectangle_grid(
            Coordinate::new(50.0, 30.0),
            Coordinate::new(49.8, 30.3),
            5.0,
            640,
        )
        .unwrap();

        // 0.2 deg lat ~ 22.2 km, 0.3 deg long at 50N ~ 21.5 km, 3.2 km max span
        let rows = 7;
        let cols = 7;
        assert_eq!(grid.len(), rows * cols);

        let cells = grid.cells();
        for i in 0..rows {
            for j in 0..cols {
                let cell = cells[i * cols + j];
                if j + 1 < cols {
                    assert!(close(cell.northeast, cells[i * cols + j + 1].northwest));
                }
                if i + 1 < rows {
                    assert!(close(cell.southwest, cells[(i + 1) * cols + j].northwest));
                }
            }
        }
        assert!(close(cells[0].northwest, Coordinate::new(50.0, 30.0)));
        assert!(close(cells[rows * cols - 1].southeast, Coordinate::new(49.8, 30.3)));
    }

    #[test]
    fn test_row_major_order() {
        let grid = build_rectangle_grid(
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.9, 1.1),
            5.0,
            640,
        )
        .unwrap();
        let cells = grid.cells();
        assert!(cells.len() > 4);
        assert!(cells[0].center.longitude < cells[1].center.longitude);
        assert_eq!(cells[0].center.latitude, cells[1].center.latitude);
        let last = cells.last().unwrap();
        assert!(last.center.latitude < cells[0].center.latitude);
    }

    #[test]
    fn test_pixel_size_never_exceeds_max() {
        let grid = build_rectangle_grid(
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.5, 0.5),
            2.38865,
            640,
        )
        .unwrap();
        assert!(grid.tile_width_px() > 0 && grid.tile_width_px() <= 640);
        assert!(grid.tile_height_px() > 0 && grid.tile_height_px() <= 640);
    }

    #[test]
    fn test_sub_pixel_region_fails() {
        let result = build_rectangle_grid(
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.000001, 0.000001),
            10.0,
            640,
        );
        assert!(matches!(result, Err(GeoTilesError::InvalidRegion(_))));
    }

    #[test]
    fn test_tiny_resolution_is_rejected() {
        let result = build_rectangle_grid(
            Coordinate::new(10.0, 10.0),
            Coordinate::new(9.0, 11.0),
            1e-300,
            640,
        );
        assert!(matches!(result, Err(GeoTilesError::InvalidRegion(_))));
    }

    #[test]
    fn test_cell_count_limit() {
        // ~111 km x ~110 km at 0.1 m/px: about 1740 x 1720 cells
        let result = build_rectangle_grid(
            Coordinate::new(10.0, 10.0),
            Coordinate::new(9.0, 11.0),
            0.1,
            640,
        );
        assert!(matches!(result, Err(GeoTilesError::InvalidRegion(_))));
    }
}
