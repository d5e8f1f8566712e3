use geotiles::{
    Coordinate, GeoTilesError, build_polyline_grid, build_rectangle_grid, distance_to_segment,
    geodesic_distance,
};

const MPP: f64 = 2.38865;
const MAX_PX: u32 = 640;

fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_rectangle_cells_share_edges() {
    let grid = build_rectangle_grid(
        Coordinate::new(48.95, 2.25),
        Coordinate::new(48.80, 2.45),
        MPP,
        MAX_PX,
    )
    .unwrap();
    let cells = grid.cells();
    let row_len = cells
        .iter()
        .take_while(|c| near(c.northwest.latitude, cells[0].northwest.latitude))
        .count();
    assert_eq!(cells.len() % row_len, 0);

    for (i, cell) in cells.iter().enumerate() {
        if (i + 1) % row_len != 0 {
            let east = &cells[i + 1];
            assert!(near(cell.northeast.longitude, east.northwest.longitude));
            assert!(near(cell.northeast.latitude, east.northwest.latitude));
        }
        if i + row_len < cells.len() {
            let south = &cells[i + row_len];
            assert!(near(cell.southwest.latitude, south.northwest.latitude));
        }
    }
}

#[test]
fn test_rectangle_tiles_cover_region_in_pixels() {
    let start = Coordinate::new(48.95, 2.25);
    let end = Coordinate::new(48.80, 2.45);
    let grid = build_rectangle_grid(start, end, MPP, MAX_PX).unwrap();
    let cells = grid.cells();
    let row_len = cells
        .iter()
        .take_while(|c| near(c.northwest.latitude, cells[0].northwest.latitude))
        .count();
    let rows = cells.len() / row_len;

    let height_m = geodesic_distance(start, Coordinate::new(end.latitude, start.longitude));
    let width_m = geodesic_distance(start, Coordinate::new(start.latitude, end.longitude));
    let covered_h = rows as f64 * grid.tile_height_px() as f64 * MPP;
    let covered_w = row_len as f64 * grid.tile_width_px() as f64 * MPP;
    assert!((covered_h - height_m).abs() <= rows as f64 * MPP + 1.0);
    assert!((covered_w - width_m).abs() <= row_len as f64 * MPP + 1.0);
}

#[test]
fn test_polyline_grid_is_rectangle_subsequence() {
    let waypoints = vec![
        Coordinate::new(48.95, 2.25),
        Coordinate::new(48.90, 2.35),
        Coordinate::new(48.80, 2.45),
    ];
    let rect = build_rectangle_grid(Coordinate::new(48.95, 2.25), Coordinate::new(48.80, 2.45), MPP, MAX_PX)
        .unwrap();
    let poly = build_polyline_grid(&waypoints, 20.0, MPP, MAX_PX).unwrap();

    assert!(!poly.is_empty());
    assert!(poly.len() < rect.len());
    assert_eq!(poly.tile_width_px(), rect.tile_width_px());

    let mut cursor = rect.cells().iter();
    for cell in poly.cells() {
        assert!(cursor.any(|c| c == cell), "cell out of order or missing");
    }
}

#[test]
fn test_polyline_cells_touch_corridor() {
    let waypoints = vec![Coordinate::new(48.95, 2.25), Coordinate::new(48.80, 2.45)];
    let load = 500.0;
    let grid = build_polyline_grid(&waypoints, load, MPP, MAX_PX).unwrap();
    let half_tile = grid.tile_width_px().max(grid.tile_height_px()) as f64 * MPP / 2.0;
    let effective = load.max(half_tile);

    for cell in grid.cells() {
        let nearest = cell
            .corners()
            .iter()
            .map(|c| distance_to_segment(*c, waypoints[0], waypoints[1]))
            .fold(f64::INFINITY, f64::min);
        assert!(nearest < effective);
    }
}

#[test]
fn test_degenerate_regions_fail() {
    let p = Coordinate::new(10.0, 10.0);
    assert!(matches!(
        build_rectangle_grid(p, Coordinate::new(10.0, 11.0), MPP, MAX_PX),
        Err(GeoTilesError::InvalidRegion(_))
    ));
    assert!(matches!(
        build_polyline_grid(&[p, Coordinate::new(11.0, 10.0)], 20.0, MPP, MAX_PX),
        Err(GeoTilesError::InvalidRegion(_))
    ));
}
