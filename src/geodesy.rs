//! Geodesic math shared by the grid builders and the query engine.
//!
//! Every distance in geotiles goes through [`geodesic_distance`], which uses
//! `geo::Geodesic` (Karney 2013 on the WGS84 ellipsoid).

use geo::{Destination, Distance, Geodesic, Point};
use geotiles_types::coordinate::Coordinate;

/// Compass bearings in degrees, clockwise from north.
pub mod bearing {
    pub const NORTH: f64 = 0.0;
    pub const EAST: f64 = 90.0;
    pub const SOUTH: f64 = 180.0;
    pub const WEST: f64 = 270.0;
}

/// Ellipsoidal distance between two coordinates, in meters.
///
/// # Examples
///
/// ```rust
/// use geotiles::geodesy::geodesic_distance;
/// use geotiles::Coordinate;
///
/// let a = Coordinate::new(0.0, 0.0);
/// let b = Coordinate::new(0.0, 1.0);
/// let d = geodesic_distance(a, b);
/// assert!((d - 111_319.49).abs() < 1.0);
/// ```
#[inline]
pub fn geodesic_distance(a: Coordinate, b: Coordinate) -> f64 {
    Geodesic.distance(Point::from(a), Point::from(b))
}

/// Solves the direct geodesic problem: the coordinate reached from `origin`
/// after `distance_m` meters along `bearing_deg`.
pub fn destination_point(origin: Coordinate, bearing_deg: f64, distance_m: f64) -> Coordinate {
    Geodesic
        .destination(Point::from(origin), bearing_deg, distance_m)
        .into()
}

/// Perpendicular projection of a point onto the line through a segment.
///
/// Computed in raw degree space, latitude and longitude treated as planar
/// components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Foot of the perpendicular, in degrees.
    pub point: Coordinate,
    /// Position along the segment; `0.0` at the start and `1.0` at the end.
    pub t: f64,
}

impl SegmentProjection {
    /// Projection falls between the segment endpoints (inclusive).
    #[inline]
    pub fn within_segment(&self) -> bool {
        (0.0..=1.0).contains(&self.t)
    }
}

/// Projects `point` onto the line through `start` and `end`.
///
/// Returns `None` for a zero-length segment.
pub fn project_point_onto_segment(
    point: Coordinate,
    start: Coordinate,
    end: Coordinate,
) -> Option<SegmentProjection> {
    let segment = end - start;
    let len_sq = segment.dot(&segment);
    if len_sq == 0.0 {
        return None;
    }

    let t = (point - start).dot(&segment) / len_sq;
    Some(SegmentProjection {
        point: Coordinate::new(
            start.latitude + t * segment.lat_diff,
            start.longitude + t * segment.long_diff,
        ),
        t,
    })
}

/// Distance in meters from `point` to the segment `start..end`.
///
/// When the degree-space projection lands inside the segment, the geodesic
/// distance to the projected coordinate is used; otherwise the geodesic
/// distance to the nearer endpoint.
pub fn distance_to_segment(point: Coordinate, start: Coordinate, end: Coordinate) -> f64 {
    match project_point_onto_segment(point, start, end) {
        Some(projection) if projection.within_segment() => {
            geodesic_distance(point, projection.point)
        }
        _ => geodesic_distance(point, start).min(geodesic_distance(point, end)),
    }
}
