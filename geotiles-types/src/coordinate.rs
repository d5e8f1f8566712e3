use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// A WGS84 position in decimal degrees.
///
/// Unlike `geo::Point`, fields are named latitude-first, which is the order
/// every grid and query formula in geotiles is written in. Conversion to
/// `geo::Point` maps longitude to `x` and latitude to `y`.
///
/// # Examples
///
/// ```
/// use geotiles_types::coordinate::Coordinate;
///
/// let kyiv = Coordinate::new(50.4501, 30.5234);
/// let point: geo::Point = kyiv.into();
/// assert_eq!(point.x(), 30.5234);
/// assert_eq!(point.y(), 50.4501);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns a copy with the latitude replaced.
    #[inline]
    pub const fn with_latitude(self, latitude: f64) -> Self {
        Self::new(latitude, self.longitude)
    }

    /// Returns a copy with the longitude replaced.
    #[inline]
    pub const fn with_longitude(self, longitude: f64) -> Self {
        Self::new(self.latitude, longitude)
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Componentwise difference of two coordinates, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordinateDelta {
    pub lat_diff: f64,
    pub long_diff: f64,
}

impl CoordinateDelta {
    /// Dot product treating the delta as a planar vector.
    #[inline]
    pub fn dot(&self, other: &CoordinateDelta) -> f64 {
        self.lat_diff * other.lat_diff + self.long_diff * other.long_diff
    }
}

impl Sub for Coordinate {
    type Output = CoordinateDelta;

    fn sub(self, rhs: Coordinate) -> CoordinateDelta {
        CoordinateDelta {
            lat_diff: self.latitude - rhs.latitude,
            long_diff: self.longitude - rhs.longitude,
        }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.longitude, c.latitude)
    }
}

impl From<geo::Point<f64>> for Coordinate {
    fn from(p: geo::Point<f64>) -> Self {
        Self::new(p.y(), p.x())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}
