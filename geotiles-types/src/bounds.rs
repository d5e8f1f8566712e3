use crate::coordinate::Coordinate;
use geo::Rect;
use serde::{Deserialize, Serialize};

/// An inclusive latitude/longitude window.
///
/// Wraps `geo::Rect` (`x` = longitude, `y` = latitude). Both intervals are
/// closed, so coordinates lying exactly on an edge are contained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLongBounds {
    pub rect: Rect,
}

impl LatLongBounds {
    /// Build bounds from two opposite corners given in any order.
    ///
    /// # Examples
    ///
    /// ```
    /// use geotiles_types::bounds::LatLongBounds;
    /// use geotiles_types::coordinate::Coordinate;
    ///
    /// let b = LatLongBounds::from_corners(Coordinate::new(2.0, 5.0), Coordinate::new(1.0, 3.0));
    /// assert_eq!(b.lat_interval(), (1.0, 2.0));
    /// assert_eq!(b.long_interval(), (3.0, 5.0));
    /// ```
    pub fn from_corners(a: Coordinate, b: Coordinate) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: a.longitude, y: a.latitude },
                geo::coord! { x: b.longitude, y: b.latitude },
            ),
        }
    }

    /// Build bounds from explicit intervals; each pair may be unordered.
    pub fn from_intervals(lat: (f64, f64), long: (f64, f64)) -> Self {
        Self::from_corners(Coordinate::new(lat.0, long.0), Coordinate::new(lat.1, long.1))
    }

    /// Smallest bounds containing every coordinate, `None` for an empty input.
    pub fn enclosing<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut iter = coords.into_iter();
        let first = *iter.next()?;
        let (mut min, mut max) = (first, first);
        for c in iter {
            min.latitude = min.latitude.min(c.latitude);
            min.longitude = min.longitude.min(c.longitude);
            max.latitude = max.latitude.max(c.latitude);
            max.longitude = max.longitude.max(c.longitude);
        }
        Some(Self::from_corners(min, max))
    }

    pub fn min_lat(&self) -> f64 {
        self.rect.min().y
    }

    pub fn max_lat(&self) -> f64 {
        self.rect.max().y
    }

    pub fn min_long(&self) -> f64 {
        self.rect.min().x
    }

    pub fn max_long(&self) -> f64 {
        self.rect.max().x
    }

    /// `(min, max)` latitude.
    pub fn lat_interval(&self) -> (f64, f64) {
        (self.min_lat(), self.max_lat())
    }

    /// `(min, max)` longitude.
    pub fn long_interval(&self) -> (f64, f64) {
        (self.min_long(), self.max_long())
    }

    /// South-west corner, i.e. the minimum of both axes.
    pub fn southwest(&self) -> Coordinate {
        Coordinate::new(self.min_lat(), self.min_long())
    }

    /// North-east corner, i.e. the maximum of both axes.
    pub fn northeast(&self) -> Coordinate {
        Coordinate::new(self.max_lat(), self.max_long())
    }

    /// Closed-interval containment on both axes.
    pub fn contains(&self, c: &Coordinate) -> bool {
        c.latitude >= self.min_lat()
            && c.latitude <= self.max_lat()
            && c.longitude >= self.min_long()
            && c.longitude <= self.max_long()
    }

    /// Zero extent on either axis.
    pub fn is_degenerate(&self) -> bool {
        self.min_lat() == self.max_lat() || self.min_long() == self.max_long()
    }
}
