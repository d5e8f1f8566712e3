use crate::coordinate::Coordinate;
use serde::{Deserialize, Serialize};

/// The geographic footprint of one grid cell.
///
/// Corners are axis-aligned in latitude/longitude space: the eastern corners
/// share one longitude and the southern corners share one latitude. This is
/// not a projected rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileCell {
    pub center: Coordinate,
    pub northwest: Coordinate,
    pub northeast: Coordinate,
    pub southeast: Coordinate,
    pub southwest: Coordinate,
}

impl TileCell {
    /// Build a cell from its north-west anchor and the (signed) degree steps.
    ///
    /// `lat_step` is negative for north-to-south grids.
    pub fn from_anchor(northwest: Coordinate, lat_step: f64, long_step: f64) -> Self {
        let north = northwest.latitude;
        let west = northwest.longitude;
        Self {
            center: Coordinate::new(north + lat_step / 2.0, west + long_step / 2.0),
            northwest,
            northeast: Coordinate::new(north, west + long_step),
            southeast: Coordinate::new(north + lat_step, west + long_step),
            southwest: Coordinate::new(north + lat_step, west),
        }
    }

    /// Corners in `[NW, NE, SE, SW]` order, center excluded.
    #[inline]
    pub fn corners(&self) -> [Coordinate; 4] {
        [self.northwest, self.northeast, self.southeast, self.southwest]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_anchor_layout() {
        let cell = TileCell::from_anchor(Coordinate::new(10.0, 20.0), -0.5, 1.0);
        assert_eq!(cell.northeast, Coordinate::new(10.0, 21.0));
        assert_eq!(cell.southeast, Coordinate::new(9.5, 21.0));
        assert_eq!(cell.southwest, Coordinate::new(9.5, 20.0));
        assert_eq!(cell.center, Coordinate::new(9.75, 20.5));
        assert_eq!(cell.corners()[0], cell.northwest);
    }
}
