//! # geotiles-types
//!
//! Plain value types shared by the geotiles grid builders and query engine:
//!
//! - **Coordinates**: `Coordinate`, `CoordinateDelta`
//! - **Cells**: `TileCell`, the five-point footprint of one grid cell
//! - **Bounds**: `LatLongBounds`, an inclusive latitude/longitude window
//!
//! All types are serializable with Serde and convert to and from the `geo`
//! crate's primitives (`x` = longitude, `y` = latitude).
//!
//! ## Examples
//!
//! ```rust
//! use geotiles_types::bounds::LatLongBounds;
//! use geotiles_types::coordinate::Coordinate;
//!
//! let window = LatLongBounds::from_corners(
//!     Coordinate::new(50.0, 30.0),
//!     Coordinate::new(50.1, 30.2),
//! );
//! assert!(window.contains(&Coordinate::new(50.05, 30.1)));
//! ```

pub mod bounds;
pub mod cell;
pub mod coordinate;
