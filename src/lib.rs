//! Embedded map tile storage: tile grids over rectangles and polyline
//! corridors, imagery import, and spatial tile queries.
//!
//! ```rust
//! use geotiles::{Coordinate, ImportRegion, build_tiles_grid};
//!
//! let region = ImportRegion::rectangle(Coordinate::new(50.0, 30.0), Coordinate::new(49.8, 30.3));
//! let grid = build_tiles_grid(&region, 5.0, 640)?;
//! assert_eq!(grid.len(), 49);
//! assert!(grid.tile_width_px() <= 640 && grid.tile_height_px() <= 640);
//! # Ok::<(), geotiles::GeoTilesError>(())
//! ```

pub mod builder;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod geodesy;
pub mod grid;
pub mod import;
pub mod layer;
pub mod profiles;
pub mod provider;
pub mod query;
pub mod storage;
pub mod tile;

pub use builder::MapStorageBuilder;
pub use config::{Config, ImportConfig, ProviderConfig};
pub use db::MapStorage;
pub use error::{GeoTilesError, Result};

pub use geotiles_types::bounds::LatLongBounds;
pub use geotiles_types::cell::TileCell;
pub use geotiles_types::coordinate::{Coordinate, CoordinateDelta};

pub use features::{FeatureExtractor, UnconfiguredExtractor};
pub use geodesy::{destination_point, distance_to_segment, geodesic_distance};
pub use grid::{Grid, ImportRegion, build_polyline_grid, build_rectangle_grid, build_tiles_grid};
pub use import::{ImportActions, ImportMapLayerCommand};
pub use layer::{FastParams, ImportType, Layer, LayerCapabilities, SurfParams};
pub use profiles::{ImportProfile, ProfileId, ProfileShape};
pub use provider::{
    GoogleStaticMapsProvider, HttpClient, HttpResponse, MapProvider, ZOOM_METERS_PER_PIXEL,
    meters_per_pixel_for_zoom,
};
pub use query::{RectangleQuery, SquareQuery, TileQuery, TileResponse, TileSelection};
pub use storage::{LayerDetails, LayerSummary, MemoryStore, StoreStats, TileFootprint, TileStore};
pub use tile::{KeyPoint, LayerId, PixelPoint, SurfFeatures, Tile, TileId, TileImage};

#[cfg(feature = "snapshot")]
pub use storage::{SnapshotConfig, SnapshotFile};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GeoTilesError, MapStorage, MapStorageBuilder, Result};

    pub use crate::{Coordinate, LatLongBounds, TileCell};

    pub use crate::{ImportActions, ImportMapLayerCommand, ImportRegion};

    pub use crate::{RectangleQuery, SquareQuery, TileQuery, TileSelection};

    pub use crate::{Config, FeatureExtractor, MapProvider};
}
