//! # placemap
//!
//! Geocode a place name and set up a Leaflet-style map around it.
//!
//! A [`MapInitializer`] creates a map centered on a [`Viewpoint`] right away
//! and hands back a [`Placement`] future. Awaiting the placement looks the
//! place up through a [`Geocode`] backend (Nominatim by default), drops a
//! marker on it, and fits the view so both the original center and the place
//! are visible. The map library itself is injected through [`MapBackend`];
//! the crate ships a headless implementation.
//!
//! ```no_run
//! use placemap::prelude::*;
//!
//! # async fn run() -> placemap::Result<()> {
//! let initializer = MapInitializer::new(
//!     HeadlessBackend::new().with_default_container("map"),
//!     NominatimGeocoder::new(GeocoderConfig::default())?,
//! );
//! let viewpoint = Viewpoint::new(LatLng::new(35.681236, 139.767125), 13);
//! let setup = initializer.create_map("map", viewpoint, Some("東京タワー"))?;
//! let outcome = setup.placement.await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod geocoding;
pub mod layers;
pub mod prelude;
pub mod runtime;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{GeocoderConfig, MapInitOptions},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    initializer::{MapHandle, MapInitializer, MapSetup, Placement, PlacementHandle, PlacementOutcome},
    map::{HeadlessBackend, Map, MapOptions},
    viewport::{Viewpoint, Viewport},
};

pub use geocoding::{Geocode, NominatimGeocoder};

pub use layers::{
    base::LayerTrait,
    marker::{Marker, Popup},
    tile::TileLayer,
};

pub use traits::{MapBackend, MapWidget};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Map container not found: {0}")]
    ContainerNotFound(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Map lock poisoned")]
    Lock,

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` with millisecond timestamps; later calls are no-ops
#[cfg(feature = "debug")]
pub fn init_logger() {
    let _ = env_logger::builder().format_timestamp_millis().try_init();
}
