//! Prelude module for common placemap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use placemap::prelude::*;`

pub use crate::core::{
    config::{GeocoderConfig, MapInitOptions},
    events::MapEvent,
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    initializer::{MapHandle, MapInitializer, MapSetup, Placement, PlacementHandle, PlacementOutcome},
    map::{HeadlessBackend, Map, MapOptions},
    viewport::{Viewpoint, Viewport},
};

pub use crate::layers::{
    base::LayerTrait,
    marker::{Marker, Popup},
    tile::{TileLayer, TileLayerOptions},
};

pub use crate::geocoding::{Geocode, NominatimGeocoder};

pub use crate::traits::{MapBackend, MapWidget};

pub use crate::runtime::{spawn, AsyncHandle, AsyncSpawner};

pub use crate::{MapError, Result};

pub use std::{
    collections::VecDeque,
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, Weak},
    time::Duration,
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
