//! Core constants derived from Leaflet defaults and the Nominatim search API.
//! Keeping them in a single place makes it easier to tweak crate-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// OpenStreetMap standard tile template, `{s}` rotates over [`OSM_SUBDOMAINS`].
pub const OSM_TILE_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

pub const OSM_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

/// Highest zoom served by the OSM tile servers.
pub const DEFAULT_MAX_ZOOM: u8 = 18;

pub const DEFAULT_MIN_ZOOM: u8 = 0;

/// Padding in pixels kept on each side when fitting the view to a set of points.
pub const FIT_BOUNDS_PADDING: (f64, f64) = (50.0, 50.0);

/// Viewport size used by the headless backend for containers registered without one.
pub const DEFAULT_CONTAINER_SIZE: (f64, f64) = (800.0, 600.0);

/// Events kept by a map whose queue is never drained.
pub const MAX_QUEUED_EVENTS: usize = 256;

/// Public Nominatim search endpoint.
pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Results are requested localized to Japanese.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ja";

/// Only the best match is ever used.
pub const DEFAULT_RESULT_LIMIT: u32 = 1;

/// Nominatim's usage policy requires an identifying user agent.
pub const DEFAULT_USER_AGENT: &str = concat!("placemap/", env!("CARGO_PKG_VERSION"));

/// Web Mercator limit; latitudes beyond this are clamped before projecting.
pub const MAX_LATITUDE: f64 = 85.0511287798;

pub const EARTH_RADIUS: f64 = 6378137.0;
