//! Seams between the placement logic and whatever map widget renders it
//!
//! Anything that can be centered, fitted, and given tile layers and markers
//! can host a placement. The crate's headless [`Map`](crate::core::map::Map)
//! is one implementation; bindings to a browser map library are another.

use crate::{
    core::{
        geo::{LatLng, Point},
        map::MapOptions,
    },
    layers::{marker::Marker, tile::TileLayer},
    Result,
};

/// Capabilities consumed from a map widget
pub trait MapWidget: Send {
    /// Identifier of the container the widget is bound to
    fn container_id(&self) -> &str;

    /// Center the view on `center` at `zoom`
    fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()>;

    /// Attach a raster tile layer
    fn add_tile_layer(&mut self, layer: TileLayer) -> Result<()>;

    /// Attach a marker, popup included
    fn add_marker(&mut self, marker: Marker) -> Result<()>;

    /// Pan and zoom so every point is visible with `padding` pixels kept on each side
    fn fit_bounds(&mut self, points: &[LatLng], padding: Point) -> Result<()>;
}

/// Constructs map widgets bound to a container
pub trait MapBackend: Send + Sync {
    type Map: MapWidget + 'static;

    fn create(&self, container_id: &str, options: &MapOptions) -> Result<Self::Map>;
}
