use crate::{
    core::{
        constants::{DEFAULT_CONTAINER_SIZE, MAX_QUEUED_EVENTS},
        events::{EventManager, MapEvent},
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    layers::{base::LayerTrait, manager::LayerManager, marker::Marker, tile::TileLayer},
    prelude::HashMap,
    traits::{MapBackend, MapWidget},
    MapError, Result,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    /// Show the attribution control of tile layers
    pub attribution_control: bool,
    pub min_zoom: Option<f64>,
    /// Overrides the max zoom otherwise taken from the tile layers
    pub max_zoom: Option<f64>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            attribution_control: true,
            min_zoom: None,
            max_zoom: None,
        }
    }
}

/// Headless, Leaflet-compatible map model: viewport math, layers and events
/// without any rendering.
///
/// Events queue up until [`Map::process_events`] drains them; the queue keeps
/// only the most recent [`MAX_QUEUED_EVENTS`] when nobody drains it.
#[derive(Debug)]
pub struct Map {
    container_id: String,
    viewport: Viewport,
    layer_manager: LayerManager,
    event_manager: EventManager,
    options: MapOptions,
}

impl Map {
    pub fn new(container_id: impl Into<String>, size: Point, options: MapOptions) -> Self {
        let mut map = Self {
            container_id: container_id.into(),
            viewport: Viewport::new(LatLng::default(), 0.0, size),
            layer_manager: LayerManager::new(),
            event_manager: EventManager::new(),
            options,
        };
        map.refresh_zoom_limits();
        map
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()> {
        if !center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "view center ({}, {})",
                center.lat, center.lng
            )));
        }
        if !zoom.is_finite() {
            return Err(MapError::InvalidCoordinates(format!("view zoom {}", zoom)));
        }

        let old_center = self.viewport.center;
        let old_zoom = self.viewport.zoom;

        self.viewport.set_view(center, zoom);

        if self.viewport.center != old_center || self.viewport.zoom != old_zoom {
            self.event_manager.emit(MapEvent::ViewChanged {
                center: self.viewport.center,
                zoom: self.viewport.zoom,
            });
        }

        Ok(())
    }

    pub fn fit_bounds(&mut self, points: &[LatLng], padding: Point) -> Result<()> {
        if let Some(invalid) = points.iter().find(|p| !p.is_valid()) {
            return Err(MapError::InvalidCoordinates(format!(
                "bounds point ({}, {})",
                invalid.lat, invalid.lng
            )));
        }
        let bounds = LatLngBounds::from_points(points).ok_or_else(|| {
            MapError::InvalidCoordinates("cannot fit the view to an empty point list".to_string())
        })?;

        self.viewport.fit_bounds(&bounds, padding);

        self.event_manager.emit(MapEvent::BoundsFitted { bounds, padding });
        self.event_manager.emit(MapEvent::ViewChanged {
            center: self.viewport.center,
            zoom: self.viewport.zoom,
        });
        Ok(())
    }

    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        self.layer_manager.add_layer(layer)?;
        self.refresh_zoom_limits();

        log::debug!("layer '{}' added to map '{}'", layer_id, self.container_id);
        self.event_manager.emit(MapEvent::LayerAdd { layer_id });
        Ok(())
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        let removed = self.layer_manager.remove_layer(layer_id);
        if removed.is_some() {
            self.refresh_zoom_limits();
        }
        removed
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    pub fn list_layers(&self) -> Vec<String> {
        self.layer_manager.list_layers()
    }

    pub fn markers(&self) -> Vec<&Marker> {
        self.layer_manager.layers_of::<Marker>()
    }

    pub fn tile_layers(&self) -> Vec<&TileLayer> {
        self.layer_manager.layers_of::<TileLayer>()
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn attribution_control(&self) -> bool {
        self.options.attribution_control
    }

    /// Zoom limits come from the options when set, otherwise from the tile
    /// layers (widest range across them), otherwise the defaults.
    fn refresh_zoom_limits(&mut self) {
        let tiles = self.tile_layers();
        let layer_min = tiles.iter().map(|t| f64::from(t.min_zoom())).reduce(f64::min);
        let layer_max = tiles.iter().map(|t| f64::from(t.max_zoom())).reduce(f64::max);

        let default_viewport = Viewport::default();
        let finite = |zoom: f64| {
            if !zoom.is_finite() {
                log::warn!("ignoring non-finite zoom limit {} on '{}'", zoom, self.container_id);
            }
            zoom.is_finite()
        };
        let min_zoom = self
            .options
            .min_zoom
            .filter(|zoom| finite(*zoom))
            .or(layer_min)
            .unwrap_or(default_viewport.min_zoom);
        let max_zoom = self
            .options
            .max_zoom
            .filter(|zoom| finite(*zoom))
            .or(layer_max)
            .unwrap_or(default_viewport.max_zoom);

        self.viewport.set_zoom_limits(min_zoom, max_zoom);
    }
}

impl MapWidget for Map {
    fn container_id(&self) -> &str {
        &self.container_id
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()> {
        Map::set_view(self, center, zoom)
    }

    fn add_tile_layer(&mut self, layer: TileLayer) -> Result<()> {
        self.add_layer(Box::new(layer))
    }

    fn add_marker(&mut self, marker: Marker) -> Result<()> {
        self.add_layer(Box::new(marker))
    }

    fn fit_bounds(&mut self, points: &[LatLng], padding: Point) -> Result<()> {
        Map::fit_bounds(self, points, padding)
    }
}

/// Creates headless [`Map`]s for a fixed set of known containers
#[derive(Debug, Clone, Default)]
pub struct HeadlessBackend {
    containers: HashMap<String, Point>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a container with the given pixel size
    pub fn with_container(mut self, container_id: impl Into<String>, size: Point) -> Self {
        self.containers.insert(container_id.into(), size);
        self
    }

    /// Registers a container with the default 800x600 size
    pub fn with_default_container(self, container_id: impl Into<String>) -> Self {
        self.with_container(container_id, DEFAULT_CONTAINER_SIZE.into())
    }

    pub fn container_size(&self, container_id: &str) -> Option<Point> {
        self.containers.get(container_id).copied()
    }
}

impl MapBackend for HeadlessBackend {
    type Map = Map;

    fn create(&self, container_id: &str, options: &MapOptions) -> Result<Map> {
        let size = self
            .container_size(container_id)
            .ok_or_else(|| MapError::ContainerNotFound(container_id.to_string()))?;
        Ok(Map::new(container_id, size, options.clone()))
    }
}
