use crate::core::constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, EARTH_RADIUS, TILE_SIZE};
use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Initial view requested by the caller: where to center and how far to zoom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub center: LatLng,
    pub zoom: u8,
}

impl Viewpoint {
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self { center, zoom }
    }

    /// Zoom as the fractional level map widgets work with
    pub fn zoom_level(&self) -> f64 {
        f64::from(self.zoom)
    }
}

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        let min_zoom = f64::from(DEFAULT_MIN_ZOOM);
        let max_zoom = f64::from(DEFAULT_MAX_ZOOM);
        Self {
            center,
            zoom: zoom.clamp(min_zoom, max_zoom),
            size,
            min_zoom,
            max_zoom,
        }
    }

    /// Sets center and zoom in one step, clamping the zoom
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.set_zoom(zoom);
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the zoom limits; non-finite limits leave the current one in place
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        if min_zoom.is_finite() {
            self.min_zoom = min_zoom;
        }
        if max_zoom.is_finite() {
            self.max_zoom = max_zoom;
        }
        self.max_zoom = self.max_zoom.max(self.min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level
    /// (Web Mercator, EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let z = zoom.unwrap_or(self.zoom);
        let scale = f64::from(TILE_SIZE) * 2_f64.powf(z);
        let circumference = 2.0 * PI * EARTH_RADIUS;

        let lat = LatLng::clamp_lat(lat_lng.lat);
        let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
        let y = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() * EARTH_RADIUS;

        let pixel_x = (x + PI * EARTH_RADIUS) / circumference * scale;
        let pixel_y = (-y + PI * EARTH_RADIUS) / circumference * scale;

        Point::new(pixel_x, pixel_y)
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom level
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let z = zoom.unwrap_or(self.zoom);
        let scale = f64::from(TILE_SIZE) * 2_f64.powf(z);
        let circumference = 2.0 * PI * EARTH_RADIUS;

        let x = (pixel.x / scale) * circumference - PI * EARTH_RADIUS;
        let y = PI * EARTH_RADIUS - (pixel.y / scale) * circumference;

        let lng = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();

        LatLng::new(lat, lng)
    }

    /// Converts container pixel coordinates to a geographical coordinate
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let half = self.size.multiply(0.5);
        let world = self
            .project(&self.center, None)
            .add(&pixel.subtract(&half));
        self.unproject(&world, None)
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&Point::new(self.size.x, self.size.y));

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    /// Largest integer zoom at which `bounds` fits inside the viewport
    /// shrunk by `padding` on every side
    pub fn bounds_zoom(&self, bounds: &LatLngBounds, padding: Point) -> f64 {
        let available = Point::new(
            self.size.x - 2.0 * padding.x,
            self.size.y - 2.0 * padding.y,
        );

        let mut best_zoom = self.min_zoom;

        for test_zoom in (self.min_zoom.ceil() as i32)..=(self.max_zoom.floor() as i32) {
            let zoom = test_zoom as f64;

            let nw = self.project(&bounds.north_west(), Some(zoom));
            let se = self.project(&bounds.south_east(), Some(zoom));

            let bounds_width = (se.x - nw.x).abs();
            let bounds_height = (se.y - nw.y).abs();

            if bounds_width <= available.x && bounds_height <= available.y {
                best_zoom = zoom;
            } else {
                break;
            }
        }

        best_zoom
    }

    /// Fits the viewport to contain the given bounds, centering on the
    /// projected midpoint of the bounds
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: Point) {
        let zoom = self.bounds_zoom(bounds, padding);

        let sw = self.project(&bounds.south_west, Some(zoom));
        let ne = self.project(&bounds.north_east, Some(zoom));
        let center = self.unproject(&sw.add(&ne).multiply(0.5), Some(zoom));

        log::debug!(
            "fit_bounds -> center ({:.6}, {:.6}) zoom {}",
            center.lat,
            center.lng,
            zoom
        );

        self.set_view(center, zoom);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(
            LatLng::new(0.0, 0.0),
            0.0,
            crate::core::constants::DEFAULT_CONTAINER_SIZE.into(),
        )
    }
}
