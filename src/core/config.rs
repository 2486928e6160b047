//! Configuration for geocoding requests and map setup
//!
//! Defaults reproduce the stock behavior: Nominatim search localized to
//! Japanese, OpenStreetMap tiles up to zoom 18, attribution hidden, and a
//! 50px margin when fitting the view. Both structs deserialize from JSON with
//! any missing field falling back to its default.

use crate::{
    core::{
        constants::{
            DEFAULT_ACCEPT_LANGUAGE, DEFAULT_MAX_ZOOM, DEFAULT_RESULT_LIMIT, DEFAULT_USER_AGENT,
            FIT_BOUNDS_PADDING, NOMINATIM_SEARCH_URL, OSM_SUBDOMAINS, OSM_TILE_TEMPLATE,
        },
        geo::Point,
        map::MapOptions,
    },
    layers::tile::{TileLayer, TileLayerOptions},
    Result,
};
use serde::{Deserialize, Serialize};

/// Settings for the place-search service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Search endpoint, queried with `format`, `q` and `limit` parameters
    pub endpoint: String,
    /// Value of the `Accept-Language` header
    pub accept_language: String,
    pub limit: u32,
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: NOMINATIM_SEARCH_URL.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            limit: DEFAULT_RESULT_LIMIT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl GeocoderConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_accept_language(mut self, language: impl Into<String>) -> Self {
        self.accept_language = language.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Settings applied by the map initializer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapInitOptions {
    /// Base tile layer template
    pub tile_url_template: String,
    pub tile_subdomains: Vec<String>,
    pub tile_max_zoom: u8,
    /// Attribution is usually shown by the surrounding page instead
    pub attribution_control: bool,
    /// Margin kept on each side when fitting the view to the center and the place
    pub fit_padding: Point,
    /// Bind a popup with the place name to the marker
    pub marker_popup: bool,
}

impl Default for MapInitOptions {
    fn default() -> Self {
        Self {
            tile_url_template: OSM_TILE_TEMPLATE.to_string(),
            tile_subdomains: OSM_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
            tile_max_zoom: DEFAULT_MAX_ZOOM,
            attribution_control: false,
            fit_padding: FIT_BOUNDS_PADDING.into(),
            marker_popup: true,
        }
    }
}

impl MapInitOptions {
    pub fn with_tile_url_template(mut self, template: impl Into<String>) -> Self {
        self.tile_url_template = template.into();
        self
    }

    pub fn with_tile_max_zoom(mut self, max_zoom: u8) -> Self {
        self.tile_max_zoom = max_zoom;
        self
    }

    pub fn with_fit_padding(mut self, padding: Point) -> Self {
        self.fit_padding = padding;
        self
    }

    pub fn with_attribution_control(mut self, show: bool) -> Self {
        self.attribution_control = show;
        self
    }

    pub fn with_marker_popup(mut self, popup: bool) -> Self {
        self.marker_popup = popup;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Options passed to the backend when constructing the map
    pub fn map_options(&self) -> MapOptions {
        MapOptions {
            attribution_control: self.attribution_control,
            ..MapOptions::default()
        }
    }

    /// Builds the base tile layer described by these options
    pub fn base_tile_layer(&self) -> Result<TileLayer> {
        TileLayer::new(
            self.tile_url_template.clone(),
            TileLayerOptions {
                max_zoom: self.tile_max_zoom,
                subdomains: self.tile_subdomains.clone(),
                ..TileLayerOptions::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocoder_defaults() {
        let config = GeocoderConfig::default();
        assert_eq!(config.endpoint, "https://nominatim.openstreetmap.org/search");
        assert_eq!(config.accept_language, "ja");
        assert_eq!(config.limit, 1);
        assert!(config.user_agent.starts_with("placemap/"));
    }

    #[test]
    fn test_geocoder_partial_json() {
        let config = GeocoderConfig::from_json(r#"{ "accept_language": "en" }"#).unwrap();
        assert_eq!(config.accept_language, "en");
        assert_eq!(config.limit, 1);
        assert_eq!(config.endpoint, NOMINATIM_SEARCH_URL);
    }

    #[test]
    fn test_map_init_defaults() {
        let options = MapInitOptions::default();
        assert!(!options.attribution_control);
        assert!(!options.map_options().attribution_control);
        assert_eq!(options.fit_padding, Point::new(50.0, 50.0));

        let layer = options.base_tile_layer().unwrap();
        assert_eq!(layer.url_template(), OSM_TILE_TEMPLATE);
        assert_eq!(layer.max_zoom(), 18);
    }

    #[test]
    fn test_map_init_from_json() {
        let options = MapInitOptions::from_json(
            r#"{ "tile_max_zoom": 17, "fit_padding": { "x": 10.0, "y": 20.0 } }"#,
        )
        .unwrap();
        assert_eq!(options.tile_max_zoom, 17);
        assert_eq!(options.fit_padding, Point::new(10.0, 20.0));
        assert!(options.marker_popup);
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        assert!(matches!(
            MapInitOptions::from_json("not json"),
            Err(crate::MapError::Serialization(_))
        ));
    }
}
