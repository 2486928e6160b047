use crate::{
    core::{
        constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, OSM_SUBDOMAINS, OSM_TILE_TEMPLATE, TILE_SIZE},
        geo::TileCoord,
    },
    layers::base::{next_layer_id, LayerProperties, LayerTrait, LayerType},
    MapError, Result,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerOptions {
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub subdomains: Vec<String>,
    pub attribution: Option<String>,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            subdomains: OSM_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
            attribution: None,
        }
    }
}

/// Raster tile layer described by a URL template such as
/// `https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png`
pub struct TileLayer {
    properties: LayerProperties,
    url_template: String,
    options: TileLayerOptions,
}

impl TileLayer {
    pub fn new(url_template: impl Into<String>, options: TileLayerOptions) -> Result<Self> {
        let url_template = url_template.into();
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !url_template.contains(placeholder) {
                return Err(MapError::Layer(format!(
                    "tile template '{}' is missing {}",
                    url_template, placeholder
                )));
            }
        }
        if url_template.contains("{s}") && options.subdomains.is_empty() {
            return Err(MapError::Layer(format!(
                "tile template '{}' uses {{s}} but no subdomains are configured",
                url_template
            )));
        }
        if options.min_zoom > options.max_zoom {
            return Err(MapError::Layer(format!(
                "min zoom {} is above max zoom {}",
                options.min_zoom, options.max_zoom
            )));
        }

        let properties =
            LayerProperties::new(next_layer_id("tiles"), "Tile Layer".to_string(), LayerType::Tile);
        Ok(Self {
            properties,
            url_template,
            options,
        })
    }

    /// Standard OpenStreetMap tiles up to zoom 18
    pub fn openstreetmap() -> Self {
        Self {
            properties: LayerProperties::new(
                next_layer_id("tiles"),
                "OpenStreetMap".to_string(),
                LayerType::Tile,
            ),
            url_template: OSM_TILE_TEMPLATE.to_string(),
            options: TileLayerOptions::default(),
        }
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    pub fn max_zoom(&self) -> u8 {
        self.options.max_zoom
    }

    pub fn min_zoom(&self) -> u8 {
        self.options.min_zoom
    }

    /// Expands the template for one tile; `{s}` rotates over the subdomains
    pub fn tile_url(&self, coord: TileCoord) -> String {
        let mut url = self
            .url_template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
            .replace("{r}", "");

        if !self.options.subdomains.is_empty() {
            let idx = ((coord.x as u64 + coord.y as u64) % self.options.subdomains.len() as u64) as usize;
            url = url.replace("{s}", &self.options.subdomains[idx]);
        }

        url
    }
}

impl std::fmt::Debug for TileLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileLayer")
            .field("id", &self.properties.id)
            .field("url_template", &self.url_template)
            .field("options", &self.options)
            .finish()
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "url_template": self.url_template,
            "tile_size": self.options.tile_size,
            "min_zoom": self.options.min_zoom,
            "max_zoom": self.options.max_zoom,
            "subdomains": self.options.subdomains,
            "attribution": self.options.attribution,
        })
    }

    fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        let mut merged = serde_json::to_value(&self.options)?;
        if let (Some(target), Some(source)) = (merged.as_object_mut(), options.as_object()) {
            for (key, value) in source {
                if key != "url_template" {
                    target.insert(key.clone(), value.clone());
                }
            }
        }
        self.options = serde_json::from_value(merged)?;
        Ok(())
    }
}
