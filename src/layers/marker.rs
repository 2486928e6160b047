use crate::{
    core::geo::LatLng,
    layers::base::{next_layer_id, LayerProperties, LayerTrait},
    MapError, Result,
};
use maud::html;
use serde::{Deserialize, Serialize};

/// HTML content shown when a marker is opened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub content: String,
}

impl Popup {
    /// Popup with raw HTML content, inserted as-is
    pub fn new(content: String) -> Self {
        Self { content }
    }

    /// Popup showing `title` in bold; the title is HTML-escaped
    pub fn titled(title: &str) -> Self {
        Self::new(html! { strong { (title) } }.into_string())
    }
}

pub struct Marker {
    properties: LayerProperties,
    position: LatLng,
    popup: Option<Popup>,
}

impl Marker {
    pub fn new(position: LatLng) -> Self {
        Self::with_id(next_layer_id("marker"), position)
    }

    pub fn with_id(id: String, position: LatLng) -> Self {
        let properties = LayerProperties::new(
            id,
            "Marker".to_string(),
            crate::layers::base::LayerType::Marker,
        );
        Self {
            properties,
            position,
            popup: None,
        }
    }

    /// Binds a popup to the marker
    pub fn with_popup(mut self, popup: Popup) -> Self {
        self.popup = Some(popup);
        self
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }
}

impl std::fmt::Debug for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Marker")
            .field("id", &self.properties.id)
            .field("position", &self.position)
            .field("popup", &self.popup)
            .finish()
    }
}

impl LayerTrait for Marker {
    crate::impl_layer_trait!(Marker, properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "position": {
                "lat": self.position.lat,
                "lng": self.position.lng
            },
            "popup": self.popup.as_ref().map(|p| p.content.clone())
        })
    }

    fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        if let Some(position) = options.get("position") {
            let position: LatLng = serde_json::from_value(position.clone())?;
            if !position.is_valid() {
                return Err(MapError::InvalidCoordinates(format!(
                    "marker position ({}, {})",
                    position.lat, position.lng
                )));
            }
            self.position = position;
        }
        match options.get("popup") {
            Some(serde_json::Value::String(content)) => {
                self.popup = Some(Popup::new(content.clone()))
            }
            Some(serde_json::Value::Null) => self.popup = None,
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titled_popup_escapes_html() {
        let popup = Popup::titled("Tom & Jerry <b>");
        assert_eq!(popup.content, "<strong>Tom &amp; Jerry &lt;b&gt;</strong>");
    }

    #[test]
    fn test_titled_popup_keeps_unicode() {
        assert_eq!(Popup::titled("東京タワー").content, "<strong>東京タワー</strong>");
    }

    #[test]
    fn test_marker_options() {
        let mut marker = Marker::new(LatLng::new(35.0, 139.0)).with_popup(Popup::titled("here"));
        let options = marker.options();
        assert_eq!(options["position"]["lat"], 35.0);
        assert_eq!(options["popup"], "<strong>here</strong>");

        marker
            .set_options(serde_json::json!({ "position": { "lat": 1.0, "lng": 2.0 }, "popup": null }))
            .unwrap();
        assert_eq!(marker.position(), LatLng::new(1.0, 2.0));
        assert!(marker.popup().is_none());
    }

    #[test]
    fn test_marker_rejects_invalid_position() {
        let mut marker = Marker::new(LatLng::new(0.0, 0.0));
        let result = marker.set_options(serde_json::json!({ "position": { "lat": 100.0, "lng": 0.0 } }));
        assert!(matches!(result, Err(MapError::InvalidCoordinates(_))));
    }
}
