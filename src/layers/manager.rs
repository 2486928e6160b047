use crate::{layers::base::LayerTrait, MapError, Result};

use crate::prelude::HashMap;

/// Manages layers for the map, keeping them ordered by z-index
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, Box<dyn LayerTrait>>,
    /// Ordered list of layer IDs (sorted by z-index, insertion order within a z-index)
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Adds a layer to the manager; ids must be unique
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return Err(MapError::Layer(format!("duplicate layer id '{}'", layer_id)));
        }
        let z_index = layer.z_index();

        self.layers.insert(layer_id.clone(), layer);

        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.layers
                    .get(id)
                    .map(|l| l.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, layer_id);
        Ok(())
    }

    /// Removes a layer from the manager
    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        self.render_order.retain(|id| id != layer_id);
        self.layers.remove(layer_id)
    }

    /// Gets a reference to a layer by ID
    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layers.get(layer_id).map(|l| l.as_ref())
    }

    /// Lists all layer IDs in z-order
    pub fn list_layers(&self) -> Vec<String> {
        self.render_order.clone()
    }

    /// Gets all layers in z-order
    pub fn layers(&self) -> Vec<&dyn LayerTrait> {
        self.render_order
            .iter()
            .filter_map(|id| self.layers.get(id).map(|l| l.as_ref()))
            .collect()
    }

    /// Layers of a concrete type, in z-order
    pub fn layers_of<T: 'static>(&self) -> Vec<&T> {
        self.layers()
            .into_iter()
            .filter_map(|layer| layer.as_any().downcast_ref::<T>())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl std::fmt::Debug for LayerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerManager")
            .field("render_order", &self.render_order)
            .finish()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::layers::{marker::Marker, tile::TileLayer};

    #[test]
    fn test_markers_sort_above_tiles() {
        let mut manager = LayerManager::new();
        let marker = Marker::new(LatLng::new(1.0, 2.0));
        let marker_id = marker.id().to_string();
        let tiles = TileLayer::openstreetmap();
        let tiles_id = tiles.id().to_string();

        manager.add_layer(Box::new(marker)).unwrap();
        manager.add_layer(Box::new(tiles)).unwrap();

        assert_eq!(manager.list_layers(), vec![tiles_id, marker_id]);
        assert_eq!(manager.layers_of::<Marker>().len(), 1);
        assert_eq!(manager.layers_of::<TileLayer>().len(), 1);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut manager = LayerManager::new();
        let marker = Marker::with_id("pin".to_string(), LatLng::new(0.0, 0.0));
        let again = Marker::with_id("pin".to_string(), LatLng::new(1.0, 1.0));

        manager.add_layer(Box::new(marker)).unwrap();
        assert!(matches!(
            manager.add_layer(Box::new(again)),
            Err(MapError::Layer(_))
        ));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_remove_layer() {
        let mut manager = LayerManager::new();
        manager
            .add_layer(Box::new(Marker::with_id("pin".to_string(), LatLng::new(0.0, 0.0))))
            .unwrap();

        assert!(manager.remove_layer("pin").is_some());
        assert!(manager.get_layer("pin").is_none());
        assert!(manager.is_empty());
    }
}
