use crate::core::constants::MAX_QUEUED_EVENTS;
use crate::core::geo::{LatLng, LatLngBounds, Point};
use crate::prelude::{HashMap, VecDeque};
use serde::{Deserialize, Serialize};

/// Map-level events emitted by the headless map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    /// Map view has changed (center or zoom)
    ViewChanged { center: LatLng, zoom: f64 },
    /// A layer was added to the map
    LayerAdd { layer_id: String },
    /// The view was fitted to a set of coordinates
    BoundsFitted { bounds: LatLngBounds, padding: Point },
}

impl MapEvent {
    /// Leaflet-style event name used to register listeners
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::ViewChanged { .. } => "viewchanged",
            MapEvent::LayerAdd { .. } => "layeradd",
            MapEvent::BoundsFitted { .. } => "boundsfitted",
        }
    }
}

pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Event management system for the map
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for an event type
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Queues an event; the oldest one is dropped once the queue is full
    pub fn emit(&mut self, event: MapEvent) {
        if self.event_queue.len() >= MAX_QUEUED_EVENTS {
            if let Some(dropped) = self.event_queue.pop_front() {
                log::debug!("event queue full, dropping {}", dropped.event_type());
            }
        }
        self.event_queue.push_back(event);
    }

    /// Drains queued events, dispatching each to its listeners
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    pub fn pending(&self) -> usize {
        self.event_queue.len()
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("listeners", &self.listeners.keys().collect::<Vec<_>>())
            .field("event_queue", &self.event_queue)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_listeners_receive_matching_events() {
        let mut events = EventManager::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        events.on("layeradd", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        events.emit(MapEvent::LayerAdd {
            layer_id: "tiles".to_string(),
        });
        events.emit(MapEvent::ViewChanged {
            center: LatLng::new(0.0, 0.0),
            zoom: 3.0,
        });
        assert_eq!(events.pending(), 2);

        let drained = events.process_events();
        assert_eq!(drained.len(), 2);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(events.pending(), 0);
    }

    #[test]
    fn test_queue_drops_oldest_when_full() {
        let mut events = EventManager::new();
        for i in 0..=MAX_QUEUED_EVENTS {
            events.emit(MapEvent::LayerAdd {
                layer_id: format!("layer-{}", i),
            });
        }
        assert_eq!(events.pending(), MAX_QUEUED_EVENTS);

        let drained = events.process_events();
        assert_eq!(
            drained.first(),
            Some(&MapEvent::LayerAdd {
                layer_id: "layer-1".to_string()
            })
        );
    }
}
