//! Map setup: create a map on a viewpoint, then place the geocoded location
//!
//! [`MapInitializer::create_map`] builds the map synchronously and returns a
//! [`MapSetup`] holding the map handle and a [`Placement`] future. Nothing is
//! geocoded until the placement is awaited or detached onto the runtime.
//!
//! The placement only keeps a weak reference to the map: once every
//! [`MapHandle`] is dropped, a pending placement finishes with
//! [`PlacementOutcome::MapDropped`] without touching it. There is no timeout;
//! callers that stop caring can cancel through [`PlacementHandle`].

use crate::{
    core::{config::MapInitOptions, geo::LatLng, geo::Point, viewport::Viewpoint},
    geocoding::Geocode,
    layers::marker::{Marker, Popup},
    prelude::{Arc, Future, Mutex, Pin, Weak},
    runtime::{self, AsyncHandle},
    traits::{MapBackend, MapWidget},
    MapError, Result,
};
use futures::future::{AbortHandle, Abortable, Aborted, BoxFuture, FutureExt};
use std::task::{Context, Poll};

/// Shared handle on a constructed map
pub struct MapHandle<M> {
    inner: Arc<Mutex<M>>,
}

impl<M> Clone for MapHandle<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<M> MapHandle<M> {
    pub fn new(map: M) -> Self {
        Self {
            inner: Arc::new(Mutex::new(map)),
        }
    }

    /// Runs `f` with exclusive access to the map
    pub fn with<R>(&self, f: impl FnOnce(&mut M) -> R) -> Result<R> {
        let mut map = self.inner.lock().map_err(|_| MapError::Lock)?;
        Ok(f(&mut map))
    }

    fn downgrade(&self) -> Weak<Mutex<M>> {
        Arc::downgrade(&self.inner)
    }
}

impl<M> std::fmt::Debug for MapHandle<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapHandle")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

/// What a finished placement did to the map
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    /// No place name was given; the view was reset to the viewpoint
    CenterOnly,
    /// The place was found, marked, and fitted into the view with the center
    Placed { location: LatLng },
    /// The place name did not geocode; the view was reset to the viewpoint
    NotFound,
    /// Every map handle was dropped before the placement could apply
    MapDropped,
    /// The placement was cancelled through its handle
    Cancelled,
}

/// Cancels a pending [`Placement`]
#[derive(Debug, Clone)]
pub struct PlacementHandle(AbortHandle);

impl PlacementHandle {
    pub fn cancel(&self) {
        self.0.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.is_aborted()
    }
}

/// The asynchronous half of a map setup; resolves once the map is updated
#[must_use = "a placement does nothing unless awaited or detached"]
pub struct Placement {
    inner: Abortable<BoxFuture<'static, Result<PlacementOutcome>>>,
    handle: PlacementHandle,
}

impl Placement {
    fn new(future: BoxFuture<'static, Result<PlacementOutcome>>) -> Self {
        let (abort_handle, registration) = AbortHandle::new_pair();
        Self {
            inner: Abortable::new(future, registration),
            handle: PlacementHandle(abort_handle),
        }
    }

    pub fn handle(&self) -> PlacementHandle {
        self.handle.clone()
    }
}

impl Future for Placement {
    type Output = Result<PlacementOutcome>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.inner).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(Aborted)) => {
                log::debug!("placement cancelled");
                Poll::Ready(Ok(PlacementOutcome::Cancelled))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl std::fmt::Debug for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Placement")
            .field("cancelled", &self.handle.is_cancelled())
            .finish()
    }
}

/// A freshly created map and its pending placement
#[derive(Debug)]
pub struct MapSetup<M> {
    pub map: MapHandle<M>,
    pub placement: Placement,
}

impl<M> MapSetup<M> {
    /// Awaits the placement and returns the map with its outcome
    pub async fn ready(self) -> Result<(MapHandle<M>, PlacementOutcome)> {
        let outcome = self.placement.await?;
        Ok((self.map, outcome))
    }

    /// Drives the placement on the configured runtime and returns immediately.
    /// The map handle is returned even when no runtime is available; the map
    /// then stays at its initial view.
    pub fn detach(self) -> (MapHandle<M>, Result<Box<dyn AsyncHandle>>) {
        let placement = self.placement;
        let task = runtime::spawn(async move {
            match placement.await {
                Ok(outcome) => log::debug!("detached placement finished: {:?}", outcome),
                Err(e) => log::warn!("detached placement failed: {}", e),
            }
        });
        if let Err(e) = &task {
            log::warn!("could not detach placement: {}", e);
        }
        (self.map, task)
    }
}

/// Creates maps through an injected backend and places geocoded locations on them
pub struct MapInitializer<B, G> {
    backend: B,
    geocoder: Arc<G>,
    options: MapInitOptions,
}

impl<B, G> MapInitializer<B, G>
where
    B: MapBackend,
    G: Geocode + 'static,
{
    pub fn new(backend: B, geocoder: G) -> Self {
        Self::with_shared_geocoder(backend, Arc::new(geocoder))
    }

    /// Shares one geocoder between several initializers
    pub fn with_shared_geocoder(backend: B, geocoder: Arc<G>) -> Self {
        Self {
            backend,
            geocoder,
            options: MapInitOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MapInitOptions) -> Self {
        self.options = options;
        self
    }

    /// Creates a map in `container_id` positioned at `viewpoint` with the base
    /// tile layer attached. An empty `place_name` counts as none.
    pub fn create_map(
        &self,
        container_id: &str,
        viewpoint: Viewpoint,
        place_name: Option<&str>,
    ) -> Result<MapSetup<B::Map>> {
        let mut map = self
            .backend
            .create(container_id, &self.options.map_options())?;
        map.set_view(viewpoint.center, viewpoint.zoom_level())?;
        map.add_tile_layer(self.options.base_tile_layer()?)?;

        log::debug!(
            "map '{}' created at ({:.6}, {:.6}) zoom {}",
            container_id,
            viewpoint.center.lat,
            viewpoint.center.lng,
            viewpoint.zoom
        );

        let map = MapHandle::new(map);
        let task = PlacementTask {
            map: map.downgrade(),
            geocoder: self.geocoder.clone(),
            viewpoint,
            place_name: place_name
                .filter(|name| !name.is_empty())
                .map(str::to_owned),
            padding: self.options.fit_padding,
            marker_popup: self.options.marker_popup,
        };

        Ok(MapSetup {
            map,
            placement: Placement::new(task.run().boxed()),
        })
    }
}

struct PlacementTask<M, G> {
    map: Weak<Mutex<M>>,
    geocoder: Arc<G>,
    viewpoint: Viewpoint,
    place_name: Option<String>,
    padding: Point,
    marker_popup: bool,
}

impl<M, G> PlacementTask<M, G>
where
    M: MapWidget + 'static,
    G: Geocode + 'static,
{
    async fn run(self) -> Result<PlacementOutcome> {
        let mut bounds = vec![self.viewpoint.center];

        let location = match self.place_name.as_deref() {
            Some(name) => {
                if self.map.strong_count() == 0 {
                    log::debug!("map dropped before geocoding '{}'", name);
                    return Ok(PlacementOutcome::MapDropped);
                }
                let found = self.geocoder.geocode(name).await;
                if let Some(location) = found {
                    bounds.push(location);
                }
                found
            }
            None => None,
        };

        let Some(shared) = self.map.upgrade() else {
            log::debug!("map dropped before placement could apply");
            return Ok(PlacementOutcome::MapDropped);
        };
        let mut map = shared.lock().map_err(|_| MapError::Lock)?;

        if let (Some(location), Some(name)) = (location, self.place_name.as_deref()) {
            let mut marker = Marker::new(location);
            if self.marker_popup {
                marker = marker.with_popup(Popup::titled(name));
            }
            map.add_marker(marker)?;
        }

        if bounds.len() > 1 {
            map.fit_bounds(&bounds, self.padding)?;
        } else {
            map.set_view(self.viewpoint.center, self.viewpoint.zoom_level())?;
        }

        let outcome = match (self.place_name.as_deref(), location) {
            (None, _) => PlacementOutcome::CenterOnly,
            (Some(_), None) => PlacementOutcome::NotFound,
            (Some(_), Some(location)) => PlacementOutcome::Placed { location },
        };
        log::info!(
            "placement on '{}' finished: {:?}",
            map.container_id(),
            outcome
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::map::{HeadlessBackend, Map};
    use async_trait::async_trait;

    struct FixedGeocoder(Option<LatLng>);

    #[async_trait]
    impl Geocode for FixedGeocoder {
        async fn geocode(&self, _query: &str) -> Option<LatLng> {
            self.0
        }
    }

    fn initializer(answer: Option<LatLng>) -> MapInitializer<HeadlessBackend, FixedGeocoder> {
        MapInitializer::new(
            HeadlessBackend::new().with_default_container("map"),
            FixedGeocoder(answer),
        )
    }

    fn viewpoint() -> Viewpoint {
        Viewpoint::new(LatLng::new(35.681236, 139.767125), 13)
    }

    #[test]
    fn test_map_is_ready_before_placement() {
        let setup = initializer(None).create_map("map", viewpoint(), None).unwrap();

        setup
            .map
            .with(|map: &mut Map| {
                assert_eq!(map.viewport().center, viewpoint().center);
                assert_eq!(map.viewport().zoom, 13.0);
                assert_eq!(map.tile_layers().len(), 1);
                assert!(!map.attribution_control());
            })
            .unwrap();
    }

    #[test]
    fn test_unknown_container_fails() {
        let result = initializer(None).create_map("nowhere", viewpoint(), None);
        assert!(matches!(result, Err(MapError::ContainerNotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_name_is_center_only() {
        let setup = initializer(Some(LatLng::new(0.0, 0.0)))
            .create_map("map", viewpoint(), Some(""))
            .unwrap();
        let (map, outcome) = setup.ready().await.unwrap();

        assert_eq!(outcome, PlacementOutcome::CenterOnly);
        assert!(map.with(|m| m.markers().is_empty()).unwrap());
    }

    #[tokio::test]
    async fn test_cancel_before_poll() {
        let setup = initializer(Some(LatLng::new(35.65858, 139.745433)))
            .create_map("map", viewpoint(), Some("東京タワー"))
            .unwrap();
        let handle = setup.placement.handle();
        handle.cancel();
        assert!(handle.is_cancelled());

        let (map, outcome) = setup.ready().await.unwrap();
        assert_eq!(outcome, PlacementOutcome::Cancelled);
        assert!(map.with(|m| m.markers().is_empty()).unwrap());
    }

    #[tokio::test]
    async fn test_dropped_map_is_left_alone() {
        let setup = initializer(Some(LatLng::new(35.65858, 139.745433)))
            .create_map("map", viewpoint(), Some("東京タワー"))
            .unwrap();
        let MapSetup { map, placement } = setup;
        drop(map);

        assert_eq!(placement.await.unwrap(), PlacementOutcome::MapDropped);
    }
}
