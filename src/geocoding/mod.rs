//! Geocoding: place name to coordinates
//!
//! Lookups are best effort. Every failure (empty query, transport error,
//! error status, malformed payload, no match) is reported as `None`.

pub mod nominatim;

use crate::core::geo::LatLng;
use async_trait::async_trait;
use std::sync::Arc;

pub use nominatim::{parse_search_response, NominatimGeocoder, SearchHit};

/// Trait for geocoding backends
#[async_trait]
pub trait Geocode: Send + Sync {
    /// Resolves `query` to the coordinates of its best match, if any
    async fn geocode(&self, query: &str) -> Option<LatLng>;
}

#[async_trait]
impl<G: Geocode + ?Sized> Geocode for Arc<G> {
    async fn geocode(&self, query: &str) -> Option<LatLng> {
        (**self).geocode(query).await
    }
}

#[async_trait]
impl<G: Geocode + ?Sized> Geocode for Box<G> {
    async fn geocode(&self, query: &str) -> Option<LatLng> {
        (**self).geocode(query).await
    }
}
