//! Shared helpers for integration tests

#![allow(dead_code)]

use placemap::{
    core::map::MapOptions, Geocode, LatLng, MapBackend, MapError, MapWidget, Marker, Point,
    TileLayer,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Minimal HTTP/1.1 server answering every request with the same canned response
pub struct CannedServer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    pub async fn start(status: &'static str, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut head = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = socket.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&chunk[..n]);
                    if head.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                seen.lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&head).into_owned());

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { addr, requests }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/search", self.addr)
    }

    /// Raw request heads received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Geocoder returning a fixed answer and counting lookups
#[derive(Default)]
pub struct StubGeocoder {
    pub answer: Option<LatLng>,
    pub queries: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
}

impl StubGeocoder {
    pub fn answering(answer: Option<LatLng>) -> Self {
        Self {
            answer,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Geocode for StubGeocoder {
    async fn geocode(&self, query: &str) -> Option<LatLng> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        self.answer
    }
}

/// Geocoder that waits until released, for exercising slow lookups
pub struct GatedGeocoder {
    pub answer: Option<LatLng>,
    pub gate: tokio::sync::Notify,
}

#[async_trait::async_trait]
impl Geocode for GatedGeocoder {
    async fn geocode(&self, _query: &str) -> Option<LatLng> {
        self.gate.notified().await;
        self.answer
    }
}

/// Calls made on a [`RecordingMap`], in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetView(LatLng, f64),
    AddTileLayer { template: String, max_zoom: u8 },
    AddMarker { position: LatLng, popup: Option<String> },
    FitBounds(Vec<LatLng>, Point),
}

/// Map widget that only records what it was asked to do
#[derive(Debug)]
pub struct RecordingMap {
    pub container_id: String,
    pub options: MapOptions,
    pub calls: Vec<Call>,
}

impl RecordingMap {
    pub fn markers(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::AddMarker { .. }))
            .collect()
    }

    pub fn last_call(&self) -> Option<&Call> {
        self.calls.last()
    }
}

impl MapWidget for RecordingMap {
    fn container_id(&self) -> &str {
        &self.container_id
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) -> placemap::Result<()> {
        self.calls.push(Call::SetView(center, zoom));
        Ok(())
    }

    fn add_tile_layer(&mut self, layer: TileLayer) -> placemap::Result<()> {
        self.calls.push(Call::AddTileLayer {
            template: layer.url_template().to_string(),
            max_zoom: layer.max_zoom(),
        });
        Ok(())
    }

    fn add_marker(&mut self, marker: Marker) -> placemap::Result<()> {
        self.calls.push(Call::AddMarker {
            position: marker.position(),
            popup: marker.popup().map(|p| p.content.clone()),
        });
        Ok(())
    }

    fn fit_bounds(&mut self, points: &[LatLng], padding: Point) -> placemap::Result<()> {
        self.calls.push(Call::FitBounds(points.to_vec(), padding));
        Ok(())
    }
}

pub struct RecordingBackend;

impl MapBackend for RecordingBackend {
    type Map = RecordingMap;

    fn create(&self, container_id: &str, options: &MapOptions) -> placemap::Result<RecordingMap> {
        if container_id.is_empty() {
            return Err(MapError::ContainerNotFound(String::new()));
        }
        Ok(RecordingMap {
            container_id: container_id.to_string(),
            options: options.clone(),
            calls: Vec::new(),
        })
    }
}
