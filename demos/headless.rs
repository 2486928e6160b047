use placemap::prelude::*;

/// Geocodes a place against the public Nominatim API and fits a headless map around it
#[tokio::main]
async fn main() -> placemap::Result<()> {
    let _ = env_logger::builder().format_timestamp_millis().try_init();

    let place = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "東京タワー".to_string());

    let initializer = MapInitializer::new(
        HeadlessBackend::new().with_container("map", Point::new(1024.0, 768.0)),
        NominatimGeocoder::new(GeocoderConfig::default())?,
    );

    // Tokyo Station
    let viewpoint = Viewpoint::new(LatLng::new(35.681236, 139.767125), 13);
    let setup = initializer.create_map("map", viewpoint, Some(place.as_str()))?;

    setup.map.with(|map| {
        println!(
            "Map created: center {:.4}, {:.4} zoom {}",
            map.viewport().center.lat,
            map.viewport().center.lng,
            map.viewport().zoom
        );
    })?;

    let (map, outcome) = setup.ready().await?;
    println!("Placement for '{}': {:?}", place, outcome);

    map.with(|map| {
        let viewport = map.viewport();
        println!(
            "Final view: center {:.4}, {:.4} zoom {}",
            viewport.center.lat, viewport.center.lng, viewport.zoom
        );
        for marker in map.markers() {
            let tile = TileCoord::from_lat_lng(&marker.position(), viewport.zoom as u8);
            println!(
                "Marker at {:.5}, {:.5} ({})",
                marker.position().lat,
                marker.position().lng,
                marker.popup().map(|p| p.content.as_str()).unwrap_or("no popup")
            );
            if let Some(tiles) = map.tile_layers().first() {
                println!("   tile: {}", tiles.tile_url(tile));
            }
        }
        for event in map.process_events() {
            println!("   event: {:?}", event);
        }
    })?;

    Ok(())
}
