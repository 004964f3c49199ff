//! Render a fire-station coverage map of Winnipeg to SVG
//!
//! ```text
//! cargo run --example render_map -- [stations.json] [boundary.geojson] > coverage.svg
//! ```
//!
//! Without arguments a built-in city outline and station list are used.
//! Set `RUST_LOG=debug` to see per-stage timings on stderr.

use voronoi_coverage::*;

const WINNIPEG: &str = r#"{
  "type": "FeatureCollection",
  "features": [{
    "type": "Feature",
    "properties": { "name": "Winnipeg" },
    "geometry": {
      "type": "MultiPolygon",
      "coordinates": [[[
        [-97.325875, 49.766204],
        [-97.325875, 49.99275],
        [-96.953987, 49.99275],
        [-96.953987, 49.766204],
        [-97.325875, 49.766204]
      ]]]
    }
  }]
}"#;

const STATIONS: &str = r#"[
  { "Longitude": -97.1384, "Latitude": 49.8951, "Station_Location": "Station 1 - Downtown" },
  { "Longitude": -97.2035, "Latitude": 49.8805, "Station_Location": "Station 2 - Wolseley" },
  { "Longitude": -97.0902, "Latitude": 49.9112, "Station_Location": "Station 3 - Elmwood" },
  { "Longitude": -97.1521, "Latitude": 49.8423 },
  { "Longitude": -97.2478, "Latitude": 49.8697, "Station_Location": "Station 5 - St. James" },
  { "Longitude": -97.1766, "Latitude": 49.9475, "Station_Location": "Station 6 - Garden City" },
  { "Longitude": -97.0511, "Latitude": 49.8604, "Station_Location": "Station 7 - Transcona" },
  { "Longitude": -97.1043, "Latitude": 49.8011, "Station_Location": "Station 8 - St. Vital" },
  { "Longitude": -97.2902, "Latitude": 49.8233, "Station_Location": "Station 9 - Charleswood" },
  { "Longitude": -97.0205, "Latitude": 49.9378 },
  { "Longitude": -97.1384, "Latitude": 91.0, "Station_Location": "Bad record" }
]"#;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let stations = match args.next() {
        Some(path) => io::load_points(path)?,
        None => io::parse_points(STATIONS)?,
    };
    let boundary = match args.next() {
        Some(path) => io::load_boundary(path)?,
        None => Boundary::from_geojson_str(WINNIPEG)?,
    };

    let config = MapConfigBuilder::new()
        .clip_mode(ClipMode::Boundary)
        .station_kind("Fire Station")
        .build()?;

    let map = CoverageMap::compute(config, &stations, &boundary)?;

    eprintln!(
        "{}: {} stations, {} cells",
        map.boundary_name().unwrap_or("region"),
        map.station_count(),
        map.cells().iter().filter(|c| !c.is_empty()).count()
    );
    for diagnostic in map.diagnostics() {
        eprintln!("  note: {:?}", diagnostic);
    }

    #[cfg(feature = "spatial-index")]
    {
        let city_hall = GeoPoint::new(-97.1385, 49.8994);
        if let Some(seed) = map.find_station_geo(&city_hall) {
            let station = &map.stations()[seed];
            eprintln!("  city hall is served by {}", station.tooltip("Fire Station"));
        }
    }

    print!("{}", map.to_svg(&DefaultStyle));
    Ok(())
}
