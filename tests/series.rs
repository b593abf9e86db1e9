use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use std::io::Write;
use std::sync::Arc;
use symbol_map::config::{AppConfig, Discovery};
use symbol_map::error::SymbolError;
use symbol_map::server::{router, AppState};
use symbol_map::surface::MarkerLayer;
use symbol_map::symbols::radius;
use tempfile::NamedTempFile;
use tower::ServiceExt;

const CITIES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature",
         "geometry": {"type": "Point", "coordinates": [-122.33, 47.61]},
         "properties": {"name": "Seattle", "2010_pct": 0.35, "2011_pct": 0.41}},
        {"type": "Feature",
         "geometry": {"type": "Point", "coordinates": [-118.24, 34.05]},
         "properties": {"name": "Los Angeles", "2010_pct": 0.6, "2011_pct": 0.62}},
        {"type": "Feature",
         "geometry": {"type": "Point", "coordinates": [-73.94, 40.67]},
         "properties": {"name": "New York", "2010_pct": 0.5, "2011_pct": 0.3}}
    ]
}"#;

fn dataset() -> (NamedTempFile, AppConfig) {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CITIES.as_bytes()).unwrap();
    let config = AppConfig::for_dataset(file.path());
    (file, config)
}

#[test]
fn test_set_index_updates_every_marker_and_legend() {
    let (_file, config) = dataset();
    let mut controller = symbol_map::build(&config, MarkerLayer::new()).unwrap();
    assert_eq!(controller.series(), ["2010_pct", "2011_pct"]);
    assert_eq!(controller.legend().caption, "Percent homeless in 2010");

    controller.set_index(1).unwrap();

    let radii: Vec<Option<f64>> = controller.surface().all().iter().map(|m| m.radius).collect();
    assert_eq!(
        radii,
        vec![
            Some(radius(0.41).unwrap()),
            Some(radius(0.62).unwrap()),
            Some(radius(0.3).unwrap()),
        ]
    );
    assert_eq!(controller.legend().caption, "Percent homeless in 2011");
    assert_eq!(controller.legend().circle("max").unwrap().label, "0.62 percent");
    assert_eq!(controller.legend().circle("mean").unwrap().label, "0.46 percent");
    assert_eq!(controller.legend().circle("min").unwrap().label, "0.3 percent");
    assert!(controller.surface().all()[2].popup.html.contains("% Pop Homeless in 2011:</b> 0.3%"));
}

#[test]
fn test_reference_discovery_uses_second_feature() {
    let (_file, mut config) = dataset();
    config.input.discovery = Discovery::Reference;
    let controller = symbol_map::build(&config, MarkerLayer::new()).unwrap();
    assert_eq!(controller.len(), 2);
}

#[test]
fn test_missing_dataset_is_data_load_failure() {
    let config = AppConfig::for_dataset("/nonexistent/citypoints.geojson");
    let err = symbol_map::build(&config, MarkerLayer::new()).err().unwrap();
    assert!(matches!(err, SymbolError::DataLoad(_)));
}

async fn request(app: axum::Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_api_transitions() {
    let (_file, config) = dataset();
    let controller = symbol_map::build(&config, MarkerLayer::new()).unwrap();
    let app = router(Arc::new(AppState::new(controller)));

    let (status, frame) = request(app.clone(), "GET", "/api/frame").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(frame["index"], 0);
    assert_eq!(frame["markers"].as_array().unwrap().len(), 3);

    let (_, frame) = request(app.clone(), "POST", "/api/advance").await;
    assert_eq!(frame["year"], "2011");

    let (_, frame) = request(app.clone(), "POST", "/api/advance").await;
    assert_eq!(frame["index"], 0);

    let (_, frame) = request(app.clone(), "POST", "/api/retreat").await;
    assert_eq!(frame["index"], 1);

    let (status, body) = request(app.clone(), "POST", "/api/index/7").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("out of range"));

    let (_, frame) = request(app.clone(), "GET", "/api/frame").await;
    assert_eq!(frame["index"], 1);
}

#[tokio::test]
async fn test_api_query_nearest_city() {
    let (_file, config) = dataset();
    let controller = symbol_map::build(&config, MarkerLayer::new()).unwrap();
    let app = router(Arc::new(AppState::new(controller)));

    let (_, body) = request(app, "GET", "/api/query?lat=34.1&lon=-118.3").await;
    assert!(body["popup"].as_str().unwrap().contains("Los Angeles"));
}
