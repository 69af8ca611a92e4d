use aimlsse_api::{
    ApiConfig, FeatureCollection, Geometry, Position, SatelliteDataAccess, SatelliteDataClient,
};
use chrono::{TimeZone, Utc};
use httpmock::prelude::*;

fn airport_locations() -> FeatureCollection {
    FeatureCollection::from_positions(&[
        Position::new(8.57, 50.03).unwrap(),
        Position::new(9.22, 48.69).unwrap(),
    ])
}

#[tokio::test]
async fn test_query_containing_geometry_end_to_end() {
    let server = MockServer::start();

    let tiles = serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[8.0, 49.0], [10.0, 49.0], [10.0, 51.0], [8.0, 49.0]]]
                },
                "properties": {"tile": "32UMA"}
            },
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[8.0, 47.0], [10.0, 47.0], [10.0, 49.0], [8.0, 47.0]]]
                },
                "properties": {"tile": "32UNV"}
            }
        ]
    });

    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/queryContainingGeometry")
            .json_body(serde_json::to_value(airport_locations()).unwrap());
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(tiles);
    });

    let toml_content = format!(
        r#"
[ground]
host = "127.0.0.1"
port = 8000

[satellite]
host = "127.0.0.1"
port = {}
timeout_seconds = 10
"#,
        server.port()
    );
    let config = ApiConfig::from_toml_str(&toml_content).unwrap();
    let client = config.satellite_client().unwrap();

    let geometry = client
        .query_containing_geometry(&airport_locations())
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(geometry.len(), 2);
    for feature in &geometry.features {
        assert!(matches!(feature.geometry, Geometry::Polygon { .. }));
    }
}

#[tokio::test]
async fn test_query_measurements_end_to_end() {
    let server = MockServer::start();

    let measurements = serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [8.57, 50.03]},
            "properties": {"band_4": 0.21, "band_8": 0.47}
        }]
    });

    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/queryMeasurements")
            .query_param("datetime_from", "2023-05-01T06:00:00Z")
            .query_param("datetime_to", "2023-05-01T18:00:00Z")
            .json_body(serde_json::to_value(airport_locations()).unwrap());
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(measurements);
    });

    let client = SatelliteDataClient::from_base_url(&server.base_url()).unwrap();
    let from = Utc.with_ymd_and_hms(2023, 5, 1, 6, 0, 0).unwrap();
    let to = Utc.with_ymd_and_hms(2023, 5, 1, 18, 0, 0).unwrap();

    let result = client
        .query_measurements(from, to, &airport_locations())
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(result.len(), 1);
    assert_eq!(
        result.features[0].properties.get("band_4").unwrap(),
        &serde_json::json!(0.21)
    );
}

#[tokio::test]
async fn test_service_error_carries_status_and_body() {
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/queryContainingGeometry");
        then.status(404).body("no tiles for region");
    });

    let client = SatelliteDataClient::from_base_url(&server.base_url()).unwrap();
    let result = client.query_containing_geometry(&airport_locations()).await;

    api_mock.assert();
    match result {
        Err(aimlsse_api::ApiError::Service { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "no tiles for region");
        }
        other => panic!("Expected service error, got {:?}", other),
    }
}
