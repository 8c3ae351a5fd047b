//! End-to-end tests for the offline jobs
//! Trains on a small CSV export, writes weather averages, then serves both
//! artifacts through the router

use std::io::Write;
use std::path::Path;

use agriverse_backend::config::{Config, TrainingConfig};
use agriverse_backend::training::{generate_weather_averages, trainer, TrainingError};
use agriverse_backend::{create_app, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

fn write_source(path: &Path) {
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(
        file,
        "State,Season,Crop,Year,Avg_Temp_C,Rainfall_mm,Humidity_%,Productivity (Kg/Ha),Pricing (Min - Max Rs/Qtl)"
    )
    .unwrap();
    for i in 0..12 {
        let year = 2020 + i % 4;
        writeln!(file, "Punjab,Kharif,Rice,{},31.0,640,71,{},\"1,900 - 2,100\"", year, 4000 + i).unwrap();
        writeln!(file, "Punjab,Rabi,Wheat,{},18.0,110,56,{},2200-2400", year, 4800 + i).unwrap();
        writeln!(file, "Punjab,Rabi,Mustard,{},18.0,110,56,{},5000-5400", year, 1500 + i).unwrap();
    }
}

fn artifact_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.artifacts.dir = dir.to_path_buf();
    config.training = TrainingConfig {
        n_trees: 10,
        ..Default::default()
    };
    config
}

async fn post(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn trained_artifacts_serve_predictions_and_recommendations() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("crops.csv");
    write_source(&source);
    let config = artifact_config(dir.path());

    let summary = trainer::run(
        &source,
        &config.artifacts.yield_model_path(),
        &config.artifacts.revenue_model_path(),
        &config.training,
    )
    .unwrap();
    assert_eq!(summary.rows_cleaned, 36);
    assert!(summary.test_rows > 0);

    let averages = generate_weather_averages(&source, &config.artifacts.avg_weather_path()).unwrap();
    assert_eq!(averages.rows, 2);

    let state = AppState::load(config).unwrap();
    assert!(state.revenue_model.is_available());
    assert!(state.weather.is_available());
    let app = create_app(state);

    let (status, body) = post(
        app.clone(),
        "/predict",
        json!({"state": "Punjab", "season": "Kharif", "crop": "Rice"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let predicted = body["predicted_yield_kg_per_ha"].as_f64().unwrap();
    assert!(predicted > 3900.0 && predicted < 4100.0, "yield {}", predicted);
    assert!(body["predicted_revenue_rs_per_ha"].as_f64().unwrap() > 70_000.0);

    let (status, body) = post(
        app,
        "/recommend",
        json!({
            "state": "Punjab",
            "current_season": "Kharif",
            "current_crop": "Rice",
            "candidates": ["Mustard", "Wheat"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["next_season"], "Rabi");
    assert_eq!(body["recommended_crop"], "Wheat");
}

#[test]
fn server_refuses_to_start_without_yield_model() {
    let dir = tempfile::tempdir().unwrap();
    assert!(AppState::load(artifact_config(dir.path())).is_err());
}

#[test]
fn revenue_model_is_optional() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("crops.csv");
    write_source(&source);
    let config = artifact_config(dir.path());

    trainer::run(
        &source,
        &config.artifacts.yield_model_path(),
        &config.artifacts.revenue_model_path(),
        &config.training,
    )
    .unwrap();
    std::fs::remove_file(config.artifacts.revenue_model_path()).unwrap();

    let state = AppState::load(config).unwrap();
    assert!(!state.revenue_model.is_available());
    assert!(!state.weather.is_available());
}

#[test]
fn unreadable_source_aborts_training() {
    let dir = tempfile::tempdir().unwrap();
    let config = artifact_config(dir.path());
    let result = trainer::run(
        &dir.path().join("missing.csv"),
        &config.artifacts.yield_model_path(),
        &config.artifacts.revenue_model_path(),
        &config.training,
    );
    assert!(matches!(result, Err(TrainingError::SourceNotFound(_))));
    assert!(!config.artifacts.yield_model_path().exists());
}
