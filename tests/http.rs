//! Router-level tests: the whole stack from HTTP request to store and back,
//! using tower's `oneshot` against the assembled app.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use linkfolio::{app, config::AppConfig, AppState};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::ServiceExt;

async fn setup() -> (Router, NamedTempFile) {
    let temp_db = NamedTempFile::new().expect("temp db file");
    let options = format!("sqlite:{}", temp_db.path().display())
        .parse::<SqliteConnectOptions>()
        .unwrap()
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("open pool");

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    let config = AppConfig {
        database_url: String::new(),
        host: "127.0.0.1".into(),
        port: 0,
        retention_days: 90,
    };

    (app(Arc::new(AppState::new(pool, config))), temp_db)
}

async fn response_json(body: Body) -> Value {
    let bytes = body.collect().await.expect("read body").to_bytes();
    serde_json::from_slice(&bytes).expect("parse json")
}

async fn body_string(body: Body) -> String {
    let bytes = body.collect().await.expect("read body").to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn sample_config() -> Value {
    json!({
        "artist_id": 7,
        "display": { "title": "Night Owl Radio", "bio": "New single out now" },
        "link_sections": [
            { "title": "Music", "links": [
                { "url": "https://open.spotify.com/nightowl", "text": "Spotify" },
                { "url": "https://music.apple.com/nightowl", "text": "Apple Music" }
            ]}
        ]
    })
}

#[tokio::test]
async fn health_check_is_open() {
    let (app, _guard) = setup().await;
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_page_is_404() {
    let (app, _guard) = setup().await;
    let response = app.oneshot(get("/p/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn save_then_render_round_trip() {
    let (app, _guard) = setup().await;

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/p/1/config", &sample_config()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response.into_body()).await["ok"], true);

    let response = app.clone().oneshot(get("/p/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response.into_body()).await;
    assert!(html.contains("Night Owl Radio"));
    assert!(html.contains("data-url=\"https://open.spotify.com/nightowl\""));

    let response = app.clone().oneshot(get("/p/1/config")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let config = response_json(response.into_body()).await;
    assert_eq!(config["artist_id"], 7);
    assert_eq!(config["display"]["title"], "Night Owl Radio");
}

#[tokio::test]
async fn first_config_visit_creates_the_page() {
    let (app, _guard) = setup().await;

    let response = app
        .clone()
        .oneshot(get("/p/9/config?artist_id=5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = response_json(response.into_body()).await;
    assert_eq!(created["id"], 9);
    assert_eq!(created["artist_id"], 5);

    // The page now renders (with defaults) instead of 404ing.
    let response = app.oneshot(get("/p/9")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn preview_round_trip_echoes_the_edit_sequence() {
    let (app, _guard) = setup().await;
    app.clone()
        .oneshot(json_request("PUT", "/p/1/config", &sample_config()))
        .await
        .unwrap();

    let payload = json!({
        "overrides": { "display": { "title": "Draft Title" } },
        "edit_sequence": 42
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/p/1/preview", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response.into_body()).await;
    assert_eq!(body["edit_sequence"], 42);
    assert_eq!(body["model"]["title"], "Draft Title");
    assert!(body["html"].as_str().unwrap().contains("Draft Title"));
    assert!(body["html"].as_str().unwrap().contains("preview-frame"));

    // Unknown override keys are dropped, not merged and not an error.
    let payload = json!({
        "overrides": { "display": { "title": "X" }, "bogus": { "y": 1 } },
        "edit_sequence": 43
    });
    let response = app
        .oneshot(json_request("POST", "/p/1/preview", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The preview never persisted anything: config still holds the saved title.
}

#[tokio::test]
async fn preview_does_not_persist_overrides() {
    let (app, _guard) = setup().await;
    app.clone()
        .oneshot(json_request("PUT", "/p/1/config", &sample_config()))
        .await
        .unwrap();

    let payload = json!({
        "overrides": { "display": { "title": "Draft Title" } },
        "edit_sequence": 1
    });
    app.clone()
        .oneshot(json_request("POST", "/p/1/preview", &payload))
        .await
        .unwrap();

    let response = app.oneshot(get("/p/1/config")).await.unwrap();
    let config = response_json(response.into_body()).await;
    assert_eq!(config["display"]["title"], "Night Owl Radio");
}

#[tokio::test]
async fn click_through_redirects_and_counts() {
    let (app, _guard) = setup().await;
    app.clone()
        .oneshot(json_request("PUT", "/p/1/config", &sample_config()))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/p/1/go?to=https%3A%2F%2Fopen.spotify.com%2Fnightowl"))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://open.spotify.com/nightowl"
    );

    // The counter write happens in a background task.
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    let response = app
        .oneshot(get("/p/1/analytics/top?days=1"))
        .await
        .unwrap();
    let body = response_json(response.into_body()).await;
    assert_eq!(body["links"][0]["url"], "https://open.spotify.com/nightowl");
    assert_eq!(body["links"][0]["clicks"], 1);
}

#[tokio::test]
async fn click_through_rejects_urls_the_page_does_not_carry() {
    let (app, _guard) = setup().await;
    app.clone()
        .oneshot(json_request("PUT", "/p/1/config", &sample_config()))
        .await
        .unwrap();

    // Absolute and well-formed, but not one of the page's links: no
    // redirect, and nothing written into the counters.
    let response = app
        .clone()
        .oneshot(get("/p/1/go?to=https%3A%2F%2Fevil.example%2Fphish"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get("/p/1/analytics/top?days=1"))
        .await
        .unwrap();
    let body = response_json(response.into_body()).await;
    assert_eq!(body["links"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn click_through_accepts_trailing_slash_variants_of_page_links() {
    let (app, _guard) = setup().await;
    app.clone()
        .oneshot(json_request("PUT", "/p/1/config", &sample_config()))
        .await
        .unwrap();

    let response = app
        .oneshot(get("/p/1/go?to=https%3A%2F%2Fopen.spotify.com%2Fnightowl%2F"))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
}

#[tokio::test]
async fn click_through_rejects_non_http_targets() {
    let (app, _guard) = setup().await;
    let response = app
        .oneshot(get("/p/1/go?to=javascript%3Aalert(1)"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn page_views_show_up_in_the_range_series() {
    let (app, _guard) = setup().await;
    app.clone()
        .oneshot(json_request("PUT", "/p/1/config", &sample_config()))
        .await
        .unwrap();

    app.clone().oneshot(get("/p/1")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    let response = app.oneshot(get("/p/1/analytics?days=3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["series"].as_array().unwrap().len(), 3);
    // Today is the last entry and carries the view.
    assert_eq!(body["series"][2]["views"], 1);
}

#[tokio::test]
async fn redirect_enabled_page_sends_visitors_away() {
    let (app, _guard) = setup().await;
    let mut config = sample_config();
    config["advanced"] = json!({
        "redirect_enabled": true,
        "redirect_url": "https://shop.example"
    });
    app.clone()
        .oneshot(json_request("PUT", "/p/1/config", &config))
        .await
        .unwrap();

    let response = app.oneshot(get("/p/1")).await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "https://shop.example");
}
