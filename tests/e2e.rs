//! End-to-end tests against a stub motionEye backend
//!
//! Flow under test:
//! 1. Gateway receives `GET /snap?camera=lobby`
//! 2. Real `MotionEyeFetcher` downloads from the stub's picture endpoint
//! 3. Snapshot lands under `<output_root>/camera2/<timestamp>.jpg`
//! 4. Listing and image routes return what was stored

use axum::{
    Router,
    body::Body,
    extract::{Path, Query},
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::get,
};
use chrono::{Local, TimeZone};
use http_body_util::BodyExt;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use camgate::api::{router, state::AppState};
use camgate::cameras::CameraEntry;
use camgate::config::Config;
use camgate::snapshot::{FixedClock, MotionEyeFetcher};
use camgate::storage::{self, ListError};

const JPEG: &[u8] = b"\xFF\xD8\xFF\xE0stub-jpeg-payload\xFF\xD9";
const USERNAME: &str = "admin";
const SIGNATURE: &str = "s3cret";

/// Serves `JPEG` for camera 2; 403 on bad credentials, 404 for other cameras
async fn picture(
    Path(camera_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let authorized = params.get("_username").map(String::as_str) == Some(USERNAME)
        && params.get("_signature").map(String::as_str) == Some(SIGNATURE);

    if !authorized {
        return (StatusCode::FORBIDDEN, Vec::new());
    }
    if camera_id != "2" {
        return (StatusCode::NOT_FOUND, Vec::new());
    }
    (StatusCode::OK, JPEG.to_vec())
}

async fn start_stub_backend() -> SocketAddr {
    let app = Router::new().route("/picture/{camera_id}/current/", get(picture));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

struct Gateway {
    app: Router,
    state: AppState,
    temp_dir: TempDir,
}

async fn start_gateway(signature: &str, cameras: Vec<CameraEntry>) -> Gateway {
    let backend_addr = start_stub_backend().await;
    let temp_dir = TempDir::new().unwrap();

    let mut config = Config {
        cameras,
        ..Config::default()
    };
    config.backend.server_url = format!("http://{}/", backend_addr);
    config.backend.username = USERNAME.to_string();
    config.backend.signature = Some(signature.to_string());
    config.storage.output_root = temp_dir.path().join("out");

    let clock = Arc::new(FixedClock(Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()));
    let fetcher =
        MotionEyeFetcher::new(&config.backend, config.storage.output_root.clone(), clock).unwrap();
    let registry = config.camera_registry().unwrap();

    let state = AppState::new(config, registry, Arc::new(fetcher));
    Gateway {
        app: router(state.clone()),
        state,
        temp_dir,
    }
}

async fn fetch(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, body)
}

fn lobby() -> Vec<CameraEntry> {
    vec![CameraEntry::new("lobby", "2")]
}

#[tokio::test]
async fn test_snapshot_then_list_then_download() {
    let gateway = start_gateway(SIGNATURE, lobby()).await;

    let (status, body) = fetch(&gateway.app, "/snap?camera=lobby").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"camera 2");

    // Exactly one file, named after the capture time, holding the stub bytes
    let camera_dir = gateway.temp_dir.path().join("out").join("camera2");
    let files: Vec<String> = std::fs::read_dir(&camera_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files, vec!["20240309_070501.jpg".to_string()]);
    assert_eq!(std::fs::read(camera_dir.join("20240309_070501.jpg")).unwrap(), JPEG);

    // Listing returns exactly that entry
    let resolved = gateway.state.resolver.resolve("lobby", None).unwrap();
    let entries = storage::list_directory(&resolved).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "20240309_070501.jpg");
    assert_eq!(entries[0].size_bytes, JPEG.len() as u64);
    assert!(!entries[0].is_directory);

    let (status, body) = fetch(&gateway.app, "/files/lobby").await;
    let html = String::from_utf8(body).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("20240309_070501.jpg"));
    assert!(html.contains(&format!("<td>{} B</td>", JPEG.len())));

    let (status, body) = fetch(&gateway.app, "/files/lobby?file=20240309_070501.jpg").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, JPEG);
}

#[tokio::test]
async fn test_same_second_capture_overwrites() {
    let gateway = start_gateway(SIGNATURE, lobby()).await;

    for _ in 0..3 {
        let (status, _) = fetch(&gateway.app, "/snap?camera=lobby").await;
        assert_eq!(status, StatusCode::OK);
    }

    let resolved = gateway.state.resolver.resolve("lobby", None).unwrap();
    let entries = storage::list_directory(&resolved).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(gateway.state.metrics.snapshot().snapshots_captured, 3);
}

#[tokio::test]
async fn test_rejected_credentials_store_nothing() {
    let gateway = start_gateway("wrong", lobby()).await;

    let (status, body) = fetch(&gateway.app, "/snap?camera=lobby").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, b"camera 2: snapshot failed");

    let resolved = gateway.state.resolver.resolve("lobby", None).unwrap();
    assert!(matches!(
        storage::list_directory(&resolved).await,
        Err(ListError::NotFound(_))
    ));

    let (status, body) = fetch(&gateway.app, "/files/lobby").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"Camera output directory doesnt exist");
}

#[tokio::test]
async fn test_backend_not_found_is_reported() {
    let gateway = start_gateway(
        SIGNATURE,
        vec![CameraEntry::new("lobby", "2"), CameraEntry::new("garage", "7")],
    )
    .await;

    let (status, body) = fetch(&gateway.app, "/snap?camera=garage").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, b"camera 7: snapshot failed");
    assert_eq!(gateway.state.metrics.snapshot().snapshots_failed, 1);
}
