//! Integration tests for the generation stream client.
//!
//! Each test spins up a scripted stub backend (axum on an ephemeral
//! port) that streams a fixed sequence of chunks from
//! `POST /api/generate` and serves bytes from
//! `GET /api/download/{filename}`, then drives a real
//! [`GenerationSession`] against it.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use futures::StreamExt;

use aetherforge_client::{GenerateError, GenerationEvent, GenerationSession};
use aetherforge_core::generation::{GenerationRequest, SubjectType};

/// Fake GLB payload served by the stub download endpoint.
const ASSET_BYTES: &[u8] = b"glTF\x02\x00\x00\x00fake-binary-model";

/// Scripted behaviour for one stub backend instance.
struct StubBackend {
    /// Chunks streamed from `/api/generate`, in order.
    chunks: Vec<Vec<u8>>,
    /// Status code for `/api/generate` (non-2xx skips streaming).
    generate_status: StatusCode,
    /// Number of download requests served.
    download_hits: AtomicUsize,
    /// Filenames requested from the download endpoint.
    downloaded: Mutex<Vec<String>>,
}

impl StubBackend {
    fn streaming(chunks: Vec<Vec<u8>>) -> Arc<Self> {
        Arc::new(Self {
            chunks,
            generate_status: StatusCode::OK,
            download_hits: AtomicUsize::new(0),
            downloaded: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: StatusCode) -> Arc<Self> {
        Arc::new(Self {
            chunks: Vec::new(),
            generate_status: status,
            download_hits: AtomicUsize::new(0),
            downloaded: Mutex::new(Vec::new()),
        })
    }
}

async fn generate_handler(State(stub): State<Arc<StubBackend>>) -> Response {
    if !stub.generate_status.is_success() {
        return (stub.generate_status, "backend exploded").into_response();
    }

    // A short pause between chunks forces each scripted chunk into its
    // own HTTP chunk, exercising the client's re-buffering.
    let stream = futures::stream::iter(stub.chunks.clone()).then(|chunk| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok::<_, Infallible>(chunk)
    });
    Body::from_stream(stream).into_response()
}

async fn download_handler(
    State(stub): State<Arc<StubBackend>>,
    Path(filename): Path<String>,
) -> Response {
    stub.download_hits.fetch_add(1, Ordering::SeqCst);
    stub.downloaded.lock().unwrap().push(filename);
    ASSET_BYTES.to_vec().into_response()
}

/// Serve the stub on an ephemeral port and return its address.
async fn spawn_stub(stub: Arc<StubBackend>) -> SocketAddr {
    let app = Router::new()
        .route("/api/generate", post(generate_handler))
        .route("/api/download/{filename}", get(download_handler))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn session_for(stub: Arc<StubBackend>) -> GenerationSession {
    let addr = spawn_stub(stub).await;
    GenerationSession::new(format!("http://{addr}"))
}

/// Drain all events currently buffered on a broadcast receiver.
fn drain_events(rx: &mut tokio::sync::broadcast::Receiver<GenerationEvent>) -> Vec<GenerationEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn line(json: &str) -> Vec<u8> {
    format!("{json}\n").into_bytes()
}

// ---------------------------------------------------------------------------
// Test: a complete stream yields exactly one download and one asset
// ---------------------------------------------------------------------------

#[tokio::test]
async fn complete_stream_yields_one_asset_and_one_download() {
    let stub = StubBackend::streaming(vec![
        line(r#"{"stage":"multiview","progress":10,"message":"Generating views..."}"#),
        line(r#"{"stage":"reconstruction","progress":70,"message":"Reconstructing..."}"#),
        line(r#"{"stage":"complete","progress":100,"file":"outputs/output_asset.glb"}"#),
    ]);
    let session = session_for(Arc::clone(&stub)).await;
    let mut events = session.subscribe();

    let request = GenerationRequest::new("a crate", SubjectType::Asset);
    let asset = session.generate(&request).await.unwrap().unwrap();

    assert_eq!(asset.data, ASSET_BYTES);
    assert_eq!(asset.filename, "output_asset.glb");
    assert_eq!(asset.subject_type, SubjectType::Asset);
    assert_eq!(asset.prompt, "a crate");

    // Exactly one download, addressed by basename.
    assert_eq!(stub.download_hits.load(Ordering::SeqCst), 1);
    assert_eq!(
        *stub.downloaded.lock().unwrap(),
        vec!["output_asset.glb".to_string()]
    );

    // Status reset to idle on the success path.
    let status = session.status().borrow().clone();
    assert!(!status.generating);
    assert_eq!(status.percent, 0);

    let events = drain_events(&mut events);
    assert_matches!(
        events.last(),
        Some(GenerationEvent::Completed { filename, size_bytes })
            if filename == "output_asset.glb" && *size_bytes == ASSET_BYTES.len()
    );
}

// ---------------------------------------------------------------------------
// Test: an error event fails the run, publishes no asset, resets status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn error_event_fails_run_and_resets_status() {
    let stub = StubBackend::streaming(vec![
        line(r#"{"stage":"multiview","progress":10,"message":"Generating views..."}"#),
        line(r#"{"stage":"error","message":"boom"}"#),
    ]);
    let session = session_for(Arc::clone(&stub)).await;
    let mut events = session.subscribe();

    let request = GenerationRequest::new("a crate", SubjectType::Asset);
    let result = session.generate(&request).await;

    assert_matches!(result, Err(GenerateError::Backend(message)) if message == "boom");
    assert_eq!(stub.download_hits.load(Ordering::SeqCst), 0);
    assert!(!session.status().borrow().generating);

    let events = drain_events(&mut events);
    assert_matches!(events.last(), Some(GenerationEvent::Failed { .. }));
}

// ---------------------------------------------------------------------------
// Test: a line split across two network chunks still parses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn line_split_across_chunks_still_parses() {
    let full = r#"{"stage":"complete","progress":100,"file":"outputs/model.glb"}"#;
    let (left, right) = full.as_bytes().split_at(25);
    let stub = StubBackend::streaming(vec![
        line(r#"{"stage":"cleanup","progress":85,"message":"Cleaning..."}"#),
        left.to_vec(),
        [right, b"\n"].concat(),
    ]);
    let session = session_for(Arc::clone(&stub)).await;

    let request = GenerationRequest::new("a robot", SubjectType::Character);
    let asset = session.generate(&request).await.unwrap().unwrap();

    assert_eq!(asset.filename, "model.glb");
    assert_eq!(stub.download_hits.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// Test: bytes after the complete event are ignored
// ---------------------------------------------------------------------------

#[tokio::test]
async fn extra_bytes_after_complete_are_ignored() {
    let stub = StubBackend::streaming(vec![
        line(r#"{"stage":"complete","progress":100,"file":"outputs/model.glb"}"#),
        line(r#"{"stage":"multiview","progress":5,"message":"stale"}"#),
        b"trailing garbage that never parses".to_vec(),
    ]);
    let session = session_for(Arc::clone(&stub)).await;

    let request = GenerationRequest::new("a tree", SubjectType::Environment);
    let asset = session.generate(&request).await.unwrap().unwrap();

    assert_eq!(asset.filename, "model.glb");
    assert_eq!(stub.download_hits.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// Test: malformed lines are skipped without aborting the stream
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_lines_are_skipped() {
    let stub = StubBackend::streaming(vec![
        line(r#"{"stage":"multiview","progress":10,"message":"ok"}"#),
        line(r#"{{{{ not json"#),
        line(r#"{"stage":"complete","progress":100,"file":"outputs/model.glb"}"#),
    ]);
    let session = session_for(Arc::clone(&stub)).await;

    let request = GenerationRequest::new("a rock", SubjectType::Asset);
    let asset = session.generate(&request).await.unwrap().unwrap();

    assert_eq!(asset.filename, "model.glb");
}

// ---------------------------------------------------------------------------
// Test: progress events are reflected in order, latest value wins
// ---------------------------------------------------------------------------

#[tokio::test]
async fn progress_events_reflect_latest_value() {
    let stub = StubBackend::streaming(vec![
        line(r#"{"stage":"multiview","progress":10,"message":"a"}"#),
        line(r#"{"stage":"reconstruction","progress":40,"message":"b"}"#),
        line(r#"{"stage":"textures","progress":95,"message":"c"}"#),
    ]);
    let session = session_for(Arc::clone(&stub)).await;
    let mut events = session.subscribe();

    let request = GenerationRequest::new("a drone", SubjectType::Asset);
    let result = session.generate(&request).await.unwrap();

    // Stream ended without a terminal event: no asset, no error.
    assert!(result.is_none());

    let percents: Vec<u8> = drain_events(&mut events)
        .into_iter()
        .filter_map(|event| match event {
            GenerationEvent::Progress { percent, .. } => Some(percent),
            _ => None,
        })
        .collect();
    assert_eq!(percents, vec![10, 40, 95]);
}

// ---------------------------------------------------------------------------
// Test: an unterminated final line is still processed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unterminated_final_line_is_processed() {
    let stub = StubBackend::streaming(vec![
        // No trailing newline on the terminal event.
        r#"{"stage":"complete","progress":100,"file":"model.glb"}"#
            .as_bytes()
            .to_vec(),
    ]);
    let session = session_for(Arc::clone(&stub)).await;

    let request = GenerationRequest::new("a lamp", SubjectType::Asset);
    let asset = session.generate(&request).await.unwrap().unwrap();
    assert_eq!(asset.filename, "model.glb");
}

// ---------------------------------------------------------------------------
// Test: non-2xx submit surfaces as an API error and resets status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_failure_surfaces_as_api_error() {
    let stub = StubBackend::failing(StatusCode::INTERNAL_SERVER_ERROR);
    let session = session_for(stub).await;

    let request = GenerationRequest::new("a chair", SubjectType::Asset);
    let result = session.generate(&request).await;

    assert_matches!(
        result,
        Err(GenerateError::Api(
            aetherforge_client::ForgeApiError::Api { status: 500, .. }
        ))
    );
    assert!(!session.status().borrow().generating);
}

// ---------------------------------------------------------------------------
// Test: unreachable backend surfaces as a transport error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_backend_surfaces_as_transport_error() {
    // Nothing listens on port 1.
    let session = GenerationSession::new("http://127.0.0.1:1".to_string());

    let request = GenerationRequest::new("a chair", SubjectType::Asset);
    let result = session.generate(&request).await;

    assert_matches!(
        result,
        Err(GenerateError::Api(
            aetherforge_client::ForgeApiError::Request(_)
        ))
    );
    assert!(!session.status().borrow().generating);
}
