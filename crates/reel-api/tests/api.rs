//! Router tests against in-memory collaborators.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use reel_api::{create_router, ApiConfig, AppState};
use reel_models::Voice;
use reel_pipeline::{
    AudioSynthesis, Collaborators, GeneratedImage, ImageSynthesis, JobOrchestrator,
    PipelineConfig, Script, ScriptSelector, StageError, StageResult, Stitcher, VideoComposer,
};

struct Scripts;

#[async_trait]
impl ScriptSelector for Scripts {
    async fn select_and_generate(
        &self,
        topics: &[String],
        _used_topics: &[String],
    ) -> StageResult<Script> {
        let topic = topics
            .first()
            .cloned()
            .ok_or_else(|| StageError::fatal("no topics"))?;
        Ok(Script {
            title: format!("all about {}", topic),
            topic,
            sentences: (0..4).map(|i| format!("Sentence {}.", i)).collect(),
        })
    }
}

struct Images;

#[async_trait]
impl ImageSynthesis for Images {
    async fn generate(&self, prompt: &str) -> StageResult<GeneratedImage> {
        let n = prompt.split_whitespace().nth(1).unwrap_or("x").trim_end_matches('.');
        Ok(GeneratedImage {
            path: PathBuf::from(format!("/fake/images/{}.jpg", n)),
            url: Some(format!("https://images.test/{}", n)),
        })
    }
}

struct Audio;

#[async_trait]
impl AudioSynthesis for Audio {
    async fn synthesize(&self, _text: &str, _voice: Voice) -> StageResult<PathBuf> {
        Ok(PathBuf::from("/fake/audio/narration.mp3"))
    }
}

struct Composer;

#[async_trait]
impl VideoComposer for Composer {
    async fn compose_with_fade(&self, image: &Path, _audio: &Path) -> StageResult<PathBuf> {
        Ok(image.with_extension("mp4"))
    }
}

#[derive(Default)]
struct Stitch {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl Stitcher for Stitch {
    async fn concatenate(&self, _clips: &[PathBuf]) -> StageResult<PathBuf> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StageError::fatal("concat demuxer failed"));
        }
        Ok(PathBuf::from(format!("/fake/out/combined_{}.mp4", n)))
    }
}

struct TestApp {
    router: Router,
    dir: TempDir,
}

impl TestApp {
    fn new(stitcher: Stitch) -> Self {
        let dir = TempDir::new().unwrap();
        let pipeline = PipelineConfig {
            work_dir: dir.path().join("work"),
            output_dir: dir.path().join("videos"),
            stagger: Duration::ZERO,
            preload_enabled: false,
            ..PipelineConfig::default()
        };
        let collaborators = Collaborators {
            scripts: Arc::new(Scripts),
            images: Arc::new(Images),
            audio: Arc::new(Audio),
            composer: Arc::new(Composer),
            stitcher: Arc::new(stitcher),
        };
        let config = ApiConfig {
            watch_log_path: dir.path().join("watch.csv"),
            ..ApiConfig::default()
        };
        let state = AppState::new(config, JobOrchestrator::new(pipeline, collaborators));
        Self {
            router: create_router(state, None),
            dir,
        }
    }

    fn output_dir(&self) -> PathBuf {
        self.dir.path().join("videos")
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn post_json(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, bytes) = self.send(request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new(Stitch::default());

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_metrics_route_absent_when_disabled() {
    let app = TestApp::new(Stitch::default());

    let (status, _) = app.get("/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_returns_script_images_and_video() {
    let app = TestApp::new(Stitch::default());

    let (status, body) = app
        .post_json("/generate", r#"{"topics": ["volcanoes"]}"#)
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        body["script"],
        json!(["Sentence 0.", "Sentence 1.", "Sentence 2.", "Sentence 3."])
    );
    assert_eq!(
        body["image_urls"],
        json!([
            "https://images.test/0",
            "https://images.test/1",
            "https://images.test/2",
            "https://images.test/3"
        ])
    );
    assert_eq!(body["video_url"], "/videos/combined_0.mp4");
}

#[tokio::test]
async fn test_generate_rejects_missing_topics() {
    let app = TestApp::new(Stitch::default());

    for body in [r#"{}"#, r#"{"topics": "volcanoes"}"#, r#"{"topics": []}"#, "nope"] {
        let (status, response) = app.post_json("/generate", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert_eq!(response["detail"], "Invalid or missing 'topics' list");
    }
}

#[tokio::test]
async fn test_generate_rejects_blank_topics() {
    let app = TestApp::new(Stitch::default());

    let (status, response) = app
        .post_json("/generate", r#"{"topics": ["", "   "]}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["detail"], "No valid topics provided");
}

#[tokio::test]
async fn test_generate_failure_is_server_error() {
    let app = TestApp::new(Stitch {
        fail: true,
        ..Stitch::default()
    });

    let (status, response) = app
        .post_json("/generate", r#"{"topics": ["volcanoes"]}"#)
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response["detail"].is_string());
    assert_eq!(response["code"], "fatal");
}

#[tokio::test]
async fn test_reset_topics() {
    let app = TestApp::new(Stitch::default());

    let (status, response) = app.post_json("/reset_topics", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Used topics reset successfully");

    // The next request clears the pending reset and succeeds
    let (status, _) = app
        .post_json("/generate", r#"{"topics": ["volcanoes"]}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_watch_time_logged_on_next_generate() {
    let app = TestApp::new(Stitch::default());
    let log = app.dir.path().join("watch.csv");

    app.post_json("/generate", r#"{"topics": ["volcanoes"]}"#)
        .await;
    assert!(!log.exists());

    app.post_json("/generate", r#"{"topics": ["oceans"]}"#).await;

    let contents = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("\"volcanoes\","));
}

#[tokio::test]
async fn test_serve_video() {
    let app = TestApp::new(Stitch::default());
    std::fs::create_dir_all(app.output_dir()).unwrap();
    std::fs::write(app.output_dir().join("combined_ab.mp4"), b"mp4 bytes").unwrap();

    let request = Request::builder()
        .uri("/videos/combined_ab.mp4")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "video/mp4");
    assert!(response.headers().contains_key("x-request-id"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"mp4 bytes");
}

#[tokio::test]
async fn test_serve_video_missing_and_invalid() {
    let app = TestApp::new(Stitch::default());

    let (status, _) = app.get("/videos/combined_missing.mp4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/videos/..combined.mp4").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
