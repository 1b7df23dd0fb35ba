#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use feira_server::{Config, ServerState, api};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    _dir: TempDir,
    pub app: Router,
    pub state: ServerState,
    pub data_dir: PathBuf,
    pub uploads_dir: PathBuf,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_files(None, None)
    }

    /// Start with pre-existing `home.json` / `galerias.json` contents
    pub fn with_files(home: Option<Value>, galleries: Option<Value>) -> Self {
        Self::build(home, galleries, |_| {})
    }

    pub fn with_config(configure: impl FnOnce(&mut Config)) -> Self {
        Self::build(None, None, configure)
    }

    fn build(home: Option<Value>, galleries: Option<Value>, configure: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let uploads_dir = dir.path().join("uploads");
        std::fs::create_dir_all(&data_dir).unwrap();
        if let Some(home) = home {
            std::fs::write(data_dir.join("home.json"), home.to_string()).unwrap();
        }
        if let Some(galleries) = galleries {
            std::fs::write(data_dir.join("galerias.json"), galleries.to_string()).unwrap();
        }

        let mut config = Config::with_dirs(&data_dir, &uploads_dir);
        configure(&mut config);
        let state = ServerState::initialize(&config).unwrap();
        let app = api::build_app(&state);
        Self {
            _dir: dir,
            app,
            state,
            data_dir,
            uploads_dir,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    pub async fn multipart(&self, uri: &str, form: MultipartBody) -> (StatusCode, Value) {
        let (content_type, body) = form.build();
        let req = Request::post(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(req).await
    }

    /// On-disk file behind a `/uploads/<name>` path
    pub fn upload_file(&self, public_path: &str) -> PathBuf {
        self.uploads_dir
            .join(public_path.strip_prefix("/uploads/").unwrap())
    }

    pub fn upload_count(&self) -> usize {
        std::fs::read_dir(&self.uploads_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub fn stored_json(&self, file: &str) -> Value {
        let raw = std::fs::read_to_string(self.data_dir.join(file)).unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}

const BOUNDARY: &str = "feira-test-boundary";

/// Hand-built `multipart/form-data` body
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn build(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), self.body)
    }
}
