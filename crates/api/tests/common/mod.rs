#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use crm_api::config::ServerConfig;
use crm_api::router::build_app_router;
use crm_api::service::CustomerService;
use crm_api::state::AppState;
use crm_db::store::{CustomerStore, MemoryCustomerStore};
use crm_storage::LocalImageStorage;

/// Minimal valid PNG header; enough for format sniffing.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

/// Minimal JPEG header.
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0];

/// Build a test `ServerConfig` with safe defaults.
///
/// Allows any CORS origin and caps images at 1 KiB so oversize cases are
/// cheap to exercise.
pub fn test_config(upload_dir: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        upload_dir: upload_dir.path().to_path_buf(),
        public_base_url: "http://localhost:5000".to_string(),
        max_image_bytes: 1024,
    }
}

/// A router plus handles on its backing resources.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryCustomerStore>,
    pub upload_dir: TempDir,
}

impl TestApp {
    /// Fresh router for one request (`oneshot` consumes the service).
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Number of files currently in the upload directory.
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub fn stored_file_exists(&self, storage_id: &str) -> bool {
        self.upload_dir.path().join(storage_id).exists()
    }
}

/// Build the full application router over an in-memory store and a
/// temporary upload directory.
///
/// Uses the same `build_app_router` as `main.rs` so tests exercise the real
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery).
pub fn build_test_app() -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryCustomerStore::new());
    let app = build_app_with_store(store.clone(), &upload_dir);
    TestApp {
        router: app,
        store,
        upload_dir,
    }
}

/// Build the router over any store implementation.
pub fn build_app_with_store(store: Arc<dyn CustomerStore>, upload_dir: &TempDir) -> Router {
    let config = test_config(upload_dir);
    let images = Arc::new(LocalImageStorage::new(
        config.upload_dir.clone(),
        config.uploads_base_url(),
    ));
    let state = AppState {
        customers: CustomerService::new(store, images),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_form(app: Router, uri: &str, form: MultipartBody) -> Response<Body> {
    send_form(app, Method::POST, uri, form).await
}

pub async fn put_form(app: Router, uri: &str, form: MultipartBody) -> Response<Body> {
    send_form(app, Method::PUT, uri, form).await
}

async fn send_form(app: Router, method: Method, uri: &str, form: MultipartBody) -> Response<Body> {
    let (content_type, body) = form.finish();
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Create a customer through the API and return its JSON.
pub async fn create_customer(app: Router, form: MultipartBody) -> serde_json::Value {
    let response = post_form(app, "/api/v1/customers", form).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Multipart builder
// ---------------------------------------------------------------------------

/// Hand-rolled `multipart/form-data` encoder for request bodies.
///
/// `reqwest::multipart::Form` only streams into a reqwest request, so it
/// cannot produce an `axum::body::Body` for `oneshot`.
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "----crm-test-boundary-7MA4YWxkTrZu0gW".to_string(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Returns the `Content-Type` header value and the encoded body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}

/// Form with the two required fields.
pub fn ana_form() -> MultipartBody {
    MultipartBody::new()
        .text("name", "Ana")
        .text("email", "ana@x.com")
}
