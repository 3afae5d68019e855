#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;
use tokio::net::TcpListener;

use crm_api::config::ServerConfig;
use crm_api::router::build_app_router;
use crm_api::service::CustomerService;
use crm_api::state::AppState;
use crm_client::{ClientConfig, CustomerApi, CustomerQueries, QueryCache};
use crm_db::store::MemoryCustomerStore;
use crm_storage::LocalImageStorage;

/// Minimal valid PNG header; enough for server-side format sniffing.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

/// A live API server on an ephemeral port plus handles on its resources.
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryCustomerStore>,
    pub upload_dir: TempDir,
}

impl TestServer {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(format!("{}/api/v1/customers", self.base_url))
    }

    pub fn api(&self) -> CustomerApi {
        CustomerApi::new(&self.client_config())
    }

    /// Fresh queries object with its own empty cache.
    pub fn queries(&self) -> CustomerQueries {
        CustomerQueries::new(self.api(), QueryCache::new())
    }
}

/// Serve the real router over an in-memory store on `127.0.0.1:0`.
pub async fn spawn_server() -> TestServer {
    let upload_dir = tempfile::tempdir().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");

    let config = ServerConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        upload_dir: upload_dir.path().to_path_buf(),
        public_base_url: base_url.clone(),
        max_image_bytes: 1024 * 1024,
    };

    let store = Arc::new(MemoryCustomerStore::new());
    let images = Arc::new(LocalImageStorage::new(
        config.upload_dir.clone(),
        config.uploads_base_url(),
    ));
    let state = AppState {
        customers: CustomerService::new(store.clone(), images),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url,
        store,
        upload_dir,
    }
}
