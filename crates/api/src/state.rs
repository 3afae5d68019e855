use std::sync::Arc;

use crate::config::ServerConfig;
use crate::service::CustomerService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Customer operations over the injected store and image storage.
    pub customers: CustomerService,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
