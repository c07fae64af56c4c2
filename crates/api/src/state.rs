use std::sync::Arc;

use vitrine_core::content::LookupRegistry;
use vitrine_core::generation::ConfigGenerator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vitrine_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Domain-scoped content lookups backing the manual selector.
    pub lookups: LookupRegistry,
    /// Backend of the `generate-carousel` endpoint.
    pub generator: Arc<dyn ConfigGenerator>,
}
