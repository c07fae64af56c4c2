//! Route definitions for content lookups.

use axum::routing::get;
use axum::Router;

use crate::handlers::content;
use crate::state::AppState;

/// Routes mounted at `/content`.
///
/// ```text
/// GET /search?domain=&q=   -> search
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(content::search))
}
