//! Edge-function routes, mounted at `/functions/v1` with permissive CORS.

use axum::routing::post;
use axum::Router;

use crate::handlers::generate;
use crate::state::AppState;

/// ```text
/// POST    /generate-carousel   -> generate
/// OPTIONS /generate-carousel   -> preflight
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/generate-carousel",
        post(generate::generate).options(generate::preflight),
    )
}
