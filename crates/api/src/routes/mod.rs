pub mod carousels;
pub mod content;
pub mod functions;
pub mod generation;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /carousels                       list, create (GET, POST)
/// /carousels/validate              dry-run validation (POST)
/// /carousels/{id}                  get, update, delete
///
/// /content/search                  domain-scoped search (?domain=&q=)
///
/// /generation/hints                entities offered to the generator (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Carousel configurations.
        .nest("/carousels", carousels::router())
        // Manual selection lookups.
        .nest("/content", content::router())
        // Generator prompt hints.
        .nest("/generation", generation::router())
}
