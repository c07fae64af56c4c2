//! Route definitions for carousel configurations.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::carousels;
use crate::state::AppState;

/// Routes mounted at `/carousels`.
///
/// ```text
/// GET    /           -> list
/// POST   /           -> create
/// POST   /validate   -> validate
/// GET    /{id}       -> get_by_id
/// PUT    /{id}       -> update
/// DELETE /{id}       -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(carousels::list).post(carousels::create))
        .route("/validate", post(carousels::validate))
        .route(
            "/{id}",
            get(carousels::get_by_id)
                .put(carousels::update)
                .delete(carousels::delete),
        )
}
