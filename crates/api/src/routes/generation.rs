use axum::routing::get;
use axum::Router;

use crate::handlers::generate;
use crate::state::AppState;

/// Routes mounted at `/generation`.
///
/// ```text
/// GET /hints   -> hints
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/hints", get(generate::hints))
}
