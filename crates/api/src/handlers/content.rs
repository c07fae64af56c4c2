//! Handler for domain-scoped content search.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use vitrine_core::carousel::Domain;
use vitrine_core::content::ContentSearchResult;

use crate::error::AppResult;
use crate::query::ContentSearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/content/search?domain=team&q=fla
///
/// At most ten items of the requested domain whose title contains `q`.
/// A blank `q` returns an empty list without querying.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<ContentSearchParams>,
) -> AppResult<impl IntoResponse> {
    let domain = Domain::from_str(&params.domain)?;
    let term = params.q.trim();

    let results: Vec<ContentSearchResult> = if term.is_empty() {
        Vec::new()
    } else {
        state.lookups.search(domain, term).await?
    };

    tracing::debug!(%domain, term, count = results.len(), "Content search");
    Ok(Json(DataResponse { data: results }))
}
