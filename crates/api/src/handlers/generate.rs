//! Handlers for natural-language carousel generation.

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use futures::future::try_join_all;
use serde::Serialize;
use vitrine_core::carousel::Domain;
use vitrine_core::generation::{AvailableEntity, GenerationRequest};
use vitrine_db::repositories::ContentRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Domains whose entities are offered to the model by id.
const HINT_DOMAINS: [Domain; 5] = [
    Domain::Team,
    Domain::Catalogue,
    Domain::Player,
    Domain::Championship,
    Domain::Banner,
];

/// Maximum number of entities listed per hint domain.
const HINT_LIMIT: i64 = 50;

/// Entity lists a client can attach to a [`GenerationRequest`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationHints {
    pub available_teams: Vec<AvailableEntity>,
    pub available_catalogues: Vec<AvailableEntity>,
    pub available_players: Vec<AvailableEntity>,
    pub available_championships: Vec<AvailableEntity>,
    pub available_banners: Vec<AvailableEntity>,
}

impl From<GenerationRequest> for GenerationHints {
    fn from(request: GenerationRequest) -> Self {
        Self {
            available_teams: request.available_teams,
            available_catalogues: request.available_catalogues,
            available_players: request.available_players,
            available_championships: request.available_championships,
            available_banners: request.available_banners,
        }
    }
}

/// POST /functions/v1/generate-carousel
///
/// Turns a prompt into a validated draft: `200 { config, explanation }`.
/// Rate limiting maps to 429, exhausted credits to 402, a blank prompt to
/// 400 and every other failure to 500. Bodies that are not a JSON request
/// object get a 400 in the same `{ error, code }` shape.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(request) = payload?;
    request.check()?;
    tracing::info!(
        prompt_len = request.prompt.len(),
        teams = request.available_teams.len(),
        players = request.available_players.len(),
        "Generating carousel draft",
    );

    let generated = state.generator.generate(&request).await?;
    Ok(Json(generated))
}

/// OPTIONS /functions/v1/generate-carousel
///
/// Browser preflights are answered by the CORS layer; a bare OPTIONS gets
/// an empty 200.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// GET /api/v1/generation/hints
pub async fn hints(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let lists = try_join_all(
        HINT_DOMAINS
            .iter()
            .map(|domain| ContentRepo::list_available(&state.pool, *domain, HINT_LIMIT)),
    )
    .await?;

    let available: HashMap<Domain, Vec<AvailableEntity>> =
        HINT_DOMAINS.into_iter().zip(lists).collect();
    let hints = GenerationHints::from(GenerationRequest::from_domains(String::new(), &available));

    Ok(Json(DataResponse { data: hints }))
}
