//! Handlers for the `/carousels` resource.
//!
//! Bodies are taken as raw JSON and run through the validator field by field,
//! so unknown enum values come back as `details` entries rather than a
//! deserialization failure.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use vitrine_core::error::CoreError;
use vitrine_core::form::CarouselForm;
use vitrine_core::types::DbId;
use vitrine_core::validation::{validate_value, FieldViolation};
use vitrine_db::models::carousel::Carousel;
use vitrine_db::repositories::CarouselRepo;
use vitrine_db::store::PgCarouselStore;

use crate::error::{AppError, AppResult};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of a dry-run validation.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<FieldViolation>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Carousel",
        id,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/carousels?include_inactive=false
///
/// List carousels in display order.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let carousels = CarouselRepo::list(&state.pool, params.include_inactive)
        .await?
        .into_iter()
        .map(Carousel::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data: carousels }))
}

/// GET /api/v1/carousels/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let row = CarouselRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: Carousel::try_from(row)?,
    }))
}

/// POST /api/v1/carousels
///
/// Validate and persist a new carousel. Invalid bodies never reach the
/// database.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = payload?;
    let config = validate_value(&body).map_err(AppError::Validation)?;

    let mut form = CarouselForm::from_config(config);
    let store = PgCarouselStore::new(state.pool.clone());
    let id = form.submit(&store).await?;

    let row = CarouselRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: Carousel::try_from(row)?,
        }),
    ))
}

/// PUT /api/v1/carousels/{id}
///
/// Replace a carousel's configuration.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = payload?;
    let config = validate_value(&body).map_err(AppError::Validation)?;
    let row = CarouselRepo::update(&state.pool, id, &config)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(carousel_id = id, "Carousel updated");
    Ok(Json(DataResponse {
        data: Carousel::try_from(row)?,
    }))
}

/// DELETE /api/v1/carousels/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CarouselRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(carousel_id = id, "Carousel deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/carousels/validate
///
/// Run the validator without persisting anything.
pub async fn validate(
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = payload?;
    let report = match validate_value(&body) {
        Ok(_) => ValidationReport {
            valid: true,
            errors: Vec::new(),
        },
        Err(errors) => ValidationReport {
            valid: false,
            errors,
        },
    };
    Ok(Json(DataResponse { data: report }))
}
