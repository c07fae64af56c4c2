use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vitrine_core::content::LookupError;
use vitrine_core::error::CoreError;
use vitrine_core::form::{FormError, PersistenceError};
use vitrine_core::generation::GenerationError;
use vitrine_core::validation::FieldViolation;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain errors of `vitrine_core` and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{ "error": ..., "code": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vitrine_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Field-level validation failures, returned under `details`.
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    /// A failure at the configuration generator boundary.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// A failure of the content lookup service.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::ValidationFailed(violations) => AppError::Validation(violations),
            FormError::Generation(err) => AppError::Generation(err),
            FormError::PersistenceFailed(PersistenceError::Conflict(msg)) => {
                AppError::Core(CoreError::Conflict(msg))
            }
            FormError::PersistenceFailed(PersistenceError::Rejected(msg)) => {
                AppError::Core(CoreError::Validation(msg))
            }
            FormError::PersistenceFailed(PersistenceError::Unavailable(msg)) => {
                AppError::InternalError(msg)
            }
            FormError::InvalidState { .. } => AppError::InternalError(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Validation(violations) = &self {
            let body = json!({
                "error": "Validation failed",
                "code": "VALIDATION_ERROR",
                "details": violations,
            });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Generator boundary ---
            AppError::Generation(err) => classify_generation_error(err),

            // --- Content lookup ---
            AppError::Lookup(LookupError::UnsupportedDomain(domain)) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_DOMAIN",
                format!("Content search is not available for domain '{domain}'"),
            ),
            AppError::Lookup(LookupError::Failed(msg)) => {
                tracing::error!(error = %msg, "Content lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LOOKUP_FAILED",
                    "Content search failed".to_string(),
                )
            }

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
            AppError::Validation(_) => unreachable!("handled above"),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Map a generator failure onto the wire contract: 429, 402, 400 for a blank
/// prompt, 500 for everything else. Messages are the user-facing ones; the
/// diagnostic is logged.
fn classify_generation_error(err: &GenerationError) -> (StatusCode, &'static str, String) {
    let (status, code) = match err {
        GenerationError::EmptyPrompt => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        GenerationError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
        GenerationError::QuotaExceeded => (StatusCode::PAYMENT_REQUIRED, "QUOTA_EXCEEDED"),
        GenerationError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR"),
        GenerationError::MalformedResponse(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "MALFORMED_RESPONSE")
        }
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "Carousel generation failed");
    } else {
        tracing::warn!(error = %err, "Carousel generation rejected");
    }
    (status, code, err.user_message())
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations map to 409.
/// - Check constraint violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                );
            }
            // PostgreSQL check constraint violation: error code 23514
            if db_err.code().as_deref() == Some("23514") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Value violates constraint: {constraint}"),
                );
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
