//! Database-backed [`CarouselStore`] for the form workflow.

use async_trait::async_trait;
use vitrine_core::carousel::CarouselConfig;
use vitrine_core::form::{CarouselStore, PersistenceError};
use vitrine_core::types::DbId;

use crate::repositories::CarouselRepo;
use crate::DbPool;

/// Stores submitted configurations as new `carousels` rows.
pub struct PgCarouselStore {
    pool: DbPool,
}

impl PgCarouselStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarouselStore for PgCarouselStore {
    async fn persist(&self, config: &CarouselConfig) -> Result<DbId, PersistenceError> {
        CarouselRepo::create(&self.pool, config)
            .await
            .map(|row| row.id)
            .map_err(classify_persistence_error)
    }
}

/// Split sqlx failures into value problems and store problems.
///
/// PostgreSQL codes: 23505 unique violation, 23514 check violation,
/// 23502 not-null violation.
pub fn classify_persistence_error(err: sqlx::Error) -> PersistenceError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or("unknown");
        match db_err.code().as_deref() {
            Some("23505") => {
                return PersistenceError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ))
            }
            Some("23514") | Some("23502") => {
                return PersistenceError::Rejected(format!(
                    "Value violates constraint: {constraint}"
                ))
            }
            _ => {}
        }
    }
    PersistenceError::Unavailable(err.to_string())
}
