//! PostgreSQL persistence for carousels and the content they reference.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use vitrine_core::carousel::Domain;
use vitrine_core::content::LookupRegistry;

pub mod lookup;
pub mod models;
pub mod repositories;
pub mod store;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply embedded migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Registry with a database-backed lookup for every content domain.
pub fn content_lookup_registry(pool: &DbPool) -> LookupRegistry {
    let mut registry = LookupRegistry::new();
    for domain in Domain::ALL {
        registry.register(
            *domain,
            Arc::new(lookup::PgContentLookup::new(pool.clone(), *domain)),
        );
    }
    registry
}
