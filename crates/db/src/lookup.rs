//! Database-backed [`ContentLookup`] used by the lookup registry.

use async_trait::async_trait;
use vitrine_core::carousel::Domain;
use vitrine_core::content::{ContentLookup, ContentSearchResult, LookupError};

use crate::repositories::ContentRepo;
use crate::DbPool;

/// Searches one domain's table.
pub struct PgContentLookup {
    pool: DbPool,
    domain: Domain,
}

impl PgContentLookup {
    pub fn new(pool: DbPool, domain: Domain) -> Self {
        Self { pool, domain }
    }
}

#[async_trait]
impl ContentLookup for PgContentLookup {
    async fn search(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<ContentSearchResult>, LookupError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        ContentRepo::search(&self.pool, self.domain, term, limit)
            .await
            .map_err(|e| {
                tracing::error!(domain = %self.domain, error = %e, "Content lookup query failed");
                LookupError::Failed(e.to_string())
            })
    }
}
