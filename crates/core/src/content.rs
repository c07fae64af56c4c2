//! Domain-scoped content lookup.
//!
//! A [`LookupRegistry`] maps each [`Domain`] to the [`ContentLookup`] that
//! knows how to search it, so adding a domain is a registration rather than
//! another branch in a central `match`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::carousel::Domain;
use crate::types::ContentId;

/// Maximum number of results a single domain search returns.
pub const MAX_SEARCH_RESULTS: usize = 10;

/// A candidate item returned by a domain-scoped search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSearchResult {
    pub id: ContentId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: Domain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Errors from the content lookup boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No lookup is registered for the requested domain.
    #[error("No content lookup registered for domain '{0}'")]
    UnsupportedDomain(Domain),

    /// The backing store failed to answer.
    #[error("Content lookup failed: {0}")]
    Failed(String),
}

/// Searches one content domain by free-text term.
#[async_trait]
pub trait ContentLookup: Send + Sync {
    /// Return items whose title contains `term` (case-insensitive), at most
    /// `limit` of them.
    async fn search(&self, term: &str, limit: usize)
        -> Result<Vec<ContentSearchResult>, LookupError>;
}

/// Registry of per-domain lookups.
#[derive(Clone, Default)]
pub struct LookupRegistry {
    lookups: HashMap<Domain, Arc<dyn ContentLookup>>,
}

impl LookupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the lookup for `domain`.
    pub fn register(&mut self, domain: Domain, lookup: Arc<dyn ContentLookup>) {
        self.lookups.insert(domain, lookup);
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with(mut self, domain: Domain, lookup: Arc<dyn ContentLookup>) -> Self {
        self.register(domain, lookup);
        self
    }

    pub fn supports(&self, domain: Domain) -> bool {
        self.lookups.contains_key(&domain)
    }

    /// Search `domain` for `term`.
    ///
    /// The response is normalised so it never exceeds
    /// [`MAX_SEARCH_RESULTS`], only carries items tagged with `domain`, and
    /// holds each id once.
    pub async fn search(
        &self,
        domain: Domain,
        term: &str,
    ) -> Result<Vec<ContentSearchResult>, LookupError> {
        let lookup = self
            .lookups
            .get(&domain)
            .ok_or(LookupError::UnsupportedDomain(domain))?;

        let raw = lookup.search(term, MAX_SEARCH_RESULTS).await?;
        let raw_len = raw.len();

        let mut results: Vec<ContentSearchResult> = Vec::with_capacity(MAX_SEARCH_RESULTS);
        for item in raw {
            if results.len() == MAX_SEARCH_RESULTS {
                break;
            }
            if item.kind != domain || results.iter().any(|r| r.id == item.id) {
                continue;
            }
            results.push(item);
        }

        if results.len() != raw_len {
            tracing::debug!(
                domain = %domain,
                raw = raw_len,
                kept = results.len(),
                "Normalised content lookup response",
            );
        }

        Ok(results)
    }
}

/// Lookup over a fixed in-memory list of items.
///
/// Useful for domains with a handful of static entries and for tests.
pub struct StaticLookup {
    items: Vec<ContentSearchResult>,
}

impl StaticLookup {
    pub fn new(items: Vec<ContentSearchResult>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl ContentLookup for StaticLookup {
    async fn search(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<ContentSearchResult>, LookupError> {
        let needle = term.to_lowercase();
        Ok(self
            .items
            .iter()
            .filter(|item| item.title.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;

    pub fn item(id: &str, title: &str, kind: Domain) -> ContentSearchResult {
        ContentSearchResult {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            thumbnail: None,
        }
    }

    /// Lookup that ignores its limit and returns a fixed response verbatim.
    pub struct RawLookup(pub Vec<ContentSearchResult>);

    #[async_trait]
    impl ContentLookup for RawLookup {
        async fn search(
            &self,
            _term: &str,
            _limit: usize,
        ) -> Result<Vec<ContentSearchResult>, LookupError> {
            Ok(self.0.clone())
        }
    }

    /// Lookup that always fails.
    pub struct FailingLookup;

    #[async_trait]
    impl ContentLookup for FailingLookup {
        async fn search(
            &self,
            _term: &str,
            _limit: usize,
        ) -> Result<Vec<ContentSearchResult>, LookupError> {
            Err(LookupError::Failed("connection reset".into()))
        }
    }
}
