//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for list endpoints that support an `include_inactive` flag.
#[derive(Debug, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// `?domain=&q=` for the content search endpoint.
#[derive(Debug, Deserialize)]
pub struct ContentSearchParams {
    pub domain: String,
    #[serde(default)]
    pub q: String,
}
