//! HTTP clients for carousel generation.
//!
//! - [`ai`]: the upstream language-model gateway (OpenAI-compatible chat
//!   completions) and the [`ai::GatewayGenerator`] that turns a prompt into
//!   a validated configuration draft.
//! - [`client`]: the caller side of the `generate-carousel` endpoint.

pub mod ai;
pub mod client;
