//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to `vitrine_core` for domain logic and to the
//! repositories in `vitrine_db`, mapping errors via [`AppError`](crate::error::AppError).

pub mod carousels;
pub mod content;
pub mod generate;
