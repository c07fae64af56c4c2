//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` struct matching the database row and
//! the conversions to and from the `vitrine_core` types.

pub mod carousel;
pub mod content;
