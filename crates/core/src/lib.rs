//! Vitrine domain core.
//!
//! Pure carousel-configuration logic shared by the repository layer, the
//! HTTP service and any future tooling. Nothing here touches the network or
//! the database directly; those sit behind the `async_trait` seams
//! ([`content::ContentLookup`], [`generation::ConfigGenerator`],
//! [`form::CarouselStore`]).

pub mod carousel;
pub mod content;
pub mod error;
pub mod form;
pub mod generation;
pub mod selector;
pub mod settings;
pub mod types;
pub mod validation;
