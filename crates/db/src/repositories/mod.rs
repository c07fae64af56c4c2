//! Repository layer: one unit struct per table group, associated async fns
//! taking the pool explicitly.

pub mod carousel_repo;
pub mod content_repo;

pub use carousel_repo::CarouselRepo;
pub use content_repo::ContentRepo;
