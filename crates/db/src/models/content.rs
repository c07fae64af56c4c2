//! Content search projection.

use sqlx::FromRow;
use vitrine_core::carousel::Domain;
use vitrine_core::content::ContentSearchResult;
use vitrine_core::generation::AvailableEntity;

/// `{id, title, thumbnail}` projection shared by every content table.
#[derive(Debug, Clone, FromRow)]
pub struct ContentRow {
    pub id: String,
    pub title: String,
    pub thumbnail: Option<String>,
}

impl ContentRow {
    /// Tag the row with the domain it was read from.
    pub fn into_result(self, domain: Domain) -> ContentSearchResult {
        ContentSearchResult {
            id: self.id,
            title: self.title,
            kind: domain,
            thumbnail: self.thumbnail,
        }
    }

    pub fn into_entity(self) -> AvailableEntity {
        AvailableEntity::new(self.id, self.title)
    }
}
