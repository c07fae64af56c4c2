//! Carousel entity model.

use serde::Serialize;
use sqlx::FromRow;
use vitrine_core::carousel::{
    Algorithm, CarouselConfig, CarouselType, Domain, Layout, PlanType, Schedule, SortType,
};
use vitrine_core::error::CoreError;
use vitrine_core::types::{DbId, Timestamp};

/// A row from the `carousels` table.
#[derive(Debug, Clone, FromRow)]
pub struct CarouselRow {
    pub id: DbId,
    pub title: String,
    pub layout: String,
    pub carousel_type: String,
    pub domain: String,
    pub domain_value: Option<String>,
    pub filter_value: Option<String>,
    pub algorithm: Option<String>,
    pub sort_type: String,
    pub content_limit: i32,
    pub plan_type: String,
    pub status: bool,
    pub show_more_button: bool,
    pub sort_order: i32,
    pub selected_content: Vec<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A stored carousel as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Carousel {
    pub id: DbId,
    #[serde(flatten)]
    pub config: CarouselConfig,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<CarouselRow> for Carousel {
    type Error = CoreError;

    /// Fails only if the row holds an enum value the application does not
    /// know, which the table constraints rule out.
    fn try_from(row: CarouselRow) -> Result<Self, Self::Error> {
        let schedule = match (row.starts_at, row.ends_at) {
            (None, None) => None,
            (starts_at, ends_at) => Some(Schedule { starts_at, ends_at }),
        };
        let algorithm = row.algorithm.as_deref().map(Algorithm::from_str).transpose()?;

        Ok(Self {
            id: row.id,
            config: CarouselConfig {
                title: row.title,
                layout: Layout::from_str(&row.layout)?,
                carousel_type: CarouselType::from_str(&row.carousel_type)?,
                domain: Domain::from_str(&row.domain)?,
                domain_value: row.domain_value,
                filter_value: row.filter_value,
                algorithm,
                sort_type: SortType::from_str(&row.sort_type)?,
                content_limit: row.content_limit,
                plan_type: PlanType::from_str(&row.plan_type)?,
                status: row.status,
                show_more_button: row.show_more_button,
                order: row.sort_order,
                selected_content: row.selected_content,
                schedule,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row() -> CarouselRow {
        let now = Utc::now();
        CarouselRow {
            id: 7,
            title: "Times da Série A".into(),
            layout: "poster".into(),
            carousel_type: "manual".into(),
            domain: "team".into(),
            domain_value: None,
            filter_value: None,
            algorithm: None,
            sort_type: "alphabetical".into(),
            content_limit: 20,
            plan_type: "all".into(),
            status: true,
            show_more_button: false,
            sort_order: 2,
            selected_content: vec!["1".into(), "4".into()],
            starts_at: None,
            ends_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_converts_to_carousel() {
        let carousel = Carousel::try_from(row()).unwrap();
        assert_eq!(carousel.config.domain, Domain::Team);
        assert_eq!(carousel.config.order, 2);
        assert!(carousel.config.schedule.is_none());
    }

    #[test]
    fn half_open_schedule_is_kept() {
        let mut row = row();
        row.starts_at = Some(Utc::now());
        let carousel = Carousel::try_from(row).unwrap();
        let schedule = carousel.config.schedule.unwrap();
        assert!(schedule.starts_at.is_some());
        assert!(schedule.ends_at.is_none());
    }

    #[test]
    fn unknown_layout_is_rejected() {
        let mut row = row();
        row.layout = "carousel3d".into();
        assert!(Carousel::try_from(row).is_err());
    }

    #[test]
    fn serialized_carousel_is_flat() {
        let value = serde_json::to_value(Carousel::try_from(row()).unwrap()).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["carouselType"], "manual");
        assert_eq!(value["order"], 2);
        assert!(value.get("createdAt").is_some());
    }
}
