//! Repository for the `carousels` table.

use sqlx::PgPool;
use vitrine_core::carousel::CarouselConfig;
use vitrine_core::types::DbId;

use crate::models::carousel::CarouselRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, layout, carousel_type, domain, domain_value, filter_value, \
    algorithm, sort_type, content_limit, plan_type, status, show_more_button, sort_order, \
    selected_content, starts_at, ends_at, created_at, updated_at";

/// Provides CRUD operations for carousels.
pub struct CarouselRepo;

impl CarouselRepo {
    /// Insert a new carousel, returning the created row.
    ///
    /// An `order` of 0 places the carousel after every existing one.
    pub async fn create(pool: &PgPool, input: &CarouselConfig) -> Result<CarouselRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO carousels (title, layout, carousel_type, domain, domain_value, \
                filter_value, algorithm, sort_type, content_limit, plan_type, status, \
                show_more_button, sort_order, selected_content, starts_at, ends_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, \
                COALESCE(NULLIF($13, 0), \
                    (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM carousels)), \
                $14, $15, $16) \
             RETURNING {COLUMNS}"
        );
        let schedule = input.schedule.clone().unwrap_or_default();
        sqlx::query_as::<_, CarouselRow>(&query)
            .bind(&input.title)
            .bind(input.layout.as_str())
            .bind(input.carousel_type.as_str())
            .bind(input.domain.as_str())
            .bind(&input.domain_value)
            .bind(&input.filter_value)
            .bind(input.algorithm.map(|a| a.as_str()))
            .bind(input.sort_type.as_str())
            .bind(input.content_limit)
            .bind(input.plan_type.as_str())
            .bind(input.status)
            .bind(input.show_more_button)
            .bind(input.order)
            .bind(&input.selected_content)
            .bind(schedule.starts_at)
            .bind(schedule.ends_at)
            .fetch_one(pool)
            .await
    }

    /// Find a carousel by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CarouselRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM carousels WHERE id = $1");
        sqlx::query_as::<_, CarouselRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List carousels in display order, optionally skipping inactive ones.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<CarouselRow>, sqlx::Error> {
        let query = if include_inactive {
            format!("SELECT {COLUMNS} FROM carousels ORDER BY sort_order, id")
        } else {
            format!("SELECT {COLUMNS} FROM carousels WHERE status = true ORDER BY sort_order, id")
        };
        sqlx::query_as::<_, CarouselRow>(&query).fetch_all(pool).await
    }

    /// Replace every editable field of a carousel.
    ///
    /// An `order` of 0 keeps the carousel's current position. Returns `None`
    /// if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CarouselConfig,
    ) -> Result<Option<CarouselRow>, sqlx::Error> {
        let query = format!(
            "UPDATE carousels SET \
                title = $2, layout = $3, carousel_type = $4, domain = $5, \
                domain_value = $6, filter_value = $7, algorithm = $8, sort_type = $9, \
                content_limit = $10, plan_type = $11, status = $12, show_more_button = $13, \
                sort_order = COALESCE(NULLIF($14, 0), sort_order), selected_content = $15, \
                starts_at = $16, ends_at = $17 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let schedule = input.schedule.clone().unwrap_or_default();
        sqlx::query_as::<_, CarouselRow>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.layout.as_str())
            .bind(input.carousel_type.as_str())
            .bind(input.domain.as_str())
            .bind(&input.domain_value)
            .bind(&input.filter_value)
            .bind(input.algorithm.map(|a| a.as_str()))
            .bind(input.sort_type.as_str())
            .bind(input.content_limit)
            .bind(input.plan_type.as_str())
            .bind(input.status)
            .bind(input.show_more_button)
            .bind(input.order)
            .bind(&input.selected_content)
            .bind(schedule.starts_at)
            .bind(schedule.ends_at)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a carousel. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM carousels WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
