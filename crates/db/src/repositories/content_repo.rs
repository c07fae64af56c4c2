//! Read-only queries over the per-domain content tables.
//!
//! Each [`Domain`] maps to a [`DomainTable`] describing which table and
//! columns hold its id, title and thumbnail, and which flag (if any) marks a
//! row as visible.

use sqlx::PgPool;
use vitrine_core::carousel::Domain;
use vitrine_core::content::ContentSearchResult;
use vitrine_core::generation::AvailableEntity;

use crate::models::content::ContentRow;

/// Where a domain's content lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainTable {
    pub table: &'static str,
    pub title_column: &'static str,
    pub thumbnail_column: Option<&'static str>,
    /// Boolean column that must be true for a row to be listed.
    pub visible_column: Option<&'static str>,
}

/// Table layout for `domain`.
pub fn domain_table(domain: Domain) -> DomainTable {
    match domain {
        Domain::Team => DomainTable {
            table: "teams",
            title_column: "name",
            thumbnail_column: Some("logo_url"),
            visible_column: Some("is_active"),
        },
        Domain::Player => DomainTable {
            table: "players",
            title_column: "name",
            thumbnail_column: Some("photo_url"),
            visible_column: Some("is_active"),
        },
        Domain::Championship => DomainTable {
            table: "championships",
            title_column: "name",
            thumbnail_column: Some("logo_url"),
            visible_column: Some("is_active"),
        },
        Domain::Catalogue => DomainTable {
            table: "catalogues",
            title_column: "title",
            thumbnail_column: Some("cover_url"),
            visible_column: Some("is_published"),
        },
        Domain::Collection => DomainTable {
            table: "collections",
            title_column: "title",
            thumbnail_column: Some("cover_url"),
            visible_column: Some("is_published"),
        },
        Domain::Banner => DomainTable {
            table: "banners",
            title_column: "title",
            thumbnail_column: Some("image_url"),
            visible_column: Some("is_active"),
        },
        Domain::News => DomainTable {
            table: "news",
            title_column: "title",
            thumbnail_column: Some("image_url"),
            visible_column: Some("is_published"),
        },
        Domain::Content => DomainTable {
            table: "contents",
            title_column: "title",
            thumbnail_column: Some("thumbnail_url"),
            visible_column: Some("is_published"),
        },
    }
}

/// Escape `%`, `_` and `\` so user input is matched literally by `ILIKE`.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `SELECT` projecting `{id, title, thumbnail}` from `spec`.
///
/// `$1` is the `ILIKE` pattern (or omitted when `with_filter` is false) and
/// the last parameter is the row limit.
pub fn build_select(spec: &DomainTable, with_filter: bool) -> String {
    let thumbnail = spec.thumbnail_column.unwrap_or("NULL::text");
    let mut conditions = Vec::new();
    if with_filter {
        conditions.push(format!("{} ILIKE $1", spec.title_column));
    }
    if let Some(flag) = spec.visible_column {
        conditions.push(format!("{flag} = true"));
    }
    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    let limit_param = if with_filter { "$2" } else { "$1" };

    format!(
        "SELECT id::text AS id, {title} AS title, {thumbnail} AS thumbnail \
         FROM {table}{where_clause} ORDER BY {title} LIMIT {limit_param}",
        title = spec.title_column,
        table = spec.table,
    )
}

/// Provides domain-scoped content queries.
pub struct ContentRepo;

impl ContentRepo {
    /// Case-insensitive substring search on the domain's title column.
    pub async fn search(
        pool: &PgPool,
        domain: Domain,
        term: &str,
        limit: i64,
    ) -> Result<Vec<ContentSearchResult>, sqlx::Error> {
        let query = build_select(&domain_table(domain), true);
        let pattern = format!("%{}%", escape_like(term.trim()));
        let rows = sqlx::query_as::<_, ContentRow>(&query)
            .bind(pattern)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_result(domain)).collect())
    }

    /// First `limit` visible entities of `domain`, used as generator hints.
    pub async fn list_available(
        pool: &PgPool,
        domain: Domain,
        limit: i64,
    ) -> Result<Vec<AvailableEntity>, sqlx::Error> {
        let query = build_select(&domain_table(domain), false);
        let rows = sqlx::query_as::<_, ContentRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(ContentRow::into_entity).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_domain_has_a_distinct_table() {
        let mut tables: Vec<_> = Domain::ALL.iter().map(|d| domain_table(*d).table).collect();
        tables.sort_unstable();
        tables.dedup();
        assert_eq!(tables.len(), Domain::ALL.len());
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
        assert_eq!(escape_like("Flamengo"), "Flamengo");
    }

    #[test]
    fn search_sql_filters_and_limits() {
        let sql = build_select(&domain_table(Domain::Team), true);
        assert_eq!(
            sql,
            "SELECT id::text AS id, name AS title, logo_url AS thumbnail \
             FROM teams WHERE name ILIKE $1 AND is_active = true ORDER BY name LIMIT $2"
        );
    }

    #[test]
    fn listing_sql_uses_single_parameter() {
        let sql = build_select(&domain_table(Domain::News), false);
        assert!(sql.contains("WHERE is_published = true"));
        assert!(sql.ends_with("LIMIT $1"));
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn missing_thumbnail_column_projects_null() {
        let spec = DomainTable {
            table: "things",
            title_column: "label",
            thumbnail_column: None,
            visible_column: None,
        };
        let sql = build_select(&spec, true);
        assert!(sql.contains("NULL::text AS thumbnail"));
        assert!(sql.contains("FROM things WHERE label ILIKE $1 ORDER BY"));
    }
}
