//! Carousel (shelf) configuration schema.
//!
//! This module lives in `core` (zero internal deps) so the same shapes are
//! shared by the generator endpoint, the repository layer and the form
//! workflow. The wire format is camelCase JSON.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{ContentId, Timestamp};

/// Default number of items a carousel shows.
pub const DEFAULT_CONTENT_LIMIT: i32 = 10;

/// Generates a closed string enum with `as_str`, `from_str` and the list of
/// accepted wire values.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal, $valid:ident {
            $( $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( #[serde(rename = $wire)] $variant ),+
        }

        /// Accepted wire values.
        pub const $valid: &[&str] = &[$( $wire ),+];

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Return the wire representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $wire ),+
                }
            }

            /// Parse from the wire representation.
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Result<Self, CoreError> {
                match s {
                    $( $wire => Ok(Self::$variant), )+
                    _ => Err(CoreError::Validation(format!(
                        "Invalid {} '{s}'. Must be one of: {}",
                        $label,
                        $valid.join(", ")
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_enum! {
    /// How a carousel obtains its items.
    CarouselType, "carousel type", VALID_CAROUSEL_TYPES {
        Automatic => "automatic",
        Manual => "manual",
        Personalized => "personalized",
    }
}

closed_enum! {
    /// Content category a carousel pulls from.
    Domain, "domain", VALID_DOMAINS {
        Collection => "collection",
        Team => "team",
        Catalogue => "catalogue",
        Player => "player",
        Championship => "championship",
        Banner => "banner",
        News => "news",
        Content => "content",
    }
}

closed_enum! {
    /// Visual layout of the carousel cards.
    Layout, "layout", VALID_LAYOUTS {
        Default => "default",
        Hero => "hero",
        Poster => "poster",
        Square => "square",
        Compact => "compact",
    }
}

closed_enum! {
    /// Ordering applied to automatically selected items.
    SortType, "sort type", VALID_SORT_TYPES {
        Recent => "recent",
        Popular => "popular",
        Alphabetical => "alphabetical",
        Oldest => "oldest",
        Random => "random",
    }
}

closed_enum! {
    /// Subscription plan allowed to see the carousel.
    PlanType, "plan type", VALID_PLAN_TYPES {
        Free => "free",
        Basic => "basic",
        Premium => "premium",
        All => "all",
    }
}

closed_enum! {
    /// Recommendation source for personalized carousels.
    Algorithm, "algorithm", VALID_ALGORITHMS {
        ContinueWatching => "continue_watching",
        Recommended => "recommended",
        Trending => "trending",
        Favourites => "favourites",
    }
}

/// Publication window of a carousel. Either bound may be open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<Timestamp>,
}

/// One carousel definition as edited in the form and stored on submit.
///
/// `selected_content` is only meaningful for [`CarouselType::Manual`];
/// `domain_value`/`filter_value` drive automatic carousels and `algorithm`
/// drives personalized ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselConfig {
    pub title: String,
    pub layout: Layout,
    pub carousel_type: CarouselType,
    pub domain: Domain,
    /// Field of the domain the automatic filter applies to (e.g. `team_id`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_value: Option<String>,
    /// Value matched against `domain_value`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<Algorithm>,
    pub sort_type: SortType,
    pub content_limit: i32,
    pub plan_type: PlanType,
    pub status: bool,
    pub show_more_button: bool,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub selected_content: Vec<ContentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            layout: Layout::Default,
            carousel_type: CarouselType::Automatic,
            domain: Domain::Content,
            domain_value: None,
            filter_value: None,
            algorithm: None,
            sort_type: SortType::Recent,
            content_limit: DEFAULT_CONTENT_LIMIT,
            plan_type: PlanType::All,
            status: true,
            show_more_button: true,
            order: 0,
            selected_content: Vec::new(),
            schedule: None,
        }
    }
}

impl CarouselConfig {
    /// Whether the carousel's items are picked by hand.
    pub fn is_manual(&self) -> bool {
        self.carousel_type == CarouselType::Manual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn domain_round_trips_through_wire_names() {
        for domain in Domain::ALL {
            assert_eq!(Domain::from_str(domain.as_str()).unwrap(), *domain);
        }
        assert_eq!(VALID_DOMAINS.len(), 8);
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        let err = CarouselType::from_str("scheduled").unwrap_err();
        assert!(err.to_string().contains("automatic, manual, personalized"));
    }

    #[test]
    fn algorithm_uses_snake_case_wire_name() {
        assert_eq!(Algorithm::ContinueWatching.as_str(), "continue_watching");
        let parsed: Algorithm = serde_json::from_value(json!("continue_watching")).unwrap();
        assert_eq!(parsed, Algorithm::ContinueWatching);
    }

    #[test]
    fn config_serializes_camel_case() {
        let config = CarouselConfig {
            title: "Destaques".into(),
            ..CarouselConfig::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["carouselType"], "automatic");
        assert_eq!(value["contentLimit"], 10);
        assert_eq!(value["showMoreButton"], true);
        assert!(value.get("domainValue").is_none());
    }

    #[test]
    fn config_deserializes_without_optional_fields() {
        let config: CarouselConfig = serde_json::from_value(json!({
            "title": "Times",
            "layout": "poster",
            "carouselType": "manual",
            "domain": "team",
            "sortType": "alphabetical",
            "contentLimit": 5,
            "planType": "premium",
            "status": false,
            "showMoreButton": false
        }))
        .unwrap();
        assert!(config.is_manual());
        assert_eq!(config.order, 0);
        assert!(config.selected_content.is_empty());
        assert!(config.schedule.is_none());
    }
}
