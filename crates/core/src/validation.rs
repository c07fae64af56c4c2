//! Carousel configuration validator -- pure logic, no database access.
//!
//! [`validate`] checks a typed [`CarouselConfig`]; [`validate_value`] checks an
//! untyped JSON candidate (a generated draft or a request body) field by field
//! so unknown enum strings surface as field errors instead of a single parse
//! failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::carousel::{
    CarouselConfig, CarouselType, VALID_ALGORITHMS, VALID_CAROUSEL_TYPES, VALID_DOMAINS,
    VALID_LAYOUTS, VALID_PLAN_TYPES, VALID_SORT_TYPES,
};

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub rule_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldViolation {
    fn new(field: &str, rule_type: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            rule_type: rule_type.to_string(),
            message: message.into(),
            value: None,
        }
    }

    fn with_value(mut self, value: &Value) -> Self {
        self.value = Some(value.clone());
        self
    }
}

/// Validate a typed configuration.
///
/// Returns every violation found, in field order. The input is never
/// modified.
pub fn validate(config: &CarouselConfig) -> Result<(), Vec<FieldViolation>> {
    let mut errors = Vec::new();

    if config.title.trim().is_empty() {
        errors.push(FieldViolation::new("title", "required", "Title is required"));
    }

    if config.content_limit <= 0 {
        errors.push(
            FieldViolation::new(
                "contentLimit",
                "min_value",
                "Content limit must be a positive integer",
            )
            .with_value(&Value::from(config.content_limit)),
        );
    }

    match config.carousel_type {
        CarouselType::Manual if config.selected_content.is_empty() => {
            errors.push(FieldViolation::new(
                "selectedContent",
                "required",
                "Manual carousels need at least one selected item",
            ));
        }
        CarouselType::Automatic | CarouselType::Personalized
            if !config.selected_content.is_empty() =>
        {
            errors.push(FieldViolation::new(
                "selectedContent",
                "not_allowed",
                "Selected content is only allowed for manual carousels",
            ));
        }
        _ => {}
    }

    if let Some(schedule) = &config.schedule {
        if let (Some(start), Some(end)) = (schedule.starts_at, schedule.ends_at) {
            if start >= end {
                errors.push(FieldViolation::new(
                    "schedule",
                    "range",
                    "Schedule start must be before its end",
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate an untyped JSON candidate and convert it into a configuration.
///
/// Closed-enum fields are checked against their accepted values before
/// deserializing, then the typed checks of [`validate`] run.
pub fn validate_value(candidate: &Value) -> Result<CarouselConfig, Vec<FieldViolation>> {
    let Some(object) = candidate.as_object() else {
        return Err(vec![FieldViolation::new(
            "config",
            "type_check",
            "Configuration must be a JSON object",
        )]);
    };

    let mut errors = Vec::new();

    match object.get("title") {
        Some(Value::String(_)) => {}
        None | Some(Value::Null) => {
            errors.push(FieldViolation::new("title", "required", "Title is required"));
        }
        Some(other) => errors.push(
            FieldViolation::new("title", "type_check", "Title must be a string").with_value(other),
        ),
    }

    let required_enums: [(&str, &[&str]); 5] = [
        ("layout", VALID_LAYOUTS),
        ("carouselType", VALID_CAROUSEL_TYPES),
        ("domain", VALID_DOMAINS),
        ("sortType", VALID_SORT_TYPES),
        ("planType", VALID_PLAN_TYPES),
    ];
    for (field, allowed) in required_enums {
        if let Some(violation) = check_enum(field, object.get(field), allowed, true) {
            errors.push(violation);
        }
    }
    if let Some(violation) = check_enum("algorithm", object.get("algorithm"), VALID_ALGORITHMS, false)
    {
        errors.push(violation);
    }

    match object.get("contentLimit") {
        None | Some(Value::Null) => errors.push(FieldViolation::new(
            "contentLimit",
            "required",
            "Content limit is required",
        )),
        Some(value) => match value.as_i64() {
            Some(n) if n > 0 && n <= i64::from(i32::MAX) => {}
            _ => errors.push(
                FieldViolation::new(
                    "contentLimit",
                    "min_value",
                    "Content limit must be a positive integer",
                )
                .with_value(value),
            ),
        },
    }

    for field in ["status", "showMoreButton"] {
        match object.get(field) {
            Some(Value::Bool(_)) => {}
            None | Some(Value::Null) => errors.push(FieldViolation::new(
                field,
                "required",
                format!("{field} is required"),
            )),
            Some(other) => errors.push(
                FieldViolation::new(field, "type_check", format!("{field} must be a boolean"))
                    .with_value(other),
            ),
        }
    }

    if let Some(selected) = object.get("selectedContent") {
        let well_formed = match selected {
            Value::Null => true,
            Value::Array(items) => items.iter().all(Value::is_string),
            _ => false,
        };
        if !well_formed {
            errors.push(
                FieldViolation::new(
                    "selectedContent",
                    "type_check",
                    "Selected content must be a list of ids",
                )
                .with_value(selected),
            );
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut normalized = object.clone();
    if normalized.get("selectedContent").is_some_and(Value::is_null) {
        normalized.remove("selectedContent");
    }

    let config: CarouselConfig = serde_json::from_value(Value::Object(normalized))
        .map_err(|e| vec![FieldViolation::new("config", "type_check", e.to_string())])?;

    validate(&config)?;
    Ok(config)
}

fn check_enum(
    field: &str,
    value: Option<&Value>,
    allowed: &[&str],
    required: bool,
) -> Option<FieldViolation> {
    match value {
        None | Some(Value::Null) if required => Some(FieldViolation::new(
            field,
            "required",
            format!("{field} is required"),
        )),
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if allowed.contains(&s.as_str()) => None,
        Some(other) => Some(
            FieldViolation::new(
                field,
                "enum_values",
                format!("{field} must be one of: {}", allowed.join(", ")),
            )
            .with_value(other),
        ),
    }
}
