//! Natural-language carousel generation: request/response shapes, the
//! [`ConfigGenerator`] seam, prompt construction, and parsing of model output.
//!
//! Parsing never auto-corrects: a draft that is not valid JSON, or that fails
//! validation, is a [`GenerationError::MalformedResponse`].

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::carousel::{
    CarouselConfig, CarouselType, Domain, VALID_ALGORITHMS, VALID_CAROUSEL_TYPES, VALID_DOMAINS,
    VALID_LAYOUTS, VALID_PLAN_TYPES, VALID_SORT_TYPES,
};
use crate::validation::{validate_value, FieldViolation};

/// User-facing message for drafts that could not be parsed or validated.
pub const INVALID_FORMAT_MESSAGE: &str = "The generated configuration has an invalid format";

/// An entity the model may reference by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableEntity {
    pub id: String,
    pub name: String,
}

impl AvailableEntity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Body of one generation attempt, as sent over the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub available_teams: Vec<AvailableEntity>,
    #[serde(default)]
    pub available_catalogues: Vec<AvailableEntity>,
    #[serde(default)]
    pub available_players: Vec<AvailableEntity>,
    #[serde(default)]
    pub available_championships: Vec<AvailableEntity>,
    #[serde(default)]
    pub available_banners: Vec<AvailableEntity>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Build a request from per-domain hints. Domains without a hint list on
    /// the wire (collection, news, content) are ignored.
    pub fn from_domains(
        prompt: impl Into<String>,
        available: &HashMap<Domain, Vec<AvailableEntity>>,
    ) -> Self {
        let mut request = Self::new(prompt);
        for (domain, entities) in available {
            if let Some(slot) = request.hints_mut(*domain) {
                slot.clone_from(entities);
            }
        }
        request
    }

    /// Hint list for `domain`, if the wire format carries one.
    pub fn hints(&self, domain: Domain) -> Option<&[AvailableEntity]> {
        match domain {
            Domain::Team => Some(self.available_teams.as_slice()),
            Domain::Catalogue => Some(self.available_catalogues.as_slice()),
            Domain::Player => Some(self.available_players.as_slice()),
            Domain::Championship => Some(self.available_championships.as_slice()),
            Domain::Banner => Some(self.available_banners.as_slice()),
            Domain::Collection | Domain::News | Domain::Content => None,
        }
    }

    fn hints_mut(&mut self, domain: Domain) -> Option<&mut Vec<AvailableEntity>> {
        match domain {
            Domain::Team => Some(&mut self.available_teams),
            Domain::Catalogue => Some(&mut self.available_catalogues),
            Domain::Player => Some(&mut self.available_players),
            Domain::Championship => Some(&mut self.available_championships),
            Domain::Banner => Some(&mut self.available_banners),
            Domain::Collection | Domain::News | Domain::Content => None,
        }
    }

    /// Reject requests whose prompt is blank.
    pub fn check(&self) -> Result<(), GenerationError> {
        if self.prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        Ok(())
    }
}

/// A successfully generated draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedConfig {
    pub config: CarouselConfig,
    /// Human-readable summary of what the draft does.
    #[serde(default)]
    pub explanation: String,
}

/// Outcome of one generation attempt.
pub type GenerationResult = Result<GeneratedConfig, GenerationError>;

/// Errors from the generator boundary.
///
/// `Display` carries developer diagnostics; [`user_message`](Self::user_message)
/// is what end users see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Generator rate limit exceeded")]
    RateLimited,

    #[error("Generator credits exhausted")]
    QuotaExceeded,

    #[error("Generator upstream error: {0}")]
    Upstream(String),

    #[error("Malformed generator response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyPrompt => "Describe the carousel you want to create".to_string(),
            Self::RateLimited => {
                "Too many requests. Please wait a moment and try again".to_string()
            }
            Self::QuotaExceeded => "AI credits exhausted. Add credits to continue".to_string(),
            Self::Upstream(_) => "Failed to generate the configuration".to_string(),
            Self::MalformedResponse(_) => INVALID_FORMAT_MESSAGE.to_string(),
        }
    }

    /// Map a non-success HTTP status (and body) from the generator endpoint.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            429 => Self::RateLimited,
            402 => Self::QuotaExceeded,
            _ => {
                let detail = serde_json::from_str::<Value>(body)
                    .ok()
                    .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                    .unwrap_or_else(|| format!("HTTP {status}"));
                Self::Upstream(detail)
            }
        }
    }
}

/// Produces a configuration draft from a natural-language prompt.
#[async_trait]
pub trait ConfigGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult;
}

/// Remove a surrounding markdown code fence (```` ```json ```` or ```` ``` ````).
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Parse raw model output (possibly fenced) into a validated configuration.
pub fn parse_generated_config(raw: &str) -> Result<CarouselConfig, GenerationError> {
    let body = strip_code_fence(raw);
    let value: Value = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(format!("invalid JSON: {e}")))?;
    parse_config_value(&value)
}

/// Validate an already-decoded draft.
///
/// A manual draft may omit its selection: the model cannot know what the
/// user picked, so the form fills it in and re-validates before applying.
pub fn parse_config_value(value: &Value) -> Result<CarouselConfig, GenerationError> {
    match validate_value(value) {
        Ok(config) => Ok(config),
        Err(violations) if only_missing_selection(&violations) => {
            let mut draft = value.clone();
            if let Some(object) = draft.as_object_mut() {
                object.remove("selectedContent");
            }
            serde_json::from_value(draft)
                .map_err(|e| GenerationError::MalformedResponse(e.to_string()))
        }
        Err(violations) => {
            let detail = violations
                .iter()
                .map(|v| format!("{}: {}", v.field, v.message))
                .collect::<Vec<_>>()
                .join("; ");
            Err(GenerationError::MalformedResponse(detail))
        }
    }
}

fn only_missing_selection(violations: &[FieldViolation]) -> bool {
    violations
        .iter()
        .all(|v| v.field == "selectedContent" && v.rule_type == "required")
}

/// One-sentence description of a configuration.
pub fn explain(config: &CarouselConfig) -> String {
    let mut text = format!(
        "{} carousel \"{}\" showing up to {} {} items sorted by {}",
        capitalize(config.carousel_type.as_str()),
        config.title,
        config.content_limit,
        config.domain,
        config.sort_type,
    );
    match config.carousel_type {
        CarouselType::Automatic => {
            if let Some(field) = &config.domain_value {
                text.push_str(&format!(", filtered by {field}"));
                if let Some(value) = &config.filter_value {
                    text.push_str(&format!(" = {value}"));
                }
            }
        }
        CarouselType::Manual => {
            text.push_str(&format!(
                ", with {} hand-picked items",
                config.selected_content.len()
            ));
        }
        CarouselType::Personalized => {
            if let Some(algorithm) = config.algorithm {
                text.push_str(&format!(", personalized by {algorithm}"));
            }
        }
    }
    text.push_str(&format!(", for {} plans.", config.plan_type));
    text
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Build the system prompt sent to the language model.
///
/// Lists every accepted enum value and the entities the model may reference
/// by id, and asks for bare JSON.
pub fn build_system_prompt(request: &GenerationRequest) -> String {
    let mut prompt = String::from(
        "You configure content carousels for a sports streaming platform. \
         Reply with a single JSON object and nothing else, without markdown fences.\n\n\
         Fields:\n\
         - title: string, short and descriptive, in the user's language\n",
    );
    let enum_line = |name: &str, values: &[&str]| format!("- {name}: one of {}\n", values.join(", "));
    prompt.push_str(&enum_line("layout", VALID_LAYOUTS));
    prompt.push_str(&enum_line("carouselType", VALID_CAROUSEL_TYPES));
    prompt.push_str(&enum_line("domain", VALID_DOMAINS));
    prompt.push_str(&enum_line("sortType", VALID_SORT_TYPES));
    prompt.push_str(&enum_line("planType", VALID_PLAN_TYPES));
    prompt.push_str(&enum_line(
        "algorithm (personalized carousels only)",
        VALID_ALGORITHMS,
    ));
    prompt.push_str(
        "- contentLimit: positive integer\n\
         - status: boolean\n\
         - showMoreButton: boolean\n\
         - domainValue: optional field name to filter automatic carousels by (e.g. team_id)\n\
         - filterValue: optional id matched against domainValue\n\
         - selectedContent: array of ids, only for manual carousels, otherwise omit\n",
    );

    let sections = [
        ("Teams", Domain::Team),
        ("Catalogues", Domain::Catalogue),
        ("Players", Domain::Player),
        ("Championships", Domain::Championship),
        ("Banners", Domain::Banner),
    ];
    for (label, domain) in sections {
        let Some(entities) = request.hints(domain) else {
            continue;
        };
        if entities.is_empty() {
            continue;
        }
        prompt.push_str(&format!("\nAvailable {label} (id: name):\n"));
        for entity in entities {
            prompt.push_str(&format!("- {}: {}\n", entity.id, entity.name));
        }
    }

    prompt.push_str("\nOnly reference ids from the lists above.");
    prompt
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Generator returning a fixed outcome and counting calls.
    pub struct FixedGenerator {
        pub outcome: GenerationResult,
        pub calls: AtomicUsize,
    }

    impl FixedGenerator {
        pub fn new(outcome: GenerationResult) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }

        /// Generator that parses `raw` the way the real endpoint does.
        pub fn from_raw(raw: &str) -> Self {
            Self::new(parse_generated_config(raw).map(|config| GeneratedConfig {
                explanation: explain(&config),
                config,
            }))
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConfigGenerator for FixedGenerator {
        async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            request.check()?;
            self.outcome.clone()
        }
    }
}
