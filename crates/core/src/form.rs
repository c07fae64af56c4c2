//! Carousel form workflow.
//!
//! State machine:
//!
//! ```text
//! Editing --generate--> Editing
//! Editing --submit (valid)--> Submitting --ok--> Closed
//!                                        \--err--> Editing (prior config restored)
//! Editing --submit (invalid)--> Editing (field errors recorded)
//! Editing --cancel--> Closed
//! ```

use async_trait::async_trait;

use crate::carousel::{CarouselConfig, CarouselType};
use crate::generation::{ConfigGenerator, GenerationError, GenerationRequest, GenerationResult};
use crate::types::{ContentId, DbId};
use crate::validation::{validate, FieldViolation};

/// Lifecycle state of a [`CarouselForm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitting,
    Closed,
}

impl FormState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::Submitting => "submitting",
            Self::Closed => "closed",
        }
    }
}

/// The persistence collaborator failed to store a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// The configuration clashes with an already stored one.
    #[error("{0}")]
    Conflict(String),

    /// The store refused the values themselves (a constraint the form
    /// validation does not cover).
    #[error("{0}")]
    Rejected(String),

    /// The store was unreachable or failed for reasons unrelated to the
    /// submitted values.
    #[error("{0}")]
    Unavailable(String),
}

/// Stores a validated configuration and returns its id.
#[async_trait]
pub trait CarouselStore: Send + Sync {
    async fn persist(&self, config: &CarouselConfig) -> Result<DbId, PersistenceError>;
}

/// Errors surfaced by form actions. None of them close the form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    /// Field-level problems; shown inline next to the fields.
    #[error("Validation failed on {} field(s)", .0.len())]
    ValidationFailed(Vec<FieldViolation>),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Failed to save carousel: {0}")]
    PersistenceFailed(PersistenceError),

    #[error("Cannot {action} while the form is {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },
}

/// In-memory carousel form. Owns the configuration until it is handed to a
/// [`CarouselStore`] or discarded.
#[derive(Debug)]
pub struct CarouselForm {
    state: FormState,
    config: CarouselConfig,
    field_errors: Vec<FieldViolation>,
    generating: bool,
    explanation: Option<String>,
    notice: Option<String>,
}

impl Default for CarouselForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CarouselForm {
    /// Empty form with default values.
    pub fn new() -> Self {
        Self::from_config(CarouselConfig::default())
    }

    /// Form pre-filled with an existing configuration (editing a stored
    /// carousel).
    pub fn from_config(config: CarouselConfig) -> Self {
        Self {
            state: FormState::Editing,
            config,
            field_errors: Vec::new(),
            generating: false,
            explanation: None,
            notice: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Inline field errors from the last submit attempt.
    pub fn field_errors(&self) -> &[FieldViolation] {
        &self.field_errors
    }

    /// Whether a generation call is in flight.
    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Explanation attached to the last applied draft.
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Last user-visible failure message.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Read-only snapshot of the manual selection, for the selector.
    pub fn selection(&self) -> &[ContentId] {
        &self.config.selected_content
    }

    fn ensure_editing(&self, action: &'static str) -> Result<(), FormError> {
        if self.state == FormState::Editing {
            Ok(())
        } else {
            Err(FormError::InvalidState {
                action,
                state: self.state.as_str(),
            })
        }
    }

    /// Apply an arbitrary field edit.
    pub fn edit(&mut self, apply: impl FnOnce(&mut CarouselConfig)) -> Result<(), FormError> {
        self.ensure_editing("edit")?;
        apply(&mut self.config);
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), FormError> {
        let title = title.into();
        self.edit(|config| config.title = title)
    }

    /// Change the carousel type. Leaving `manual` drops the selection so it
    /// is only ever populated for manual carousels.
    pub fn set_carousel_type(&mut self, carousel_type: CarouselType) -> Result<(), FormError> {
        self.ensure_editing("edit")?;
        self.config.carousel_type = carousel_type;
        if carousel_type != CarouselType::Manual {
            self.config.selected_content.clear();
        }
        Ok(())
    }

    /// Update callback handed to the selector.
    pub fn update_selection(&mut self, selection: Vec<ContentId>) -> Result<(), FormError> {
        self.ensure_editing("change the selection")?;
        self.config.selected_content = selection;
        Ok(())
    }

    /// Ask the generator for a draft and apply it on success.
    ///
    /// On failure the current configuration is left untouched and a
    /// user-visible notice is recorded. The busy flag is cleared even when
    /// the returned future is dropped before completion.
    pub async fn generate(
        &mut self,
        generator: &dyn ConfigGenerator,
        request: &GenerationRequest,
    ) -> Result<(), FormError> {
        self.begin_generate(request)?;
        let guard = GeneratingGuard(self);
        let outcome = generator.generate(request).await;
        guard.finish(outcome)
    }

    /// Mark a generation call as in flight.
    ///
    /// Callers driving the generator themselves pair this with
    /// [`finish_generate`](Self::finish_generate); the busy flag stays set
    /// in between.
    pub fn begin_generate(&mut self, request: &GenerationRequest) -> Result<(), FormError> {
        self.ensure_editing("generate")?;
        if self.generating {
            return Err(FormError::InvalidState {
                action: "generate",
                state: "generating",
            });
        }
        if let Err(err) = request.check() {
            self.notice = Some(err.user_message());
            return Err(err.into());
        }
        self.generating = true;
        Ok(())
    }

    /// Clear the busy flag and apply the generator's outcome.
    pub fn finish_generate(&mut self, outcome: GenerationResult) -> Result<(), FormError> {
        if !self.generating {
            return Err(FormError::InvalidState {
                action: "apply a generated draft",
                state: "idle",
            });
        }
        self.generating = false;

        let generated = match outcome {
            Ok(generated) => generated,
            Err(err) => {
                tracing::warn!(error = %err, "Carousel generation failed");
                self.notice = Some(err.user_message());
                return Err(err.into());
            }
        };

        let mut draft = generated.config;
        if draft.is_manual() && draft.selected_content.is_empty() && self.config.is_manual() {
            draft.selected_content = self.config.selected_content.clone();
        }

        if let Err(violations) = validate(&draft) {
            let detail = violations
                .iter()
                .map(|v| format!("{}: {}", v.field, v.message))
                .collect::<Vec<_>>()
                .join("; ");
            tracing::warn!(%detail, "Generated draft failed validation");
            let err = GenerationError::MalformedResponse(detail);
            self.notice = Some(err.user_message());
            return Err(err.into());
        }

        tracing::debug!(
            domain = %draft.domain,
            carousel_type = %draft.carousel_type,
            "Applied generated draft",
        );
        self.config = draft;
        self.explanation = Some(generated.explanation);
        self.field_errors.clear();
        self.notice = None;
        Ok(())
    }

    /// Validate and hand the configuration to `store`.
    ///
    /// The store is only called when validation passes.
    pub async fn submit(&mut self, store: &dyn CarouselStore) -> Result<DbId, FormError> {
        self.ensure_editing("submit")?;

        if let Err(violations) = validate(&self.config) {
            self.field_errors = violations.clone();
            return Err(FormError::ValidationFailed(violations));
        }
        self.field_errors.clear();

        self.state = FormState::Submitting;
        let prior = self.config.clone();

        match store.persist(&self.config).await {
            Ok(id) => {
                tracing::info!(carousel_id = id, title = %self.config.title, "Carousel saved");
                self.state = FormState::Closed;
                self.notice = None;
                Ok(id)
            }
            Err(err) => {
                tracing::error!(error = %err, "Carousel persistence failed");
                self.config = prior;
                self.state = FormState::Editing;
                let err = FormError::PersistenceFailed(err);
                self.notice = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Discard the form.
    pub fn cancel(&mut self) {
        self.state = FormState::Closed;
        self.config = CarouselConfig::default();
        self.field_errors.clear();
        self.generating = false;
        self.explanation = None;
        self.notice = None;
    }
}

/// Resets the busy flag when generation ends, including by cancellation.
struct GeneratingGuard<'a>(&'a mut CarouselForm);

impl GeneratingGuard<'_> {
    fn finish(self, outcome: GenerationResult) -> Result<(), FormError> {
        self.0.finish_generate(outcome)
    }
}

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        self.0.generating = false;
    }
}
