//! Join-form validation and the simulated submission sequence.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{ElementId, Intent},
    error::{FormField, ValidationError},
};
use tracing::{debug, info, warn};

use crate::{
    port::{PresentationPort, Scheduler},
    surface::Surface,
    timers::TimerKind,
};

pub const NAME_MIN_CHARS: usize = 2;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("email pattern compiles"));

/// How many failing rules are surfaced per attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    #[default]
    FirstError,
    AllErrors,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignupFields {
    pub name: String,
    pub email: String,
    pub intent: String,
}

impl SignupFields {
    pub fn new(name: impl Into<String>, email: impl Into<String>, intent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            intent: intent.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signup {
    pub name: String,
    pub email: String,
    pub intent: Intent,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Checks name, then email, then intent. Under `FirstError` only the first
/// failing rule is returned.
pub fn validate(fields: &SignupFields, policy: ValidationPolicy) -> Result<Signup, Vec<ValidationError>> {
    let name = fields.name.trim();
    let email = fields.email.trim();
    let mut errors = Vec::new();

    if name.is_empty() {
        errors.push(ValidationError::NameRequired);
    } else if name.chars().count() < NAME_MIN_CHARS {
        errors.push(ValidationError::NameTooShort {
            min: NAME_MIN_CHARS,
        });
    }

    if email.is_empty() {
        errors.push(ValidationError::EmailRequired);
    } else if !is_valid_email(email) {
        errors.push(ValidationError::EmailInvalid);
    }

    let intent = fields.intent.parse::<Intent>().ok();
    if intent.is_none() {
        errors.push(ValidationError::IntentRequired);
    }

    match (intent, errors.is_empty()) {
        (Some(intent), true) => Ok(Signup {
            name: name.to_string(),
            email: email.to_string(),
            intent,
        }),
        _ => {
            if policy == ValidationPolicy::FirstError {
                errors.truncate(1);
            }
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FormState {
    pub fields: SignupFields,
    pub validation_errors: Vec<ValidationError>,
    pub phase: SubmissionPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(Vec<ValidationError>),
    Submitting(Signup),
    /// A submission is already in flight.
    Busy,
}

#[derive(Debug)]
pub(crate) struct JoinForm {
    form: ElementId,
    button: Option<ElementId>,
    name: Option<ElementId>,
    email: Option<ElementId>,
    intent: Option<ElementId>,
    state: FormState,
    error_nodes: Vec<ElementId>,
    decorated: Vec<ElementId>,
}

impl JoinForm {
    pub(crate) fn new(
        form: ElementId,
        button: Option<ElementId>,
        name: Option<ElementId>,
        email: Option<ElementId>,
        intent: Option<ElementId>,
    ) -> Self {
        Self {
            form,
            button,
            name,
            email,
            intent,
            state: FormState::default(),
            error_nodes: Vec::new(),
            decorated: Vec::new(),
        }
    }

    pub(crate) fn state(&self) -> &FormState {
        &self.state
    }

    pub(crate) fn submit<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>) -> SubmitOutcome {
        if matches!(
            self.state.phase,
            SubmissionPhase::Submitting | SubmissionPhase::Success
        ) {
            debug!(phase = ?self.state.phase, "form: submission already in flight");
            return SubmitOutcome::Busy;
        }

        self.state.phase = SubmissionPhase::Validating;
        self.state.fields = self.read_fields(&surface.port);
        self.clear_errors(surface);

        match validate(&self.state.fields, surface.config.validation_policy) {
            Err(errors) => {
                self.state.phase = SubmissionPhase::Error;
                self.state.validation_errors = errors.clone();
                self.show_errors(surface, &errors);
                let dismiss_ms = surface.config.error_dismiss_ms;
                surface.arm(TimerKind::FormErrorDismiss, dismiss_ms);
                info!(
                    errors = errors.len(),
                    first = %errors[0],
                    "form: validation failed"
                );
                self.state.phase = SubmissionPhase::Idle;
                SubmitOutcome::Rejected(errors)
            }
            Ok(signup) => {
                self.state.validation_errors.clear();
                self.state.phase = SubmissionPhase::Submitting;
                if let Some(button) = self.button {
                    let busy = surface.config.labels.busy.clone();
                    surface.port.set_text(button, &busy);
                    surface.port.set_attribute(button, "disabled", Some(""));
                    surface.port.set_class(button, "loading", true);
                }
                let latency_ms = surface.config.submit_latency_ms;
                surface.arm(TimerKind::SubmitLatency, latency_ms);
                debug!(intent = signup.intent.as_str(), "form: submitting");
                SubmitOutcome::Submitting(signup)
            }
        }
    }

    pub(crate) fn on_latency_elapsed<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>) {
        if self.state.phase != SubmissionPhase::Submitting {
            return;
        }
        self.state.phase = SubmissionPhase::Success;
        if let Some(button) = self.button {
            let success = surface.config.labels.success.clone();
            surface.port.set_attribute(button, "disabled", None);
            surface.port.set_class(button, "loading", false);
            surface.port.set_text(button, &success);
            surface
                .port
                .set_style(button, "background-color", Some("var(--color-success)"));
        }
        let reset_ms = surface.config.success_reset_ms;
        surface.arm(TimerKind::SuccessReset, reset_ms);
        info!(event = "signup_success", "form: submission succeeded");
    }

    /// Resets the form after success. Returns true when the modal should open.
    pub(crate) fn on_success_reset<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>) -> bool {
        if self.state.phase != SubmissionPhase::Success {
            return false;
        }
        surface.port.reset_form(self.form);
        if let Some(button) = self.button {
            let idle = surface.config.labels.idle.clone();
            surface.port.set_text(button, &idle);
            surface.port.set_style(button, "background-color", None);
        }
        self.clear_errors(surface);
        self.state = FormState::default();
        debug!("form: reset after success");
        true
    }

    pub(crate) fn clear_errors<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>) {
        surface.disarm(TimerKind::FormErrorDismiss);
        for node in self.error_nodes.drain(..) {
            surface.port.remove_element(node);
        }
        for field in self.decorated.drain(..) {
            surface.port.set_style(field, "border-color", None);
            surface.port.set_style(field, "background-color", None);
        }
    }

    /// Cancels an in-flight submission and restores the submit control.
    pub(crate) fn abort<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>) {
        surface.disarm(TimerKind::SubmitLatency);
        surface.disarm(TimerKind::SuccessReset);
        self.clear_errors(surface);
        if let Some(button) = self.button {
            let idle = surface.config.labels.idle.clone();
            surface.port.set_attribute(button, "disabled", None);
            surface.port.set_class(button, "loading", false);
            surface.port.set_text(button, &idle);
            surface.port.set_style(button, "background-color", None);
        }
        self.state.phase = SubmissionPhase::Idle;
    }

    fn read_fields<P: PresentationPort>(&self, port: &P) -> SignupFields {
        let read = |element: Option<ElementId>| {
            element
                .map(|element| port.field_value(element))
                .unwrap_or_default()
        };
        SignupFields {
            name: read(self.name),
            email: read(self.email),
            intent: read(self.intent),
        }
    }

    fn field_element(&self, field: FormField) -> Option<ElementId> {
        match field {
            FormField::Name => self.name,
            FormField::Email => self.email,
            FormField::Intent => self.intent,
        }
    }

    fn show_errors<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>, errors: &[ValidationError]) {
        for error in errors {
            let field = self.field_element(error.field());
            if let Some(field) = field {
                surface
                    .port
                    .set_style(field, "border-color", Some("var(--color-error)"));
                surface.port.set_style(
                    field,
                    "background-color",
                    Some("rgba(255, 59, 48, 0.1)"),
                );
                self.decorated.push(field);
            }
            let anchor = field.unwrap_or(self.form);
            match surface.port.insert_form_error(anchor, &error.to_string()) {
                Ok(node) => self.error_nodes.push(node),
                Err(err) => warn!("form: error message could not be rendered: {err}"),
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
