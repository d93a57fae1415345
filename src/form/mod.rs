//! Contact form: inline validation, the submission state machine and the
//! notification banner.
//!
//! # Architecture
//!
//! - `validation`: Field rules (required, email, phone) and their messages
//! - `submission`: `FormData` and the `SubmissionBackend` seam with its simulated default
//! - `notification`: The single transient banner and its fade timers
//!
//! A submit is split in two so the host can keep dispatching events while
//! the backend future is pending:
//!
//! ```rust,ignore
//! if let Some(data) = form.begin_submission(&mut doc, now) {
//!     let result = backend.submit(data).await;
//!     form.complete_submission(&mut doc, result, clock.now_ms());
//! }
//! ```

mod notification;
mod submission;
mod validation;

pub use notification::{NotificationKind, Notifier};
pub use submission::{FormData, SimulatedBackend, SubmissionBackend};
pub use validation::{check_value, is_valid_email, is_valid_phone, FieldError};

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::capability::Clock;
use crate::config::SiteConfig;
use crate::dom::{Document, NodeId, Selector};
use crate::error::{SiteError, SubmitError};

pub const INVALID_FORM_MESSAGE: &str = "Please fix the errors before submitting";
pub const SUCCESS_MESSAGE: &str =
    "Thank you! Your appointment request has been sent successfully. We will contact you soon.";
pub const FAILURE_MESSAGE: &str =
    "Sorry, there was an error sending your request. Please try again or contact us directly.";
pub const BUSY_LABEL: &str = "Sending...";

const ERROR_BORDER: &str = "#ef4444";
const NORMAL_BORDER: &str = "rgba(255, 255, 255, 0.3)";
const ERROR_MESSAGE_CSS: &str =
    "color: #ef4444; font-size: 0.875rem; margin-top: 0.5rem; display: block;";

// Input types that never contribute a value to the submitted field set
const NON_DATA_INPUTS: [&str; 7] = ["submit", "button", "reset", "image", "file", "checkbox", "radio"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
}

/// Result of a full submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid,
    Sent,
    Failed(SubmitError),
    /// A submission was already in flight, or there is no form on the page.
    Ignored,
}

struct SubmitButton {
    node: NodeId,
    saved_label: Option<String>,
}

pub struct ContactForm {
    form: Option<NodeId>,
    button: Option<SubmitButton>,
    fields: Vec<NodeId>,
    state: SubmissionState,
    notifier: Notifier,
    backend: Arc<dyn SubmissionBackend>,
}

impl ContactForm {
    /// Wire blur/input validation for every `.form-group` field and, when a
    /// `.contact-form` exists, the submit flow.
    ///
    /// Fails when the form has no `button[type="submit"]`.
    pub fn new(
        doc: &Document,
        backend: Arc<dyn SubmissionBackend>,
        config: &SiteConfig,
    ) -> Result<Self, SiteError> {
        let fields = doc.query_any(&[
            Selector::tag("input").within(Selector::class("form-group")),
            Selector::tag("select").within(Selector::class("form-group")),
            Selector::tag("textarea").within(Selector::class("form-group")),
        ]);

        let form = doc.query(&Selector::class("contact-form"));
        let button = match form {
            Some(form) => {
                let node = doc
                    .query_in(form, &Selector::tag("button").with_attr_eq("type", "submit"))
                    .ok_or(SiteError::MissingElement("button[type=\"submit\"]"))?;
                Some(SubmitButton {
                    node,
                    saved_label: None,
                })
            }
            None => {
                debug!("No .contact-form on the page, submission disabled");
                None
            }
        };

        Ok(Self {
            form,
            button,
            fields,
            state: SubmissionState::Idle,
            notifier: Notifier::new(config),
            backend,
        })
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn backend(&self) -> Arc<dyn SubmissionBackend> {
        Arc::clone(&self.backend)
    }

    pub fn has_pending_timers(&self) -> bool {
        self.notifier.has_pending()
    }

    pub fn run_timers(&mut self, doc: &mut Document, now_ms: f64) {
        self.notifier.run_due(doc, now_ms);
    }

    pub fn handle_blur(&self, doc: &mut Document, target: NodeId) {
        if self.fields.contains(&target) {
            validate_field(doc, target);
        }
    }

    /// Typing into a field clears its error without re-validating.
    pub fn handle_input(&self, doc: &mut Document, target: NodeId) {
        if self.fields.contains(&target) {
            clear_field_error(doc, target);
        }
    }

    /// Validate every required field and, if all pass, enter `Submitting`
    /// and return the field set to send.
    pub fn begin_submission(&mut self, doc: &mut Document, now_ms: f64) -> Option<FormData> {
        let form = self.form?;
        if self.state == SubmissionState::Submitting {
            debug!("Submission already in flight, ignoring submit");
            return None;
        }

        self.state = SubmissionState::Validating;
        let required = doc.query_any(&[
            Selector::tag("input").with_attr("required"),
            Selector::tag("select").with_attr("required"),
            Selector::tag("textarea").with_attr("required"),
        ]);
        let mut valid = true;
        for field in required {
            if doc.closest(field, &Selector::class("contact-form")) != Some(form) {
                continue;
            }
            // Every field is checked so all errors show at once
            valid &= validate_field(doc, field);
        }

        if !valid {
            self.notifier
                .show(doc, INVALID_FORM_MESSAGE, NotificationKind::Error, now_ms);
            self.state = SubmissionState::Idle;
            return None;
        }

        let data = collect_form_data(doc, form);
        if let Some(button) = self.button.as_mut() {
            button.saved_label = Some(doc.text_content(button.node));
            doc.set_text_content(button.node, BUSY_LABEL);
            doc.set_disabled(button.node, true);
        }
        self.state = SubmissionState::Submitting;
        debug!("Submitting contact form with {} fields", data.len());
        Some(data)
    }

    /// Apply the backend's answer and return to `Idle`.
    pub fn complete_submission(
        &mut self,
        doc: &mut Document,
        result: Result<(), SubmitError>,
        now_ms: f64,
    ) -> SubmitOutcome {
        if self.state != SubmissionState::Submitting {
            return SubmitOutcome::Ignored;
        }

        let outcome = match result {
            Ok(()) => {
                info!("Contact form sent");
                self.notifier
                    .show(doc, SUCCESS_MESSAGE, NotificationKind::Success, now_ms);
                if let Some(form) = self.form {
                    reset_form(doc, form);
                }
                SubmitOutcome::Sent
            }
            Err(e) => {
                error!("Form submission error: {}", e);
                self.notifier
                    .show(doc, FAILURE_MESSAGE, NotificationKind::Error, now_ms);
                SubmitOutcome::Failed(e)
            }
        };

        if let Some(button) = self.button.as_mut() {
            if let Some(label) = button.saved_label.take() {
                doc.set_text_content(button.node, label);
            }
            doc.set_disabled(button.node, false);
        }
        self.state = SubmissionState::Idle;
        outcome
    }

    /// Run a whole submit: validate, send through the backend, apply the
    /// result.
    pub async fn submit(&mut self, doc: &mut Document, clock: &dyn Clock) -> SubmitOutcome {
        if self.form.is_none() || self.state == SubmissionState::Submitting {
            return SubmitOutcome::Ignored;
        }
        let Some(data) = self.begin_submission(doc, clock.now_ms()) else {
            return SubmitOutcome::Invalid;
        };
        let result = self.backend.submit(data).await;
        self.complete_submission(doc, result, clock.now_ms())
    }
}

/// Check one field, replacing any previous error with the current one.
pub fn validate_field(doc: &mut Document, field: NodeId) -> bool {
    clear_field_error(doc, field);
    let input_type = doc.input_type(field);
    let required = doc.has_attr(field, "required");
    match check_value(&input_type, required, doc.value(field)) {
        Ok(()) => true,
        Err(e) => {
            show_field_error(doc, field, e.message());
            false
        }
    }
}

pub fn show_field_error(doc: &mut Document, field: NodeId, message: &str) {
    if let Some(group) = doc.closest(field, &Selector::class("form-group")) {
        let existing = doc.query_in(group, &Selector::class("error-message"));
        let element = match existing {
            Some(element) => element,
            None => doc.element("div").class("error-message").append_to(group),
        };
        doc.set_text_content(element, message);
        doc.set_css_text(element, ERROR_MESSAGE_CSS);
    }
    doc.set_style(field, "border-color", ERROR_BORDER);
}

pub fn clear_field_error(doc: &mut Document, field: NodeId) {
    if let Some(group) = doc.closest(field, &Selector::class("form-group")) {
        if let Some(element) = doc.query_in(group, &Selector::class("error-message")) {
            doc.remove(element);
        }
    }
    doc.set_style(field, "border-color", NORMAL_BORDER);
}

fn is_form_control(doc: &Document, node: NodeId) -> bool {
    matches!(doc.tag(node), "input" | "select" | "textarea")
}

/// Named, enabled controls of `form` with their current values.
pub fn collect_form_data(doc: &Document, form: NodeId) -> FormData {
    let mut data = FormData::new();
    for node in doc.descendants(form) {
        if !is_form_control(doc, node) || doc.is_disabled(node) {
            continue;
        }
        if doc.tag(node) == "input" && NON_DATA_INPUTS.contains(&doc.input_type(node).as_str()) {
            continue;
        }
        match doc.attr(node, "name") {
            Some(name) if !name.is_empty() => data.insert(name, doc.value(node)),
            _ => {}
        }
    }
    data
}

/// Return every control to its initial value.
pub fn reset_form(doc: &mut Document, form: NodeId) {
    for node in doc.descendants(form) {
        let tag = doc.tag(node).to_string();
        match tag.as_str() {
            "input" => {
                if NON_DATA_INPUTS[..4].contains(&doc.input_type(node).as_str()) {
                    continue;
                }
                let initial = doc.attr(node, "value").unwrap_or_default().to_string();
                doc.set_value(node, initial);
            }
            // A textarea's default value is its text, not an attribute
            "textarea" => {
                let initial = doc.text_content(node);
                doc.set_value(node, initial);
            }
            "select" => {
                let initial = initial_option_value(doc, node);
                doc.set_value(node, initial);
            }
            _ => {}
        }
    }
}

fn initial_option_value(doc: &Document, select: NodeId) -> String {
    let options = doc.query_all_in(select, &Selector::tag("option"));
    let chosen = options
        .iter()
        .copied()
        .find(|option| doc.has_attr(*option, "selected"))
        .or_else(|| options.first().copied());
    match chosen {
        Some(option) => doc
            .attr(option, "value")
            .map(str::to_string)
            .unwrap_or_else(|| doc.text_content(option)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::ManualClock;
    use std::time::Duration;

    struct Page {
        doc: Document,
        form: NodeId,
        name: NodeId,
        email: NodeId,
        phone: NodeId,
        service: NodeId,
        message: NodeId,
        button: NodeId,
    }

    fn page() -> Page {
        let mut doc = Document::new();
        let body = doc.body();
        let form = doc.element("form").class("contact-form").append_to(body);

        let group = doc.element("div").class("form-group").append_to(form);
        let name = doc
            .element("input")
            .attr("type", "text")
            .attr("name", "name")
            .attr("required", "")
            .append_to(group);

        let group = doc.element("div").class("form-group").append_to(form);
        let email = doc
            .element("input")
            .attr("type", "email")
            .attr("name", "email")
            .attr("required", "")
            .append_to(group);

        let group = doc.element("div").class("form-group").append_to(form);
        let phone = doc
            .element("input")
            .attr("type", "tel")
            .attr("name", "phone")
            .append_to(group);

        let group = doc.element("div").class("form-group").append_to(form);
        let service = doc
            .element("select")
            .attr("name", "service")
            .attr("required", "")
            .append_to(group);
        doc.element("option").attr("value", "").text("Select a service").append_to(service);
        doc.element("option").attr("value", "cut").text("Cut").append_to(service);

        let group = doc.element("div").class("form-group").append_to(form);
        let message = doc
            .element("textarea")
            .attr("name", "message")
            .append_to(group);

        let button = doc
            .element("button")
            .attr("type", "submit")
            .text("Book Appointment")
            .append_to(form);

        Page {
            doc,
            form,
            name,
            email,
            phone,
            service,
            message,
            button,
        }
    }

    fn fill(p: &mut Page) {
        p.doc.set_value(p.name, "Yuki Tanaka");
        p.doc.set_value(p.email, "yuki@example.com");
        p.doc.set_value(p.phone, "604-555-1234");
        p.doc.set_value(p.service, "cut");
        p.doc.set_value(p.message, "Hello");
    }

    fn contact_form(doc: &Document, backend: SimulatedBackend) -> ContactForm {
        ContactForm::new(doc, Arc::new(backend), &SiteConfig::default()).unwrap()
    }

    fn error_text(doc: &Document, field: NodeId) -> Option<String> {
        let group = doc.closest(field, &Selector::class("form-group"))?;
        doc.query_in(group, &Selector::class("error-message"))
            .map(|e| doc.text_content(e))
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_missing_submit_button_is_an_error() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.element("form").class("contact-form").append_to(body);

        let result = ContactForm::new(
            &doc,
            Arc::new(SimulatedBackend::default()),
            &SiteConfig::default(),
        );
        assert!(matches!(result, Err(SiteError::MissingElement(_))));
    }

    #[test]
    fn test_no_form_ignores_submit() {
        let mut doc = Document::new();
        let mut form = contact_form(&doc, SimulatedBackend::default());
        assert_eq!(form.begin_submission(&mut doc, 0.0), None);
        assert_eq!(form.state(), SubmissionState::Idle);
    }

    // ==================== Field Validation Tests ====================

    #[test]
    fn test_blur_shows_required_error() {
        let mut p = page();
        let form = contact_form(&p.doc, SimulatedBackend::default());

        form.handle_blur(&mut p.doc, p.name);
        assert_eq!(error_text(&p.doc, p.name).as_deref(), Some("This field is required"));
        assert_eq!(p.doc.style(p.name, "border-color"), Some("#ef4444"));
    }

    #[test]
    fn test_error_element_is_reused() {
        let mut p = page();
        let form = contact_form(&p.doc, SimulatedBackend::default());

        p.doc.set_value(p.email, "a@b");
        form.handle_blur(&mut p.doc, p.email);
        form.handle_blur(&mut p.doc, p.email);

        let group = p.doc.closest(p.email, &Selector::class("form-group")).unwrap();
        assert_eq!(p.doc.query_all_in(group, &Selector::class("error-message")).len(), 1);
        assert_eq!(
            error_text(&p.doc, p.email).as_deref(),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn test_input_clears_error_without_revalidating() {
        let mut p = page();
        let form = contact_form(&p.doc, SimulatedBackend::default());
        p.doc.set_value(p.phone, "12345");
        form.handle_blur(&mut p.doc, p.phone);
        assert!(error_text(&p.doc, p.phone).is_some());

        // Still invalid, but typing clears the message
        p.doc.set_value(p.phone, "123456");
        form.handle_input(&mut p.doc, p.phone);
        assert_eq!(error_text(&p.doc, p.phone), None);
        assert_eq!(p.doc.style(p.phone, "border-color"), Some(NORMAL_BORDER));
    }

    #[test]
    fn test_valid_blur_clears_previous_error() {
        let mut p = page();
        let form = contact_form(&p.doc, SimulatedBackend::default());
        form.handle_blur(&mut p.doc, p.email);
        p.doc.set_value(p.email, "a@b.co");
        form.handle_blur(&mut p.doc, p.email);
        assert_eq!(error_text(&p.doc, p.email), None);
    }

    // ==================== Submission Tests ====================

    #[test]
    fn test_invalid_submit_stays_idle() {
        let mut p = page();
        let mut form = contact_form(&p.doc, SimulatedBackend::default());

        assert_eq!(form.begin_submission(&mut p.doc, 0.0), None);
        assert_eq!(form.state(), SubmissionState::Idle);
        assert!(error_text(&p.doc, p.name).is_some());
        assert!(error_text(&p.doc, p.email).is_some());
        assert!(error_text(&p.doc, p.service).is_some());
        // Optional fields stay clean
        assert_eq!(error_text(&p.doc, p.phone), None);

        let banner = notification::current(&p.doc).unwrap();
        assert_eq!(p.doc.text_content(banner), INVALID_FORM_MESSAGE);
        assert!(p.doc.has_class(banner, "notification-error"));
        assert!(!p.doc.is_disabled(p.button));
    }

    #[test]
    fn test_begin_submission_marks_button_busy() {
        let mut p = page();
        fill(&mut p);
        let mut form = contact_form(&p.doc, SimulatedBackend::default());

        let data = form.begin_submission(&mut p.doc, 0.0).unwrap();
        assert_eq!(data.get("email"), Some("yuki@example.com"));
        assert_eq!(data.get("service"), Some("cut"));
        assert_eq!(data.len(), 5);
        assert_eq!(form.state(), SubmissionState::Submitting);
        assert_eq!(p.doc.text_content(p.button), BUSY_LABEL);
        assert!(p.doc.is_disabled(p.button));

        // A second submit while one is in flight is ignored
        assert_eq!(form.begin_submission(&mut p.doc, 10.0), None);
        assert_eq!(form.state(), SubmissionState::Submitting);
    }

    #[test]
    fn test_complete_success_resets_form() {
        let mut p = page();
        fill(&mut p);
        let mut form = contact_form(&p.doc, SimulatedBackend::default());
        form.begin_submission(&mut p.doc, 0.0).unwrap();

        let outcome = form.complete_submission(&mut p.doc, Ok(()), 2000.0);
        assert_eq!(outcome, SubmitOutcome::Sent);
        assert_eq!(p.doc.value(p.name), "");
        assert_eq!(p.doc.value(p.service), "");
        assert_eq!(p.doc.text_content(p.button), "Book Appointment");
        assert!(!p.doc.is_disabled(p.button));
        assert_eq!(form.state(), SubmissionState::Idle);

        let banner = notification::current(&p.doc).unwrap();
        assert!(p.doc.has_class(banner, "notification-success"));
    }

    #[test]
    fn test_complete_failure_keeps_values() {
        let mut p = page();
        fill(&mut p);
        let mut form = contact_form(&p.doc, SimulatedBackend::default());
        form.begin_submission(&mut p.doc, 0.0).unwrap();

        let err = SubmitError::Network("timeout".into());
        let outcome = form.complete_submission(&mut p.doc, Err(err.clone()), 2000.0);
        assert_eq!(outcome, SubmitOutcome::Failed(err));
        assert_eq!(p.doc.value(p.email), "yuki@example.com");
        assert_eq!(p.doc.text_content(p.button), "Book Appointment");
        assert!(!p.doc.is_disabled(p.button));

        let banner = notification::current(&p.doc).unwrap();
        assert_eq!(p.doc.text_content(banner), FAILURE_MESSAGE);
    }

    #[test]
    fn test_complete_without_begin_is_ignored() {
        let mut p = page();
        let mut form = contact_form(&p.doc, SimulatedBackend::default());
        assert_eq!(
            form.complete_submission(&mut p.doc, Ok(()), 0.0),
            SubmitOutcome::Ignored
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_end_to_end_success() {
        let mut p = page();
        fill(&mut p);
        let clock = ManualClock::new();
        let mut form = contact_form(&p.doc, SimulatedBackend::always_succeed(Duration::from_secs(2)));

        let outcome = form.submit(&mut p.doc, &clock).await;
        assert_eq!(outcome, SubmitOutcome::Sent);
        assert_eq!(p.doc.value(p.message), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_invalid_never_calls_backend() {
        let mut p = page();
        let clock = ManualClock::new();
        let mut form = contact_form(&p.doc, SimulatedBackend::always_fail(Duration::from_secs(2)));

        assert_eq!(form.submit(&mut p.doc, &clock).await, SubmitOutcome::Invalid);
    }

    // ==================== Reset Tests ====================

    #[test]
    fn test_reset_restores_initial_values() {
        let mut doc = Document::new();
        let body = doc.body();
        let form = doc.element("form").append_to(body);
        let input = doc.element("input").value("preset").append_to(form);
        let notes = doc.element("textarea").text("Any time after 5pm").append_to(form);
        let select = doc.element("select").append_to(form);
        doc.element("option").attr("value", "a").append_to(select);
        doc.element("option").attr("value", "b").attr("selected", "").append_to(select);
        let submit = doc.element("input").attr("type", "submit").value("Go").append_to(form);

        doc.set_value(input, "typed");
        doc.set_value(notes, "Mornings only");
        doc.set_value(select, "a");
        doc.set_value(submit, "Sending...");
        reset_form(&mut doc, form);

        assert_eq!(doc.value(input), "preset");
        assert_eq!(doc.value(notes), "Any time after 5pm");
        assert_eq!(doc.value(select), "b");
        assert_eq!(doc.value(submit), "Sending...");
    }

    #[test]
    fn test_form_data_skips_disabled_and_unnamed() {
        let mut p = page();
        fill(&mut p);
        p.doc.set_disabled(p.message, true);
        let body = p.doc.body();
        let stray = p.doc.element("input").attr("name", "stray").append_to(body);
        p.doc.set_value(stray, "x");
        let form = p.form;
        p.doc.element("input").append_to(form);

        let data = collect_form_data(&p.doc, p.form);
        assert_eq!(data.get("message"), None);
        assert_eq!(data.get("stray"), None);
        assert_eq!(data.len(), 4);
    }
}
