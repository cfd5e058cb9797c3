//! Form submission controller
//!
//! [`SubmissionController`] drives one form through
//!
//! ```text
//! Idle -> Validating -> Invalid ----------------------------> Idle
//!                    -> Submitting -> Success | ServerError
//!                                     | NetworkError ------> Idle
//! ```
//!
//! It talks to the page through two seams: a [`FormView`] that reads fields
//! and applies [`FieldAnnotation`]s, and a [`SubmitTransport`] that sends the
//! request. Both are implemented over the DOM and `fetch` in `formkit-pages`
//! and in memory by [`crate::testing`].

use crate::annotation::FieldAnnotation;
use crate::callback::Callback;
use crate::context::{PageContext, ToastKind};
use crate::error::{FormError, FormResult, TransportError};
use crate::field::Field;
use crate::snapshot::FormSnapshot;
use crate::state_cache::CachedState;
use crate::validators::{FieldEvent, FieldValidator, RealtimeAction, ValidationResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Name of the header carrying the CSRF token.
pub const CSRF_HEADER_NAME: &str = "X-CSRFToken";

/// Name of the hidden input holding the CSRF token.
pub const CSRF_FORM_FIELD: &str = "csrfmiddlewaretoken";

/// Where a submission attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
	Idle,
	Validating,
	Invalid,
	Submitting,
	Success,
	ServerError,
	NetworkError,
}

impl SubmissionState {
	/// Whether `next` is a legal successor.
	pub fn can_transition_to(self, next: SubmissionState) -> bool {
		use SubmissionState::*;
		matches!(
			(self, next),
			(Idle, Validating)
				| (Validating, Invalid)
				| (Validating, Submitting)
				| (Submitting, Success)
				| (Submitting, ServerError)
				| (Submitting, NetworkError)
				| (Invalid, Idle)
				| (Success, Idle)
				| (ServerError, Idle)
				| (NetworkError, Idle)
		)
	}
}

/// An outgoing submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
	/// Upper-cased HTTP method
	pub method: String,
	pub url: String,
	/// Empty when the form carries no token
	pub csrf_token: String,
	pub body: FormSnapshot,
}

impl SubmitRequest {
	/// Request headers, in send order.
	pub fn headers(&self) -> [(&'static str, &str); 2] {
		[
			("Content-Type", "application/json"),
			(CSRF_HEADER_NAME, self.csrf_token.as_str()),
		]
	}
}

/// Response of the submission endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitResponse {
	pub success: bool,
	pub message: Option<String>,
	/// Field name → messages
	pub errors: BTreeMap<String, Vec<String>>,
}

impl SubmitResponse {
	/// A successful response with an optional message.
	pub fn ok(message: Option<&str>) -> Self {
		Self {
			success: true,
			message: message.map(str::to_string),
			errors: BTreeMap::new(),
		}
	}

	/// A rejected response with field errors.
	pub fn rejected<I, K>(message: Option<&str>, errors: I) -> Self
	where
		I: IntoIterator<Item = (K, Vec<String>)>,
		K: Into<String>,
	{
		Self {
			success: false,
			message: message.map(str::to_string),
			errors: errors.into_iter().map(|(k, v)| (k.into(), v)).collect(),
		}
	}

	fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
		self.message
			.as_deref()
			.filter(|m| !m.is_empty())
			.unwrap_or(fallback)
	}
}

/// Sends a submission request.
///
/// Transport failures and undecodable bodies are both reported as
/// [`TransportError`].
#[async_trait(?Send)]
pub trait SubmitTransport {
	async fn send(&self, request: &SubmitRequest) -> Result<SubmitResponse, TransportError>;
}

/// The form as the controller sees it.
pub trait FormView {
	/// Validatable fields in document order.
	fn fields(&self) -> Vec<Field>;

	fn field(&self, name: &str) -> Option<Field> {
		self.fields().into_iter().find(|f| f.name == name)
	}

	/// Current name → value mapping.
	fn snapshot(&self) -> FormSnapshot;

	/// Applies an annotation to the named field.
	fn present(&self, name: &str, annotation: &FieldAnnotation);

	/// Sets or removes the submit-error flag.
	fn mark_submit_error(&self, name: &str, flagged: bool);

	fn focus_field(&self, name: &str, scroll: bool);

	/// Enters (`Some(label)`) or leaves (`None`) the loading state.
	///
	/// Leaving restores the submit button's original label, falling back to
	/// `default_label`.
	fn set_loading(&self, loading_label: Option<&str>, default_label: &str);

	fn reset(&self);

	fn clear_all_errors(&self);

	fn scroll_to_top(&self);

	fn csrf_token(&self) -> Option<String>;

	fn action(&self) -> Option<String>;

	fn method(&self) -> Option<String>;

	/// Fallback URL when the form has no action.
	fn current_path(&self) -> String;
}

/// How a submission attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
	/// Client-side validation failed for these fields.
	Invalid(Vec<String>),
	Success(SubmitResponse),
	ServerError(SubmitResponse),
	NetworkError(TransportError),
}

impl SubmissionOutcome {
	/// The terminal state this outcome corresponds to.
	pub fn state(&self) -> SubmissionState {
		match self {
			Self::Invalid(_) => SubmissionState::Invalid,
			Self::Success(_) => SubmissionState::Success,
			Self::ServerError(_) => SubmissionState::ServerError,
			Self::NetworkError(_) => SubmissionState::NetworkError,
		}
	}
}

/// Validates and submits one form.
pub struct SubmissionController<V: FormView, T: SubmitTransport> {
	validator: FieldValidator,
	view: V,
	transport: T,
	context: PageContext,
	state: Cell<SubmissionState>,
	/// Set while the controller presents annotations or moves focus.
	presenting: Cell<bool>,
	cache: RefCell<Option<Rc<dyn CachedState>>>,
	on_success: RefCell<Option<Callback<SubmitResponse>>>,
	on_error: RefCell<Option<Callback<SubmitResponse>>>,
}

impl<V: FormView, T: SubmitTransport> fmt::Debug for SubmissionController<V, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SubmissionController")
			.field("validator", &self.validator)
			.field("state", &self.state.get())
			.finish_non_exhaustive()
	}
}

impl<V: FormView, T: SubmitTransport> SubmissionController<V, T> {
	pub fn new(validator: FieldValidator, view: V, transport: T, context: PageContext) -> Self {
		Self {
			validator,
			view,
			transport,
			context,
			state: Cell::new(SubmissionState::Idle),
			presenting: Cell::new(false),
			cache: RefCell::new(None),
			on_success: RefCell::new(None),
			on_error: RefCell::new(None),
		}
	}

	/// Cached state to discard when a submission succeeds with
	/// `reset_on_success`.
	pub fn with_cache(self, cache: Rc<dyn CachedState>) -> Self {
		self.cache.replace(Some(cache));
		self
	}

	pub fn set_on_success(&self, callback: Callback<SubmitResponse>) {
		self.on_success.replace(Some(callback));
	}

	pub fn set_on_error(&self, callback: Callback<SubmitResponse>) {
		self.on_error.replace(Some(callback));
	}

	pub fn state(&self) -> SubmissionState {
		self.state.get()
	}

	pub fn view(&self) -> &V {
		&self.view
	}

	pub fn validator(&self) -> &FieldValidator {
		&self.validator
	}

	fn transition(&self, next: SubmissionState) {
		let current = self.state.get();
		debug_assert!(
			current.can_transition_to(next),
			"illegal submission transition {:?} -> {:?}",
			current,
			next
		);
		tracing::debug!(from = ?current, to = ?next, "submission state");
		self.state.set(next);
	}

	/// Runs `f` with realtime events suppressed.
	///
	/// Focusing a control fires its `focus` event synchronously, inside `f`.
	fn while_presenting<R>(&self, f: impl FnOnce() -> R) -> R {
		let outer = self.presenting.replace(true);
		let result = f();
		self.presenting.set(outer);
		result
	}

	/// Reacts to a realtime field event.
	///
	/// Events raised by the controller's own focus moves are ignored.
	pub fn handle_field_event(&self, name: &str, event: FieldEvent) -> Option<FieldAnnotation> {
		if self.presenting.get() {
			return None;
		}
		let field = self.view.field(name)?;
		let annotation = match self.validator.realtime_action(&field, event) {
			RealtimeAction::Validate => self.validator.check(&field).1,
			RealtimeAction::Clear => self.validator.clear(&field),
			RealtimeAction::Ignore => return None,
		};
		self.while_presenting(|| self.view.present(name, &annotation));
		Some(annotation)
	}

	/// Validates one field now and applies the result.
	pub fn validate_field(&self, name: &str) -> Option<bool> {
		let field = self.view.field(name)?;
		let (result, annotation) = self.validator.check(&field);
		self.while_presenting(|| self.view.present(name, &annotation));
		Some(result.valid)
	}

	/// Validates every field, flags the invalid ones and focuses the first.
	///
	/// Returns the names of the invalid fields.
	pub fn validate_form(&self) -> Vec<String> {
		self.while_presenting(|| self.validate_all())
	}

	fn validate_all(&self) -> Vec<String> {
		let mut invalid = Vec::new();
		for field in self.view.fields() {
			let (result, annotation) = self.validator.check(&field);
			self.view.present(&field.name, &annotation);
			if !result.valid {
				self.view.mark_submit_error(&field.name, true);
				invalid.push(field.name);
			}
		}

		if self.validator.settings().scroll_to_error
			&& let Some(first) = invalid.first()
		{
			self.view.focus_field(first, true);
		}
		invalid
	}

	fn build_request(&self) -> SubmitRequest {
		let method = self
			.view
			.method()
			.filter(|m| !m.trim().is_empty())
			.map(|m| m.trim().to_ascii_uppercase())
			.unwrap_or_else(|| "POST".to_string());
		let url = self
			.view
			.action()
			.filter(|a| !a.trim().is_empty())
			.unwrap_or_else(|| self.view.current_path());

		SubmitRequest {
			method,
			url,
			csrf_token: self.view.csrf_token().unwrap_or_default(),
			body: self.view.snapshot(),
		}
	}

	/// Runs one submission attempt.
	///
	/// Fails only with [`FormError::SubmissionInProgress`] when an attempt
	/// is already running; every other outcome is reported as a
	/// [`SubmissionOutcome`] and leaves the controller `Idle`.
	pub async fn submit(&self) -> FormResult<SubmissionOutcome> {
		if self.state.get() != SubmissionState::Idle {
			return Err(FormError::SubmissionInProgress);
		}
		self.transition(SubmissionState::Validating);

		let invalid = self.validate_form();
		if !invalid.is_empty() {
			self.transition(SubmissionState::Invalid);
			self.transition(SubmissionState::Idle);
			return Ok(SubmissionOutcome::Invalid(invalid));
		}

		self.transition(SubmissionState::Submitting);
		let request = self.build_request();
		let messages = &self.validator.settings().messages;

		self.view
			.set_loading(Some(&messages.loading_label), &messages.submit_label);
		let sent = self.transport.send(&request).await;
		self.view.set_loading(None, &messages.submit_label);

		let outcome = match sent {
			Ok(response) if response.success => self.handle_success(response),
			Ok(response) => self.handle_rejection(response),
			Err(e) => self.handle_network_error(e),
		};
		self.transition(outcome.state());
		self.transition(SubmissionState::Idle);
		Ok(outcome)
	}

	fn handle_success(&self, response: SubmitResponse) -> SubmissionOutcome {
		let settings = self.validator.settings();
		self.context.notifier.notify(
			ToastKind::Success,
			response.message_or(&settings.messages.submit_success),
		);

		if settings.reset_on_success {
			self.view.reset();
			self.view.clear_all_errors();
			if let Some(cache) = self.cache.borrow().as_ref()
				&& let Err(e) = cache.clear_state()
			{
				tracing::warn!(error = %e, "could not clear saved form state");
			}
		}

		if let Some(callback) = self.on_success.borrow().clone() {
			callback.call(response.clone());
		}
		self.view.scroll_to_top();
		SubmissionOutcome::Success(response)
	}

	fn handle_rejection(&self, response: SubmitResponse) -> SubmissionOutcome {
		self.context.notifier.notify(
			ToastKind::Error,
			response.message_or(&self.validator.settings().messages.submit_error),
		);

		for (name, messages) in &response.errors {
			let Some(field) = self.view.field(name) else {
				tracing::debug!(field = %name, "server error for unknown field");
				continue;
			};
			let result = ValidationResult::invalid(messages.join(", "));
			let annotation = match self.validator.annotate(&field, &result) {
				FieldAnnotation::Error { message, error_id, .. } => FieldAnnotation::Error {
					message,
					error_id,
					focus: false,
					scroll: false,
				},
				hidden => hidden,
			};
			self.while_presenting(|| self.view.present(name, &annotation));
			self.view.mark_submit_error(name, true);
		}

		if let Some(callback) = self.on_error.borrow().clone() {
			callback.call(response.clone());
		}
		SubmissionOutcome::ServerError(response)
	}

	fn handle_network_error(&self, error: TransportError) -> SubmissionOutcome {
		tracing::error!(error = %error, "form submission failed");
		self.context.notifier.notify(
			ToastKind::Error,
			&self.validator.settings().messages.network_error,
		);
		SubmissionOutcome::NetworkError(error)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{MemoryForm, RecordingNotifier, StubTransport};
	use rstest::rstest;

	fn controller(
		form: MemoryForm,
		transport: StubTransport,
	) -> (SubmissionController<MemoryForm, StubTransport>, Rc<RecordingNotifier>) {
		let notifier = Rc::new(RecordingNotifier::default());
		let context = PageContext::new(notifier.clone());
		(
			SubmissionController::new(FieldValidator::default(), form, transport, context),
			notifier,
		)
	}

	#[rstest]
	#[case(SubmissionState::Idle, SubmissionState::Validating, true)]
	#[case(SubmissionState::Validating, SubmissionState::Submitting, true)]
	#[case(SubmissionState::Submitting, SubmissionState::NetworkError, true)]
	#[case(SubmissionState::Success, SubmissionState::Idle, true)]
	#[case(SubmissionState::Idle, SubmissionState::Submitting, false)]
	#[case(SubmissionState::Invalid, SubmissionState::Submitting, false)]
	#[case(SubmissionState::Success, SubmissionState::ServerError, false)]
	fn test_transitions(
		#[case] from: SubmissionState,
		#[case] to: SubmissionState,
		#[case] allowed: bool,
	) {
		assert_eq!(from.can_transition_to(to), allowed);
	}

	#[rstest]
	fn test_response_defaults() {
		let response: SubmitResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
		assert!(response.errors.is_empty());
		assert_eq!(response.message, None);
	}

	#[rstest]
	fn test_request_uses_form_attributes() {
		let form = MemoryForm::new()
			.with_field(Field::new("email").with_value("x@y.com"))
			.with_method("put")
			.with_action("/contact/")
			.with_csrf_token("tok");
		let (controller, _) = controller(form, StubTransport::default());

		let request = controller.build_request();
		assert_eq!(request.method, "PUT");
		assert_eq!(request.url, "/contact/");
		assert_eq!(
			request.headers(),
			[("Content-Type", "application/json"), ("X-CSRFToken", "tok")]
		);
		assert_eq!(request.body.get("email"), Some("x@y.com"));
	}

	#[rstest]
	fn test_request_defaults() {
		let form = MemoryForm::new().with_path("/inscription/");
		let (controller, _) = controller(form, StubTransport::default());

		let request = controller.build_request();
		assert_eq!(request.method, "POST");
		assert_eq!(request.url, "/inscription/");
		assert_eq!(request.csrf_token, "");
	}

	#[rstest]
	fn test_blur_then_focus() {
		let form = MemoryForm::new().with_field(Field::new("name").required());
		let (controller, _) = controller(form, StubTransport::default());

		let annotation = controller.handle_field_event("name", FieldEvent::Blur);
		assert!(annotation.is_some_and(|a| a.is_error()));
		assert!(controller.view().has_error("name"));

		controller.handle_field_event("name", FieldEvent::Focus);
		assert!(!controller.view().has_error("name"));
		assert_eq!(controller.handle_field_event("missing", FieldEvent::Blur), None);
	}
}
