//! Submission Controller Integration Tests
//!
//! Drives the submission state machine end to end over the in-memory form,
//! notifier and transport doubles.
//!
//! Test Categories:
//! - Category 1: Client-side validation
//! - Category 2: Success
//! - Category 3: Server-reported errors
//! - Category 4: Network failures and re-entrancy

use formkit_forms::settings::{StateCacheSettings, ValidatorSettings};
use formkit_forms::submission::SubmitRequest;
use formkit_forms::testing::{MemoryForm, RecordingNotifier, StubTransport};
use formkit_forms::{
	Callback, Field, FieldAnnotation, FieldEvent, FieldValidator, FormError, FormSnapshot,
	FormStateCache, InputType, MemoryStore, PageContext, SubmissionController, SubmissionOutcome,
	SubmissionState, SubmitResponse, SubmitTransport, ToastKind, TransportError,
};
use rstest::{fixture, rstest};
use std::cell::Cell;
use std::rc::Rc;

#[fixture]
fn contact_form() -> MemoryForm {
	MemoryForm::new()
		.with_field(Field::new("name").with_id("id_name").required().with_value("Amina"))
		.with_field(
			Field::new("email")
				.with_id("id_email")
				.with_type(InputType::Email)
				.required()
				.with_value("amina@example.ma"),
		)
		.with_field(Field::new("message").with_value("Bonjour"))
		.with_action("/contact/")
		.with_csrf_token("csrf-123")
}

fn controller_with(
	form: &MemoryForm,
	transport: &StubTransport,
	settings: ValidatorSettings,
) -> (SubmissionController<MemoryForm, StubTransport>, Rc<RecordingNotifier>) {
	let notifier = Rc::new(RecordingNotifier::default());
	let controller = SubmissionController::new(
		FieldValidator::new(settings),
		form.clone(),
		transport.clone(),
		PageContext::new(notifier.clone()),
	);
	(controller, notifier)
}

// ============================================================================
// Category 1: Client-side validation
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_invalid_form_never_reaches_transport(contact_form: MemoryForm) {
	contact_form.set_value("name", "");
	contact_form.set_value("email", "nope");
	let transport = StubTransport::default();
	let (controller, notifier) =
		controller_with(&contact_form, &transport, ValidatorSettings::default());

	let outcome = controller.submit().await.unwrap();

	assert_eq!(
		outcome,
		SubmissionOutcome::Invalid(vec!["name".to_string(), "email".to_string()])
	);
	assert!(transport.requests().is_empty());
	assert!(notifier.toasts().is_empty());
	assert!(contact_form.is_submit_error("name"));
	assert!(contact_form.is_submit_error("email"));
	assert!(!contact_form.is_submit_error("message"));
	assert_eq!(contact_form.focused(), Some(("name".to_string(), true)));
	assert_eq!(controller.state(), SubmissionState::Idle);
}

#[rstest]
#[tokio::test]
async fn test_invalid_form_without_scroll_does_not_focus(contact_form: MemoryForm) {
	contact_form.set_value("email", "");
	let mut settings = ValidatorSettings::default();
	settings.scroll_to_error = false;
	let (controller, _) = controller_with(&contact_form, &StubTransport::default(), settings);

	controller.submit().await.unwrap();
	assert_eq!(contact_form.focused(), None);
	assert!(contact_form.has_error("email"));
}

/// The focus event raised by moving to the first invalid field keeps its error
#[rstest]
fn test_focusing_first_invalid_field_keeps_error(contact_form: MemoryForm) {
	contact_form.set_value("name", "");
	let controller = Rc::new(SubmissionController::new(
		FieldValidator::default(),
		contact_form.clone(),
		StubTransport::default(),
		PageContext::new(Rc::new(RecordingNotifier::default())),
	));
	let weak = Rc::downgrade(&controller);
	contact_form.on_focus(move |name| {
		if let Some(controller) = weak.upgrade() {
			controller.handle_field_event(name, FieldEvent::Focus);
		}
	});

	assert_eq!(controller.validate_form(), vec!["name".to_string()]);
	assert_eq!(contact_form.focused(), Some(("name".to_string(), true)));
	assert!(contact_form.has_error("name"));
	assert!(contact_form.is_submit_error("name"));

	// Re-validating a flagged field focuses it again through the annotation.
	assert_eq!(controller.validate_field("name"), Some(false));
	assert!(contact_form.has_error("name"));
	assert!(contact_form.is_submit_error("name"));

	// A focus the user makes still clears the field.
	assert_eq!(
		controller.handle_field_event("name", FieldEvent::Focus),
		Some(FieldAnnotation::Cleared)
	);
	assert!(!contact_form.has_error("name"));
	assert!(!contact_form.is_submit_error("name"));
}

// ============================================================================
// Category 2: Success
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_success_sends_snapshot_and_toasts(contact_form: MemoryForm) {
	let transport = StubTransport::replying(Ok(SubmitResponse::ok(None)));
	let (controller, notifier) =
		controller_with(&contact_form, &transport, ValidatorSettings::default());

	let outcome = controller.submit().await.unwrap();

	assert_eq!(outcome.state(), SubmissionState::Success);
	let requests = transport.requests();
	assert_eq!(requests.len(), 1);
	assert_eq!(
		requests[0],
		SubmitRequest {
			method: "POST".to_string(),
			url: "/contact/".to_string(),
			csrf_token: "csrf-123".to_string(),
			body: FormSnapshot::from_pairs([
				("name", "Amina"),
				("email", "amina@example.ma"),
				("message", "Bonjour"),
			]),
		}
	);
	assert_eq!(
		notifier.last(),
		Some((ToastKind::Success, "Formulaire envoyé avec succès".to_string()))
	);
	assert_eq!(contact_form.loading_history(), vec![true, false]);
	assert!(!contact_form.is_loading());
	assert_eq!(contact_form.button_label(), "Envoyer");
	assert_eq!(contact_form.scrolled_to_top(), 1);
	assert_eq!(contact_form.resets(), 0);
}

#[rstest]
#[tokio::test]
async fn test_success_with_reset_clears_form_and_cache(contact_form: MemoryForm) {
	let store = MemoryStore::new();
	let cache = Rc::new(FormStateCache::new(
		"contact",
		store.clone(),
		&StateCacheSettings::default(),
	));
	cache
		.save(&FormSnapshot::from_pairs([("message", "draft")]))
		.unwrap();

	let mut settings = ValidatorSettings::default();
	settings.reset_on_success = true;
	let transport = StubTransport::replying(Ok(SubmitResponse::ok(Some("Merci !"))));
	let (controller, notifier) = controller_with(&contact_form, &transport, settings);
	let controller = controller.with_cache(cache);

	let received = Rc::new(Cell::new(false));
	controller.set_on_success(Callback::new({
		let received = received.clone();
		move |response: SubmitResponse| received.set(response.success)
	}));

	controller.submit().await.unwrap();

	assert_eq!(notifier.last(), Some((ToastKind::Success, "Merci !".to_string())));
	assert_eq!(contact_form.resets(), 1);
	assert!(store.is_empty());
	assert!(received.get());
}

// ============================================================================
// Category 3: Server-reported errors
// ============================================================================

/// Only the named field is annotated; nothing else is touched
#[rstest]
#[tokio::test]
async fn test_rejection_flags_exactly_named_fields(contact_form: MemoryForm) {
	let response = SubmitResponse::rejected(
		None,
		[
			("email", vec!["invalid".to_string()]),
			("ghost", vec!["unknown".to_string()]),
		],
	);
	let transport = StubTransport::replying(Ok(response));
	let (controller, notifier) =
		controller_with(&contact_form, &transport, ValidatorSettings::default());

	let errors_seen = Rc::new(Cell::new(0));
	controller.set_on_error(Callback::new({
		let errors_seen = errors_seen.clone();
		move |response: SubmitResponse| errors_seen.set(response.errors.len())
	}));

	let before = contact_form.presented().len();
	let outcome = controller.submit().await.unwrap();

	assert_eq!(outcome.state(), SubmissionState::ServerError);
	let after: Vec<_> = contact_form.presented().into_iter().skip(before).collect();
	let touched: Vec<&str> = after.iter().map(|(name, _)| name.as_str()).collect();
	// One pass over every field during validation, then the server error.
	assert_eq!(touched, ["name", "email", "message", "email"]);
	assert_eq!(contact_form.annotation("email").unwrap().message(), Some("invalid"));
	assert!(contact_form.is_submit_error("email"));
	assert!(!contact_form.is_submit_error("name"));
	assert!(!contact_form.has_error("name"));
	assert_eq!(
		notifier.last(),
		Some((ToastKind::Error, "Une erreur est survenue".to_string()))
	);
	assert_eq!(errors_seen.get(), 2);
	assert_eq!(contact_form.scrolled_to_top(), 0);
}

#[rstest]
#[tokio::test]
async fn test_rejection_joins_messages(contact_form: MemoryForm) {
	let response = SubmitResponse::rejected(
		Some("Vérifiez le formulaire"),
		[("name", vec!["Trop court".to_string(), "Caractères interdits".to_string()])],
	);
	let transport = StubTransport::replying(Ok(response));
	let (controller, notifier) =
		controller_with(&contact_form, &transport, ValidatorSettings::default());

	controller.submit().await.unwrap();

	assert_eq!(
		contact_form.annotation("name").unwrap().message(),
		Some("Trop court, Caractères interdits")
	);
	assert_eq!(
		notifier.last(),
		Some((ToastKind::Error, "Vérifiez le formulaire".to_string()))
	);
}

/// With `show_errors` off, server messages are not drawn either
#[rstest]
#[tokio::test]
async fn test_rejection_respects_hidden_errors(contact_form: MemoryForm) {
	let response = SubmitResponse::rejected(None, [("email", vec!["invalid".to_string()])]);
	let transport = StubTransport::replying(Ok(response));
	let mut settings = ValidatorSettings::default();
	settings.show_errors = false;
	let (controller, notifier) = controller_with(&contact_form, &transport, settings);

	let outcome = controller.submit().await.unwrap();

	assert_eq!(outcome.state(), SubmissionState::ServerError);
	assert!(!contact_form.has_error("email"));
	assert_eq!(contact_form.annotation("email"), Some(FieldAnnotation::Neutral));
	assert_eq!(
		notifier.last(),
		Some((ToastKind::Error, "Une erreur est survenue".to_string()))
	);
}

// ============================================================================
// Category 4: Network failures and re-entrancy
// ============================================================================

#[rstest]
#[case(TransportError::network("connection refused"))]
#[case(TransportError::deserialization("expected value at line 1"))]
#[tokio::test]
async fn test_transport_failure_is_network_error(
	contact_form: MemoryForm,
	#[case] error: TransportError,
) {
	let transport = StubTransport::replying(Err(error.clone()));
	let (controller, notifier) =
		controller_with(&contact_form, &transport, ValidatorSettings::default());

	let outcome = controller.submit().await.unwrap();

	assert_eq!(outcome, SubmissionOutcome::NetworkError(error));
	assert_eq!(
		notifier.toasts(),
		vec![(ToastKind::Error, "Erreur de connexion. Veuillez réessayer.".to_string())]
	);
	assert!(!contact_form.is_loading());
	assert!(!contact_form.is_submit_error("email"));
	assert_eq!(controller.state(), SubmissionState::Idle);
}

/// A transport that waits until released.
struct GatedTransport {
	gate: Rc<tokio::sync::Notify>,
}

#[async_trait::async_trait(?Send)]
impl SubmitTransport for GatedTransport {
	async fn send(&self, _request: &SubmitRequest) -> Result<SubmitResponse, TransportError> {
		self.gate.notified().await;
		Ok(SubmitResponse::ok(None))
	}
}

#[rstest]
#[tokio::test]
async fn test_second_submit_while_in_flight_is_rejected(contact_form: MemoryForm) {
	let gate = Rc::new(tokio::sync::Notify::new());
	let controller = SubmissionController::new(
		FieldValidator::default(),
		contact_form.clone(),
		GatedTransport { gate: gate.clone() },
		PageContext::default(),
	);

	let (first, second) = tokio::join!(controller.submit(), async {
		let second = controller.submit().await;
		assert_eq!(controller.state(), SubmissionState::Submitting);
		assert!(contact_form.is_loading());
		gate.notify_one();
		second
	});

	assert!(matches!(second, Err(FormError::SubmissionInProgress)));
	assert_eq!(first.unwrap().state(), SubmissionState::Success);
	assert_eq!(controller.state(), SubmissionState::Idle);
	assert!(!contact_form.is_loading());
}

#[rstest]
#[tokio::test]
async fn test_controller_is_reusable_after_each_attempt(contact_form: MemoryForm) {
	let transport = StubTransport::default();
	transport.push(Err(TransportError::network("offline")));
	transport.push(Ok(SubmitResponse::ok(None)));
	let (controller, _) = controller_with(&contact_form, &transport, ValidatorSettings::default());

	let first = controller.submit().await.unwrap();
	let second = controller.submit().await.unwrap();

	assert_eq!(first.state(), SubmissionState::NetworkError);
	assert_eq!(second.state(), SubmissionState::Success);
	assert_eq!(transport.requests().len(), 2);
}
