//! DOM Integration Tests
//!
//! Run in a browser with `wasm-pack test --headless --firefox`.
//!
//! Test Categories:
//! - Category 1: Reading controls
//! - Category 2: Rendering annotations
//! - Category 3: Submission view
//! - Category 4: Widgets
//! - Category 5: Auto-fill

#![cfg(target_arch = "wasm32")]

use formkit_forms::{
	AutocompleteSettings, CurrentUser, FieldAnnotation, FormView, PageContext, PhoneSettings,
	StateCacheSettings, UserProfile, ValidatorSettings,
};
use formkit_pages::autofill::autofill_page;
use formkit_pages::dom::{dispatch, element_by_id, field_from_element};
use formkit_pages::renderer::{DomForm, ORIGINAL_TEXT_ATTR, apply_annotation};
use formkit_pages::widgets::{AutocompleteWidget, PhoneWidget, StateWidget, ValidatorWidget};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlElement, HtmlFormElement, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

/// Appends `html` to the body inside a fresh container.
fn mount(html: &str) -> Element {
	let document = web_sys::window().unwrap().document().unwrap();
	let container = document.create_element("div").unwrap();
	container.set_inner_html(html);
	document.body().unwrap().append_child(&container).unwrap();
	container
}

fn input(id: &str) -> HtmlInputElement {
	element_by_id::<HtmlInputElement>(id).unwrap()
}

fn type_into(id: &str, value: &str) {
	let input = input(id);
	input.set_value(value);
	dispatch(&input, "input").unwrap();
}

// ============================================================================
// Category 1: Reading controls
// ============================================================================

#[wasm_bindgen_test]
fn test_field_from_element_reads_attributes() {
	mount(
		r#"<input id="rc-email" name="email" type="email" required minlength="5"
			maxlength="-1" data-error-message="Adresse refusée" value=" a@b.co ">"#,
	);
	let field = field_from_element(&input("rc-email")).unwrap();

	assert_eq!(field.name, "email");
	assert_eq!(field.id.as_deref(), Some("rc-email"));
	assert!(field.required);
	assert_eq!(field.min_length, Some(5));
	assert_eq!(field.max_length, None);
	assert_eq!(field.error_message.as_deref(), Some("Adresse refusée"));
	assert_eq!(field.trimmed_value(), "a@b.co");
}

#[wasm_bindgen_test]
fn test_inferred_pattern_is_not_validated() {
	mount(r#"<form id="rc-form"><input id="rc-tel" name="tel" type="tel"></form>"#);
	let form = DomForm::by_id("rc-form").unwrap();
	form.apply_inferred_attributes();

	let tel = input("rc-tel");
	assert!(tel.has_attribute("pattern"));
	assert_eq!(field_from_element(&tel).unwrap().pattern, None);
}

#[wasm_bindgen_test]
fn test_snapshot_follows_form_data() {
	mount(
		r#"<form id="rc-snap">
			<input name="name" value="Amina">
			<input name="news" type="checkbox" value="yes">
			<input name="old" value="x" disabled>
			<button type="submit" name="go" value="1">Envoyer</button>
		</form>"#,
	);
	let snapshot = DomForm::by_id("rc-snap").unwrap().snapshot();

	assert_eq!(snapshot.get("name"), Some("Amina"));
	assert!(!snapshot.contains("news"));
	assert!(!snapshot.contains("old"));
	assert!(!snapshot.contains("go"));
}

// ============================================================================
// Category 2: Rendering annotations
// ============================================================================

#[wasm_bindgen_test]
fn test_error_then_success() {
	mount(r#"<div><input id="ra-zip" name="zip"></div>"#);
	let zip = input("ra-zip");

	apply_annotation(
		&zip,
		&FieldAnnotation::Error {
			message: "Format invalide".to_string(),
			error_id: "ra-zip-error".to_string(),
			focus: false,
			scroll: false,
		},
	);
	let node = element_by_id::<Element>("ra-zip-error").unwrap();
	assert_eq!(node.text_content().as_deref(), Some("Format invalide"));
	assert_eq!(node.get_attribute("role").as_deref(), Some("alert"));
	assert!(zip.class_list().contains("form-control-error"));
	assert_eq!(zip.get_attribute("aria-invalid").as_deref(), Some("true"));
	assert_eq!(
		zip.get_attribute("aria-describedby").as_deref(),
		Some("ra-zip-error")
	);

	apply_annotation(&zip, &FieldAnnotation::Success);
	assert!(element_by_id::<Element>("ra-zip-error").is_err());
	assert!(zip.class_list().contains("form-control-success"));
	assert_eq!(zip.get_attribute("aria-invalid").as_deref(), Some("false"));
}

#[wasm_bindgen_test]
fn test_cleared_removes_submit_flag() {
	mount(
		r#"<div>
			<input id="ra-city" name="city" data-submit-error="true" aria-invalid="true">
		</div>"#,
	);
	let city = input("ra-city");

	apply_annotation(&city, &FieldAnnotation::Cleared);

	assert!(!city.has_attribute("data-submit-error"));
	assert!(!city.has_attribute("aria-invalid"));
}

// ============================================================================
// Category 3: Submission view
// ============================================================================

#[wasm_bindgen_test]
fn test_loading_keeps_original_label() {
	mount(
		r#"<form id="sv-form">
			<input name="email">
			<button type="submit" id="sv-submit">Réserver</button>
			<button type="button" id="sv-other">Annuler</button>
		</form>"#,
	);
	let form = DomForm::by_id("sv-form").unwrap();
	let submit = element_by_id::<Element>("sv-submit").unwrap();
	let other = element_by_id::<Element>("sv-other").unwrap();

	form.set_loading(Some("Traitement..."), "Envoyer");
	assert!(submit.has_attribute("disabled"));
	assert!(other.has_attribute("disabled"));
	assert_eq!(submit.get_attribute(ORIGINAL_TEXT_ATTR).as_deref(), Some("Réserver"));
	assert!(submit.query_selector(".loader").unwrap().is_some());

	form.set_loading(None, "Envoyer");
	assert!(!submit.has_attribute("disabled"));
	assert!(!other.has_attribute("disabled"));
	assert_eq!(submit.inner_html(), "Réserver");
}

#[wasm_bindgen_test]
fn test_request_attributes() {
	mount(r#"<form id="sv-attrs" action="/contact/" method="post"><input name="a"></form>"#);
	let form = DomForm::by_id("sv-attrs").unwrap();

	assert_eq!(form.action().as_deref(), Some("/contact/"));
	assert_eq!(form.method().as_deref(), Some("post"));
}

#[wasm_bindgen_test]
fn test_validate_form_marks_invalid_fields() {
	mount(
		r#"<form id="sv-validate">
			<div><input id="sv-name" name="name" required></div>
			<div><input id="sv-mail" name="email" type="email" value="a@b.co"></div>
		</form>"#,
	);
	let widget = ValidatorWidget::mount(
		"sv-validate",
		ValidatorSettings::default(),
		&StateCacheSettings::default(),
		PageContext::default(),
	)
	.unwrap();

	let invalid = widget.controller().validate_form();

	assert_eq!(invalid, vec!["name".to_string()]);
	assert_eq!(
		input("sv-name").get_attribute("data-submit-error").as_deref(),
		Some("true")
	);
	assert!(element_by_id::<Element>("sv-name-error").is_ok());
	assert!(input("sv-mail").class_list().contains("form-control-success"));
}

#[wasm_bindgen_test]
fn test_focus_on_first_error_keeps_message() {
	mount(
		r#"<form id="sv-focus">
			<div><input id="sv-focus-name" name="name" required></div>
		</form>"#,
	);
	let widget = ValidatorWidget::mount(
		"sv-focus",
		ValidatorSettings::default(),
		&StateCacheSettings::default(),
		PageContext::default(),
	)
	.unwrap();

	widget.controller().validate_form();
	assert!(element_by_id::<Element>("sv-focus-name-error").is_ok());
	assert_eq!(
		input("sv-focus-name").get_attribute("data-submit-error").as_deref(),
		Some("true")
	);

	// The flagged field is focused again by its own annotation.
	assert_eq!(widget.controller().validate_field("name"), Some(false));
	assert!(element_by_id::<Element>("sv-focus-name-error").is_ok());
	assert_eq!(
		input("sv-focus-name").get_attribute("aria-invalid").as_deref(),
		Some("true")
	);
}

// ============================================================================
// Category 4: Widgets
// ============================================================================

#[wasm_bindgen_test]
fn test_phone_strips_dial_code() {
	mount(r#"<input type="tel" id="w-phone" data-phone-input>"#);
	let widget = PhoneWidget::mount("w-phone", &PhoneSettings::default()).unwrap();
	widget.select("FR").unwrap();

	type_into("w-phone", "33612345678");

	assert_eq!(input("w-phone").value(), "612345678");
	assert_eq!(input("w-phone").placeholder(), "+33 XX XX XX XX");
	assert_eq!(widget.full_number(), "+33612345678");
}

#[wasm_bindgen_test]
fn test_phone_reads_field_after_reset_and_restore() {
	mount(
		r#"<form id="w-phone-form">
			<input type="tel" id="w-phone-reset" name="phone" data-phone-input>
		</form>"#,
	);
	let widget = PhoneWidget::mount("w-phone-reset", &PhoneSettings::default()).unwrap();
	type_into("w-phone-reset", "0612345678");
	assert_eq!(widget.full_number(), "+2120612345678");

	element_by_id::<HtmlFormElement>("w-phone-form").unwrap().reset();
	assert_eq!(widget.full_number(), "+212");
	widget.select("MA").unwrap();
	assert_eq!(input("w-phone-reset").value(), "");

	// Restored values arrive without an `input` event.
	input("w-phone-reset").set_value("33711223344");
	widget.select("FR").unwrap();
	assert_eq!(input("w-phone-reset").value(), "711223344");
	assert_eq!(widget.full_number(), "+33711223344");
}

#[wasm_bindgen_test]
fn test_autocomplete_lists_and_selects() {
	mount(r#"<form><input id="w-city" name="city" data-city-autocomplete></form>"#);
	let mut settings = AutocompleteSettings::default();
	settings.cities = vec!["Casablanca".to_string(), "Rabat".to_string()];
	let widget = AutocompleteWidget::mount("w-city", settings).unwrap();

	type_into("w-city", "CASA");
	assert!(widget.is_open());
	assert_eq!(widget.suggestions(), vec!["Casablanca".to_string()]);

	let document = web_sys::window().unwrap().document().unwrap();
	let item = document
		.query_selector(".city-item")
		.unwrap()
		.unwrap()
		.dyn_into::<HtmlElement>()
		.unwrap();
	item.click();

	assert_eq!(input("w-city").value(), "Casablanca");
	assert!(!widget.is_open());
}

#[wasm_bindgen_test]
fn test_state_restores_into_empty_fields() {
	let storage = web_sys::window().unwrap().local_storage().unwrap().unwrap();
	storage
		.set_item(
			"form_state_w-state",
			r#"{"email":"x@y.com","name":"Saved"}"#,
		)
		.unwrap();
	mount(
		r#"<form id="w-state">
			<input id="w-state-email" name="email">
			<input id="w-state-name" name="name" value="Typed">
		</form>"#,
	);

	let widget = StateWidget::mount("w-state", &StateCacheSettings::default()).unwrap();

	assert_eq!(input("w-state-email").value(), "x@y.com");
	assert_eq!(input("w-state-name").value(), "Typed");

	widget.clear().unwrap();
	assert_eq!(storage.get_item("form_state_w-state").unwrap(), None);
}

// ============================================================================
// Category 5: Auto-fill
// ============================================================================

#[wasm_bindgen_test]
fn test_autofill_reads_user_from_context() {
	mount(
		r#"<form>
			<input id="af-email" name="email">
			<input id="af-city" name="city" value="Fès">
		</form>"#,
	);
	let user = CurrentUser {
		is_authenticated: true,
		data: Some(UserProfile {
			email: Some("amina@example.ma".to_string()),
			city: Some("Rabat".to_string()),
			..UserProfile::default()
		}),
	};

	assert_eq!(autofill_page(&PageContext::default()), 0);
	assert!(autofill_page(&PageContext::default().with_user(user)) >= 1);

	assert_eq!(input("af-email").value(), "amina@example.ma");
	assert_eq!(input("af-city").value(), "Fès");
}
