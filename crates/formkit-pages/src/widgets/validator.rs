//! Form validation and submission widget

use crate::dom::{ListenerHandle, control_name, form_controls, listen, options_from_js, to_js_error};
use crate::renderer::DomForm;
use crate::storage::LocalStore;
use crate::transport::FetchTransport;
use crate::widgets::js_callback;
use crate::{debug_log, warn_log};
use formkit_forms::{
	CachedState, FieldEvent, FieldValidator, FormResult, FormStateCache, PageContext,
	StateCacheSettings, SubmissionController, SubmissionOutcome, ValidatorSettings,
};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::Event;

type DomController = SubmissionController<DomForm, FetchTransport>;

const FIELD_EVENTS: [(&str, FieldEvent); 3] = [
	("blur", FieldEvent::Blur),
	("focus", FieldEvent::Focus),
	("input", FieldEvent::Input),
];

/// Validation and AJAX submission of one form.
pub struct ValidatorWidget {
	id: String,
	controller: Rc<DomController>,
	_listeners: Vec<ListenerHandle>,
}

impl ValidatorWidget {
	/// Mounts on the form with `id`.
	///
	/// The cached state under `cache_settings` is cleared after a successful
	/// submission when the form resets.
	pub fn mount(
		id: &str,
		settings: ValidatorSettings,
		cache_settings: &StateCacheSettings,
		context: PageContext,
	) -> FormResult<Self> {
		let form = DomForm::by_id(id)?;
		form.apply_inferred_attributes();
		let _ = form.element().set_attribute("novalidate", "");

		let mut controller = SubmissionController::new(
			FieldValidator::new(settings),
			form.clone(),
			FetchTransport::new(),
			context,
		);
		match LocalStore::open() {
			Ok(store) => {
				let cache: Rc<dyn CachedState> =
					Rc::new(FormStateCache::new(id, store, cache_settings));
				controller = controller.with_cache(cache);
			}
			Err(e) => warn_log!("{}: saved state will not be cleared: {}", id, e),
		}
		let controller = Rc::new(controller);

		let mut listeners = Vec::new();
		let submit_controller = controller.clone();
		let form_id = id.to_string();
		listeners.push(listen(form.element(), "submit", move |event: Event| {
			event.prevent_default();
			let controller = submit_controller.clone();
			let form_id = form_id.clone();
			spawn_local(async move {
				match controller.submit().await {
					Ok(outcome) => debug_log!("{}: {:?}", form_id, outcome.state()),
					Err(e) => warn_log!("{}: {}", form_id, e),
				}
			});
		})?);

		for element in form_controls(form.element()) {
			if element.get_attribute("type").as_deref() == Some("hidden") {
				continue;
			}
			let Some(name) = control_name(&element) else {
				continue;
			};
			for (event_name, field_event) in FIELD_EVENTS {
				let controller = controller.clone();
				let name = name.clone();
				listeners.push(listen(&element, event_name, move |_| {
					controller.handle_field_event(&name, field_event);
				})?);
			}
		}

		debug_log!("validator mounted on #{}", id);
		Ok(Self {
			id: id.to_string(),
			controller,
			_listeners: listeners,
		})
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn controller(&self) -> &Rc<DomController> {
		&self.controller
	}
}

/// `new FormValidator(formId, options?)`
///
/// `options` holds [`ValidatorSettings`] keys plus optional `onSuccess` and
/// `onError` functions called with the server response.
#[wasm_bindgen]
pub struct FormValidator {
	widget: ValidatorWidget,
}

#[wasm_bindgen]
impl FormValidator {
	#[wasm_bindgen(constructor)]
	pub fn new(form_id: &str, options: JsValue) -> Result<FormValidator, JsValue> {
		let settings: ValidatorSettings = options_from_js(&options).map_err(to_js_error)?;
		let widget = ValidatorWidget::mount(
			form_id,
			settings,
			&StateCacheSettings::default(),
			crate::page::page_context(),
		)
		.map_err(to_js_error)?;

		if let Some(callback) = js_callback(&options, "onSuccess") {
			widget.controller().set_on_success(callback);
		}
		if let Some(callback) = js_callback(&options, "onError") {
			widget.controller().set_on_error(callback);
		}
		Ok(Self { widget })
	}

	/// Validates every field; `true` when the form is valid.
	pub fn validate(&self) -> bool {
		self.widget.controller().validate_form().is_empty()
	}

	/// Validates one field; `false` for unknown names.
	#[wasm_bindgen(js_name = validateField)]
	pub fn validate_field(&self, name: &str) -> bool {
		self.widget
			.controller()
			.validate_field(name)
			.unwrap_or(false)
	}

	/// Runs a submission; resolves to the outcome name.
	pub fn submit(&self) -> js_sys::Promise {
		let controller = self.widget.controller().clone();
		future_to_promise(async move {
			let outcome = controller.submit().await.map_err(to_js_error)?;
			let name = match outcome {
				SubmissionOutcome::Invalid(_) => "invalid",
				SubmissionOutcome::Success(_) => "success",
				SubmissionOutcome::ServerError(_) => "serverError",
				SubmissionOutcome::NetworkError(_) => "networkError",
			};
			Ok(JsValue::from_str(name))
		})
	}

	#[wasm_bindgen(getter)]
	pub fn state(&self) -> String {
		format!("{:?}", self.widget.controller().state())
	}
}
