//! Phone input with a country dial-code selector
//!
//! Mounting turns
//!
//! ```html
//! <input type="tel" id="phone" data-phone-input>
//! ```
//!
//! into
//!
//! ```html
//! <div class="phone-input-wrapper">
//!   <div class="country-selector">
//!     <button type="button" class="country-selector-btn">🇲🇦 +212 ▾</button>
//!     <div class="country-dropdown hidden">
//!       <button type="button" class="country-option" data-country="MA">…</button>
//!     </div>
//!   </div>
//!   <input type="tel" id="phone" placeholder="+212 XX XX XX XX">
//! </div>
//! ```

use crate::dom::{
	ListenerHandle, document, element_by_id, form_error, listen, options_from_js, to_js_error,
};
use crate::widgets::{create, set_open, span, wrap};
use formkit_forms::{FormResult, PhoneCountrySelector, PhoneSettings};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlInputElement, Node};

/// Data attribute holding an option's ISO code.
pub const COUNTRY_ATTR: &str = "data-country";

#[derive(Clone)]
struct PhoneDom {
	input: HtmlInputElement,
	selector: Element,
	button: Element,
	dropdown: Element,
}

impl PhoneDom {
	fn build(input: HtmlInputElement, model: &PhoneCountrySelector) -> FormResult<Self> {
		let wrapper = wrap(&input, "phone-input-wrapper")?;
		let selector = create("div", "country-selector")?;
		let button = create("button", "country-selector-btn")?;
		let _ = button.set_attribute("type", "button");
		let dropdown = create("div", "country-dropdown hidden")?;

		for country in model.countries() {
			let option = create("button", "country-option")?;
			let _ = option.set_attribute("type", "button");
			let _ = option.set_attribute(COUNTRY_ATTR, country.iso);
			for (class, text) in [
				("country-flag", country.flag),
				("country-name", country.name),
				("country-code", country.dial_code),
			] {
				option
					.append_child(&span(class, text)?)
					.map_err(|e| form_error("appendChild", e))?;
			}
			dropdown
				.append_child(&option)
				.map_err(|e| form_error("appendChild", e))?;
		}

		selector
			.append_child(&button)
			.map_err(|e| form_error("appendChild", e))?;
		selector
			.append_child(&dropdown)
			.map_err(|e| form_error("appendChild", e))?;
		wrapper
			.insert_before(&selector, Some(&input))
			.map_err(|e| form_error("insertBefore", e))?;

		Ok(Self {
			input,
			selector,
			button,
			dropdown,
		})
	}

	/// Selects `iso`, re-normalises whatever the field holds now and
	/// redraws.
	fn select(&self, model: &mut PhoneCountrySelector, iso: &str) -> FormResult<()> {
		let normalized = model.select(iso, &self.input.value())?;
		self.input.set_value(&normalized);
		self.render(model)
	}

	fn render(&self, model: &PhoneCountrySelector) -> FormResult<()> {
		let (flag, code) = model.button_label();
		self.button.set_inner_html("");
		for (class, text) in [
			("country-flag", flag),
			("country-code", code),
			("country-caret", "▾"),
		] {
			self.button
				.append_child(&span(class, text)?)
				.map_err(|e| form_error("appendChild", e))?;
		}
		self.input.set_placeholder(&model.placeholder());
		set_open(&self.dropdown, model.is_open());
		Ok(())
	}
}

/// Phone country selector bound to one `<input type="tel">`.
pub struct PhoneWidget {
	model: Rc<RefCell<PhoneCountrySelector>>,
	dom: PhoneDom,
	_listeners: Vec<ListenerHandle>,
}

impl PhoneWidget {
	pub fn mount(input_id: &str, settings: &PhoneSettings) -> FormResult<Self> {
		let input: HtmlInputElement = element_by_id(input_id)?;
		let model = PhoneCountrySelector::new(settings);
		let initial = model.handle_input(&input.value());
		if initial != input.value() {
			input.set_value(&initial);
		}

		let dom = PhoneDom::build(input, &model)?;
		dom.render(&model)?;
		let model = Rc::new(RefCell::new(model));
		let mut listeners = Vec::new();

		{
			let (model, dom) = (model.clone(), dom.clone());
			listeners.push(listen(&dom.input.clone(), "input", move |_| {
				let normalized = model.borrow().handle_input(&dom.input.value());
				dom.input.set_value(&normalized);
			})?);
		}
		{
			let (model, dom) = (model.clone(), dom.clone());
			listeners.push(listen(&dom.button.clone(), "click", move |event: Event| {
				event.prevent_default();
				let open = model.borrow_mut().toggle_dropdown();
				set_open(&dom.dropdown, open);
			})?);
		}
		for option in crate::dom::query_all(&dom.dropdown, ".country-option") {
			let Some(iso) = option.get_attribute(COUNTRY_ATTR) else {
				continue;
			};
			let (model, dom) = (model.clone(), dom.clone());
			listeners.push(listen(&option, "click", move |_| {
				if let Err(e) = dom.select(&mut model.borrow_mut(), &iso) {
					crate::warn_log!("country selection failed: {}", e);
				}
			})?);
		}
		{
			let (model, dom) = (model.clone(), dom.clone());
			listeners.push(listen(&document()?, "click", move |event: Event| {
				let inside = event
					.target()
					.and_then(|t| t.dyn_into::<Node>().ok())
					.is_some_and(|node| dom.selector.contains(Some(&node)));
				let mut model = model.borrow_mut();
				model.handle_document_click(inside);
				set_open(&dom.dropdown, model.is_open());
			})?);
		}

		Ok(Self {
			model,
			dom,
			_listeners: listeners,
		})
	}

	/// Dial code followed by the number currently in the field.
	pub fn full_number(&self) -> String {
		self.model.borrow().full_number(&self.dom.input.value())
	}

	pub fn country(&self) -> &'static str {
		self.model.borrow().country().iso
	}

	pub fn select(&self, iso: &str) -> FormResult<()> {
		self.dom.select(&mut self.model.borrow_mut(), iso)
	}
}

/// `new PhoneInput(inputId, options?)`
#[wasm_bindgen]
pub struct PhoneInput {
	widget: PhoneWidget,
}

#[wasm_bindgen]
impl PhoneInput {
	#[wasm_bindgen(constructor)]
	pub fn new(input_id: &str, options: JsValue) -> Result<PhoneInput, JsValue> {
		let settings: PhoneSettings = options_from_js(&options).map_err(to_js_error)?;
		let widget = PhoneWidget::mount(input_id, &settings).map_err(to_js_error)?;
		Ok(Self { widget })
	}

	#[wasm_bindgen(js_name = getFullNumber)]
	pub fn get_full_number(&self) -> String {
		self.widget.full_number()
	}

	#[wasm_bindgen(getter)]
	pub fn country(&self) -> String {
		self.widget.country().to_string()
	}

	#[wasm_bindgen(js_name = selectCountry)]
	pub fn select_country(&self, iso: &str) -> Result<(), JsValue> {
		self.widget.select(iso).map_err(to_js_error)
	}
}
