//! City autocomplete
//!
//! Suggestions are rendered as `button.city-item` rows inside a
//! `div.city-autocomplete-dropdown` placed right after the input. Row clicks
//! are handled by one listener on the dropdown, so re-rendering never drops
//! a listener that is still running.

use crate::dom::{
	ListenerHandle, dispatch, document, element_by_id, form_error, listen, options_from_js,
	query_all, to_js_error,
};
use crate::timer::TimeoutScheduler;
use crate::transport::fetch_cities;
use crate::widgets::{create, set_open, span, wrap};
use formkit_forms::{
	AutocompleteSettings, Debouncer, FormResult, Key, KeyOutcome, LocationAutocomplete,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
	Element, Event, HtmlInputElement, KeyboardEvent, Node, ScrollIntoViewOptions,
	ScrollLogicalPosition,
};

/// Class of the highlighted row.
pub const ACTIVE_CLASS: &str = "active";

const ITEM_CLASS: &str = "city-item";
const INDEX_ATTR: &str = "data-index";

struct Inner {
	model: RefCell<LocationAutocomplete>,
	input: HtmlInputElement,
	dropdown: Element,
	blur: Debouncer<TimeoutScheduler>,
}

impl Inner {
	fn render(&self) -> FormResult<()> {
		let model = self.model.borrow();
		self.dropdown.set_inner_html("");
		if model.is_open() {
			for (index, city) in model.suggestions().iter().enumerate() {
				let item = create("button", ITEM_CLASS)?;
				let _ = item.set_attribute("type", "button");
				let _ = item.set_attribute(INDEX_ATTR, &index.to_string());
				if model.highlighted() == Some(index) {
					let _ = item.class_list().add_1(ACTIVE_CLASS);
				}
				item.append_child(&span("city-name", city)?)
					.map_err(|e| form_error("appendChild", e))?;
				self.dropdown
					.append_child(&item)
					.map_err(|e| form_error("appendChild", e))?;
			}
		}
		set_open(&self.dropdown, model.is_open());
		Ok(())
	}

	fn show_highlighted(&self) {
		if let Some(active) = query_all(&self.dropdown, &format!(".{}", ACTIVE_CLASS)).first() {
			let options = ScrollIntoViewOptions::new();
			options.set_block(ScrollLogicalPosition::Nearest);
			active.scroll_into_view_with_scroll_into_view_options(&options);
		}
	}

	fn apply_selection(&self, city: &str) {
		self.input.set_value(city);
		let _ = dispatch(&self.input, "change");
	}

	fn rerender(&self) {
		if let Err(e) = self.render() {
			crate::warn_log!("autocomplete render failed: {}", e);
		}
	}

	fn on_input(&self) {
		self.model.borrow_mut().handle_input(&self.input.value());
		self.rerender();
	}

	fn on_focus(&self) {
		self.model.borrow_mut().handle_focus(&self.input.value());
		self.rerender();
	}

	fn on_key(&self, event: &KeyboardEvent) {
		let outcome = self
			.model
			.borrow_mut()
			.handle_key(Key::from_key_name(&event.key()));
		if outcome.prevents_default() {
			event.prevent_default();
		}
		match outcome {
			KeyOutcome::Ignored => return,
			KeyOutcome::Selected(city) => self.apply_selection(&city),
			KeyOutcome::Highlight(_) | KeyOutcome::Closed => {}
		}
		self.rerender();
		self.show_highlighted();
	}

	fn on_item_click(&self, event: &Event) {
		let index = event
			.target()
			.and_then(|t| t.dyn_into::<Element>().ok())
			.and_then(|el| el.closest(&format!(".{}", ITEM_CLASS)).ok().flatten())
			.and_then(|item| item.get_attribute(INDEX_ATTR))
			.and_then(|i| i.parse::<usize>().ok());
		let Some(index) = index else {
			return;
		};
		let selected = self.model.borrow_mut().select(index);
		if let Some(city) = selected {
			self.apply_selection(&city);
			self.rerender();
		}
	}

	fn on_blur(self: &Rc<Self>) {
		let weak: Weak<Self> = Rc::downgrade(self);
		self.blur.call(move || {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			let focus_inside = document()
				.ok()
				.and_then(|d| d.active_element())
				.is_some_and(|active| inner.dropdown.contains(Some(active.as_ref() as &Node)));
			inner.model.borrow_mut().handle_blur_settled(focus_inside);
			inner.rerender();
		});
	}
}

/// Autocomplete bound to one input.
pub struct AutocompleteWidget {
	inner: Rc<Inner>,
	_listeners: Vec<ListenerHandle>,
}

impl AutocompleteWidget {
	/// Mounts on the input with `input_id`.
	///
	/// Without configured cities the list is fetched in the background; the
	/// widget works with whatever candidates are loaded at each keystroke.
	pub fn mount(input_id: &str, settings: AutocompleteSettings) -> FormResult<Self> {
		let input: HtmlInputElement = element_by_id(input_id)?;
		let _ = input.set_attribute("autocomplete", "off");
		let wrapper = wrap(&input, "city-autocomplete")?;
		let dropdown = create("div", "city-autocomplete-dropdown hidden")?;
		wrapper
			.append_child(&dropdown)
			.map_err(|e| form_error("appendChild", e))?;

		let blur = Debouncer::new(TimeoutScheduler, settings.blur_grace_ms);
		let model = LocationAutocomplete::new(settings);
		let needs_fetch = model.needs_fetch();
		let endpoint = model.settings().endpoint.clone();

		let inner = Rc::new(Inner {
			model: RefCell::new(model),
			input,
			dropdown,
			blur,
		});

		if needs_fetch {
			let weak = Rc::downgrade(&inner);
			spawn_local(async move {
				let fetched = fetch_cities(&endpoint).await;
				if let Err(e) = &fetched {
					crate::error_log!("could not load cities from {}: {}", endpoint, e);
				}
				if let Some(inner) = weak.upgrade() {
					inner.model.borrow_mut().with_fetched(fetched);
				}
			});
		}

		let listeners = vec![
			Self::on(&inner, &inner.input, "input", |inner, _| inner.on_input())?,
			Self::on(&inner, &inner.input, "focus", |inner, _| inner.on_focus())?,
			Self::on(&inner, &inner.input, "blur", |inner, _| inner.on_blur())?,
			Self::on(&inner, &inner.input, "keydown", |inner, event| {
				if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
					inner.on_key(event);
				}
			})?,
			Self::on(&inner, &inner.dropdown, "click", |inner, event| {
				inner.on_item_click(&event)
			})?,
		];

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	fn on<F>(
		inner: &Rc<Inner>,
		target: &web_sys::EventTarget,
		event: &'static str,
		handler: F,
	) -> FormResult<ListenerHandle>
	where
		F: Fn(&Rc<Inner>, Event) + 'static,
	{
		let weak = Rc::downgrade(inner);
		listen(target, event, move |e| {
			if let Some(inner) = weak.upgrade() {
				handler(&inner, e);
			}
		})
	}

	pub fn suggestions(&self) -> Vec<String> {
		self.inner.model.borrow().suggestions().to_vec()
	}

	pub fn is_open(&self) -> bool {
		self.inner.model.borrow().is_open()
	}
}

/// `new CityAutocomplete(inputId, options?)`
#[wasm_bindgen]
pub struct CityAutocomplete {
	widget: AutocompleteWidget,
}

#[wasm_bindgen]
impl CityAutocomplete {
	#[wasm_bindgen(constructor)]
	pub fn new(input_id: &str, options: JsValue) -> Result<CityAutocomplete, JsValue> {
		let settings: AutocompleteSettings = options_from_js(&options).map_err(to_js_error)?;
		let widget = AutocompleteWidget::mount(input_id, settings).map_err(to_js_error)?;
		Ok(Self { widget })
	}

	/// Suggestions currently listed.
	#[wasm_bindgen(getter)]
	pub fn suggestions(&self) -> Vec<String> {
		self.widget.suggestions()
	}

	#[wasm_bindgen(getter, js_name = isOpen)]
	pub fn is_open(&self) -> bool {
		self.widget.is_open()
	}
}
