//! Form state persistence in `localStorage`

use crate::dom::{ListenerHandle, dispatch, listen, options_from_js, to_js_error, window};
use crate::renderer::DomForm;
use crate::storage::LocalStore;
use crate::timer::TimeoutScheduler;
use crate::{debug_log, warn_log};
use formkit_forms::{Debouncer, FormResult, FormStateCache, FormView, StateCacheSettings};
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;

struct Inner {
	form: DomForm,
	cache: FormStateCache<LocalStore>,
	save: Debouncer<TimeoutScheduler>,
	settle: Debouncer<TimeoutScheduler>,
}

impl Inner {
	fn save_now(&self) -> FormResult<()> {
		self.cache.save(&self.form.snapshot())
	}

	fn restore(&self) -> FormResult<usize> {
		let restored = self.cache.restore_into(&self.form.snapshot())?;
		for (name, value) in &restored {
			if let Some(element) = self.form.set_value(name, value) {
				let _ = dispatch(&element, "change");
			}
		}
		Ok(restored.len())
	}

	fn after_submit(&self) -> FormResult<()> {
		if self.cache.settle_after_submit(self.form.has_error_nodes())? {
			debug_log!("{}: submission settled, state cleared", self.cache.storage_key());
		}
		Ok(())
	}

	fn on_unload(&self) -> FormResult<()> {
		self.cache.on_unload(&self.form.snapshot()).map(|_| ())
	}
}

fn report(result: FormResult<()>) {
	if let Err(e) = result {
		warn_log!("form state: {}", e);
	}
}

/// Saves and restores one form's values.
pub struct StateWidget {
	inner: Rc<Inner>,
	_listeners: Vec<ListenerHandle>,
}

impl StateWidget {
	/// Mounts on the form with `form_id` and restores saved values into
	/// empty fields.
	pub fn mount(form_id: &str, settings: &StateCacheSettings) -> FormResult<Self> {
		let form = DomForm::by_id(form_id)?;
		let cache = FormStateCache::new(form_id, LocalStore::open()?, settings);
		let inner = Rc::new(Inner {
			form,
			cache,
			save: Debouncer::new(TimeoutScheduler, settings.debounce_ms),
			settle: Debouncer::new(TimeoutScheduler, settings.settle_ms),
		});

		let restored = inner.restore()?;
		if restored > 0 {
			debug_log!("{}: restored {} fields", form_id, restored);
		}

		let listeners = vec![
			on(&inner, inner.form.element(), "input", |inner| {
				let weak = Rc::downgrade(inner);
				inner.save.call(move || {
					if let Some(inner) = weak.upgrade() {
						report(inner.save_now());
					}
				});
			})?,
			on(&inner, inner.form.element(), "submit", |inner| {
				let weak = Rc::downgrade(inner);
				inner.settle.call(move || {
					if let Some(inner) = weak.upgrade() {
						report(inner.after_submit());
					}
				});
			})?,
			on(&inner, &window()?, "beforeunload", |inner| report(inner.on_unload()))?,
		];

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	pub fn save(&self) -> FormResult<()> {
		self.inner.save_now()
	}

	pub fn restore(&self) -> FormResult<usize> {
		self.inner.restore()
	}

	pub fn clear(&self) -> FormResult<()> {
		self.inner.save.cancel();
		self.inner.cache.clear()
	}
}

fn on<F>(
	inner: &Rc<Inner>,
	target: &web_sys::EventTarget,
	event: &'static str,
	handler: F,
) -> FormResult<ListenerHandle>
where
	F: Fn(&Rc<Inner>) + 'static,
{
	let weak: Weak<Inner> = Rc::downgrade(inner);
	listen(target, event, move |_| {
		if let Some(inner) = weak.upgrade() {
			handler(&inner);
		}
	})
}

/// `new FormStateManager(formId, options?)`
#[wasm_bindgen]
pub struct FormStateManager {
	widget: StateWidget,
}

#[wasm_bindgen]
impl FormStateManager {
	#[wasm_bindgen(constructor)]
	pub fn new(form_id: &str, options: JsValue) -> Result<FormStateManager, JsValue> {
		let settings: StateCacheSettings = options_from_js(&options).map_err(to_js_error)?;
		let widget = StateWidget::mount(form_id, &settings).map_err(to_js_error)?;
		Ok(Self { widget })
	}

	#[wasm_bindgen(js_name = saveState)]
	pub fn save_state(&self) -> Result<(), JsValue> {
		self.widget.save().map_err(to_js_error)
	}

	/// Restores saved values into empty fields; returns how many were filled.
	#[wasm_bindgen(js_name = loadState)]
	pub fn load_state(&self) -> Result<usize, JsValue> {
		self.widget.restore().map_err(to_js_error)
	}

	#[wasm_bindgen(js_name = clearState)]
	pub fn clear_state(&self) -> Result<(), JsValue> {
		self.widget.clear().map_err(to_js_error)
	}
}
