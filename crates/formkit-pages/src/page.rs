//! Page globals
//!
//! `window.showToast(kind, message)` and `window.currentUser` are provided by
//! the site's own scripts. They are read once per widget into a
//! [`PageContext`].

use crate::dom::window;
use crate::warn_log;
use formkit_forms::{CurrentUser, Notifier, PageContext, ToastKind};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};

/// Forwards toasts to `window.showToast`.
///
/// Pages without the function get a console warning instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowNotifier;

impl Notifier for WindowNotifier {
	fn notify(&self, kind: ToastKind, message: &str) {
		let Ok(window) = window() else {
			return;
		};
		let show = js_sys::Reflect::get(&window, &JsValue::from_str("showToast"))
			.ok()
			.and_then(|f| f.dyn_into::<js_sys::Function>().ok());

		match show {
			Some(show) => {
				if let Err(e) = show.call2(
					&window,
					&JsValue::from_str(kind.as_str()),
					&JsValue::from_str(message),
				) {
					warn_log!("showToast threw: {}", crate::dom::js_message(&e));
				}
			}
			None => warn_log!("{} toast (no window.showToast): {}", kind, message),
		}
	}
}

/// Reads `window.currentUser`.
///
/// Missing or malformed values read as "not logged in".
pub fn current_user() -> Option<CurrentUser> {
	let window = window().ok()?;
	let value = js_sys::Reflect::get(&window, &JsValue::from_str("currentUser")).ok()?;
	if value.is_undefined() || value.is_null() {
		return None;
	}
	let json = js_sys::JSON::stringify(&value).ok()?.as_string()?;
	match serde_json::from_str(&json) {
		Ok(user) => Some(user),
		Err(e) => {
			warn_log!("ignoring malformed window.currentUser: {}", e);
			None
		}
	}
}

/// Context handed to every widget of the page.
pub fn page_context() -> PageContext {
	let context = PageContext::new(Rc::new(WindowNotifier));
	match current_user() {
		Some(user) => context.with_user(user),
		None => context,
	}
}
