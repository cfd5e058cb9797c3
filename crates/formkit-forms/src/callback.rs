//! Callback wrapper for widget hooks.
//!
//! Widgets run on the browser's single event loop, so callbacks are
//! reference-counted with `Rc` and carry no `Send`/`Sync` bounds.
//!
//! ```
//! use formkit_forms::callback::Callback;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let calls = Rc::new(Cell::new(0));
//! let on_success = Callback::new({
//!     let calls = calls.clone();
//!     move |_: &str| calls.set(calls.get() + 1)
//! });
//! on_success.call("ok");
//! assert_eq!(calls.get(), 1);
//! ```

use std::rc::Rc;

/// A cloneable callback.
pub struct Callback<Args, Ret = ()> {
	inner: Rc<dyn Fn(Args) -> Ret + 'static>,
}

impl<Args, Ret> Callback<Args, Ret> {
	/// Wraps a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + 'static,
	{
		Self { inner: Rc::new(f) }
	}

	/// Calls the callback with the given arguments.
	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}
}

impl<Args, Ret> Clone for Callback<Args, Ret> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<Args, Ret> std::fmt::Debug for Callback<Args, Ret> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Callback")
			.field("inner", &"<function>")
			.finish()
	}
}
