//! # formkit
//!
//! Client-side enhancement for server-rendered HTML forms.
//!
//! formkit turns plain `<form>` markup into validated, AJAX-submitted forms
//! with a phone country selector, a city autocomplete, `localStorage` state
//! persistence and profile auto-fill. The logic lives in headless models that
//! run and test natively; a thin WebAssembly layer binds them to the page.
//!
//! ## Feature Flags
//!
//! - `forms` (default) - headless models: validation engine, submission state
//!   machine, phone/autocomplete/state-cache models, settings
//! - `pages` - browser layer: DOM wiring, `fetch` transport, JavaScript classes
//! - `auto-start` - mount every widget from a `wasm_bindgen(start)` hook
//! - `console_error_panic_hook` - readable panic messages in the console
//! - `debug-logs` - verbose console logging in debug builds
//! - `full` - `forms` and `pages`
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use formkit::forms::{Field, FieldValidator, InputType};
//!
//! let validator = FieldValidator::default();
//! let field = Field::new("email").with_type(InputType::Email).with_value("user@");
//!
//! let result = validator.validate(&field);
//! assert!(!result.valid);
//! ```
//!
//! In the browser:
//!
//! ```html
//! <form id="contact" data-validate action="/contact/" method="post">...</form>
//! <script type="module">
//!   import init, { initForms } from "/static/pkg/formkit_pages.js";
//!   await init();
//!   initForms();
//! </script>
//! ```

#[cfg(feature = "forms")]
pub use formkit_forms as forms;

#[cfg(feature = "pages")]
pub use formkit_pages as pages;

#[cfg(feature = "forms")]
pub use formkit_forms::{
	FormError, FormResult, FormkitSettings, SubmissionController, SubmissionOutcome,
};

#[cfg(feature = "pages")]
pub use formkit_pages::FetchTransport;

#[cfg(all(feature = "pages", target_arch = "wasm32"))]
pub use formkit_pages::{init_forms, teardown_forms};
