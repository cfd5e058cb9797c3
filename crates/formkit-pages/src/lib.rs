//! formkit pages - browser layer for server-rendered forms
//!
//! Binds the headless models of `formkit-forms` to the DOM of a
//! server-rendered page:
//!
//! - **Validation**: realtime field checks, inline errors and AJAX
//!   submission with CSRF header for `form[data-validate]`
//! - **Phone input**: country dial-code selector for
//!   `input[type="tel"][data-phone-input]`
//! - **City autocomplete**: filtered suggestions with keyboard navigation
//!   for `input[data-city-autocomplete]`
//! - **State cache**: debounced `localStorage` persistence for `form[id]`
//! - **Auto-fill**: profile values of `window.currentUser`
//!
//! Built on wasm-bindgen, web-sys, js-sys, gloo-net and gloo-timers only.
//!
//! ## Architecture
//!
//! - [`dom`]: listener handles, control reading and JS error conversion
//! - [`renderer`]: applies validation annotations; `DomForm` view
//! - [`transport`]: `fetch` transport for submissions and the city list
//! - [`storage`], [`timer`], [`page`]: `localStorage`, `setTimeout` and
//!   page globals behind the core crate's seams
//! - [`widgets`]: the four widgets and their JavaScript classes
//! - [`bootstrap`]: `initForms()` / `teardownForms()`
//! - [`csrf`], [`logging`]: CSRF token lookup and console logging macros
//!
//! ## Usage
//!
//! ```html
//! <script type="module">
//!   import init, { initForms, PhoneInput } from "/static/pkg/formkit_pages.js";
//!   await init();
//!   initForms();
//! </script>
//! ```
//!
//! Outside `wasm32` only the platform independent parts ([`csrf`],
//! [`logging`], [`transport`] stubs and the bootstrap selectors) compile.

pub mod bootstrap;
pub mod csrf;
pub mod logging;
pub mod transport;

#[cfg(target_arch = "wasm32")]
pub mod autofill;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod page;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
#[cfg(target_arch = "wasm32")]
pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod timer;
#[cfg(target_arch = "wasm32")]
pub mod widgets;

pub use formkit_forms;
pub use transport::FetchTransport;

#[cfg(target_arch = "wasm32")]
pub use bootstrap::{init_forms, mount_all, teardown_forms};
#[cfg(target_arch = "wasm32")]
pub use renderer::{DomForm, apply_annotation};
#[cfg(target_arch = "wasm32")]
pub use widgets::{CityAutocomplete, FormStateManager, FormValidator, PhoneInput};
