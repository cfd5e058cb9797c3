//! Console logging for the browser layer
//!
//! The core crate reports through `tracing`; widgets running in the page log
//! straight to the browser console with these macros instead. Every macro is
//! a no-op in release builds.
//!
//! | Macro | Debug Assertions | Feature Required | WASM | Non-WASM |
//! |-------|------------------|------------------|------|----------|
//! | `debug_log!` | Required | `debug-logs` | `console.debug` | `eprintln!` |
//! | `info_log!` | Required | None | `console.info` | `eprintln!` |
//! | `warn_log!` | Required | None | `console.warn` | `eprintln!` |
//! | `error_log!` | Required | None | `console.error` | `eprintln!` |
//!
//! Messages are prefixed with `[formkit]` so they can be filtered in the
//! console.
//!
//! ```ignore
//! use formkit_pages::{info_log, warn_log};
//!
//! info_log!("mounted {} validators", count);
//! warn_log!("no element with id {}", id);
//! ```

/// Logs a debug message (requires `debug-logs` feature + `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-logs", target_arch = "wasm32"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		::web_sys::console::debug_1(&format!("[formkit] {}", format!($($arg)*)).into());
	}};
}

/// Logs a debug message (requires `debug-logs` feature + `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-logs", not(target_arch = "wasm32")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		eprintln!("[formkit][DEBUG] {}", format!($($arg)*));
	}};
}

/// No-op debug_log when conditions are not met
#[macro_export]
#[cfg(not(all(debug_assertions, feature = "debug-logs")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message (requires `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		::web_sys::console::info_1(&format!("[formkit] {}", format!($($arg)*)).into());
	}};
}

/// Logs an info message (requires `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, not(target_arch = "wasm32")))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		eprintln!("[formkit][INFO] {}", format!($($arg)*));
	}};
}

/// No-op info_log in release builds
#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! info_log {
	($($arg:tt)*) => {{}};
}

/// Logs a warning (requires `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		::web_sys::console::warn_1(&format!("[formkit] {}", format!($($arg)*)).into());
	}};
}

/// Logs a warning (requires `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, not(target_arch = "wasm32")))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		eprintln!("[formkit][WARN] {}", format!($($arg)*));
	}};
}

/// No-op warn_log in release builds
#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! warn_log {
	($($arg:tt)*) => {{}};
}

/// Logs an error (requires `debug_assertions`)
///
/// Network failures of a submission end up here next to the error toast.
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! error_log {
	($($arg:tt)*) => {{
		::web_sys::console::error_1(&format!("[formkit] {}", format!($($arg)*)).into());
	}};
}

/// Logs an error (requires `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, not(target_arch = "wasm32")))]
macro_rules! error_log {
	($($arg:tt)*) => {{
		eprintln!("[formkit][ERROR] {}", format!($($arg)*));
	}};
}

/// No-op error_log in release builds
#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! error_log {
	($($arg:tt)*) => {{}};
}

#[cfg(test)]
mod tests {
	use crate::{debug_log, error_log, info_log, warn_log};
	use rstest::rstest;

	#[rstest]
	fn test_logging_macros_accept_format_args() {
		debug_log!("restored {} fields", 2);
		info_log!("mounted {}", "contact");
		warn_log!("unknown markers: {:?}", vec!["data-x"]);
		error_log!("submission failed: {}", "offline");
	}

	#[rstest]
	fn test_logging_macros_plain_message() {
		debug_log!("debug");
		info_log!("info");
		warn_log!("warn");
		error_log!("error");
	}
}
