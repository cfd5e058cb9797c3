//! CSRF token lookup
//!
//! Submissions carry the token in the `X-CSRFToken` header. It is read from
//! the first `<input name="csrfmiddlewaretoken">` in the document, falling
//! back to the `csrftoken` cookie; when neither exists the header is sent
//! empty.

pub use formkit_forms::submission::{CSRF_FORM_FIELD, CSRF_HEADER_NAME};

/// The cookie holding the CSRF token.
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

/// Reads the CSRF token from the page.
#[cfg(target_arch = "wasm32")]
pub fn csrf_token() -> Option<String> {
	token_from_input().or_else(token_from_cookie)
}

/// Reads the CSRF token from the page (non-WASM stub).
#[cfg(not(target_arch = "wasm32"))]
pub fn csrf_token() -> Option<String> {
	None
}

#[cfg(target_arch = "wasm32")]
fn token_from_input() -> Option<String> {
	use wasm_bindgen::JsCast;
	use web_sys::HtmlInputElement;

	let document = web_sys::window()?.document()?;
	let selector = format!("input[name=\"{}\"]", CSRF_FORM_FIELD);
	let input = document.query_selector(&selector).ok()??;
	let input: HtmlInputElement = input.dyn_into().ok()?;
	Some(input.value()).filter(|v| !v.is_empty())
}

#[cfg(target_arch = "wasm32")]
fn token_from_cookie() -> Option<String> {
	use wasm_bindgen::JsCast;
	use web_sys::HtmlDocument;

	let document = web_sys::window()?.document()?;
	let cookies = document.dyn_ref::<HtmlDocument>()?.cookie().ok()?;
	parse_cookie_value(&cookies, CSRF_COOKIE_NAME)
}

/// Finds `name` in a `document.cookie` string (`"a=1; b=2"`).
pub fn parse_cookie_value(cookie_str: &str, name: &str) -> Option<String> {
	cookie_str
		.split(';')
		.filter_map(|part| part.trim().split_once('='))
		.find(|(key, _)| key.trim() == name)
		.map(|(_, value)| value.trim().to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("csrftoken=abc123", Some("abc123"))]
	#[case("sessionid=xyz; csrftoken=abc123; theme=dark", Some("abc123"))]
	#[case(" csrftoken = spaced ", Some("spaced"))]
	#[case("csrftoken_old=nope", None)]
	#[case("", None)]
	fn test_parse_cookie_value(#[case] cookies: &str, #[case] expected: Option<&str>) {
		assert_eq!(
			parse_cookie_value(cookies, CSRF_COOKIE_NAME).as_deref(),
			expected
		);
	}

	#[rstest]
	fn test_token_lookup_outside_browser() {
		assert_eq!(csrf_token(), None);
	}
}
