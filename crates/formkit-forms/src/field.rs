//! Field model
//!
//! A [`Field`] is a plain snapshot of one form control: its name, current
//! value and the attributes that drive validation. The browser layer builds
//! one from a DOM element each time a check runs, so validity is never
//! stored, only recomputed.

use serde::{Deserialize, Serialize};

/// Default HTML pattern given to email inputs that declare none.
pub const EMAIL_HTML_PATTERN: &str = r"[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$";

/// Default HTML pattern given to tel inputs that declare none.
pub const TEL_HTML_PATTERN: &str = r"[+]?[0-9\s-]{10,}";

/// Attribute marking a pattern that was inferred rather than declared.
pub const PATTERN_INFERRED_ATTR: &str = "data-pattern-inferred";

/// Attribute flagging a field as a submission-time error.
pub const SUBMIT_ERROR_ATTR: &str = "data-submit-error";

/// Attribute holding a custom pattern-failure message.
pub const ERROR_MESSAGE_ATTR: &str = "data-error-message";

/// Input type tag of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
	#[default]
	Text,
	Email,
	Tel,
	Password,
	Number,
	Url,
	Hidden,
	Checkbox,
	Radio,
	Textarea,
	Select,
	/// Any other `type` attribute value
	Other(String),
}

impl InputType {
	/// Maps an HTML `type` attribute (or tag name for textarea/select).
	pub fn from_attr(value: &str) -> Self {
		match value.trim().to_ascii_lowercase().as_str() {
			"" | "text" | "search" => Self::Text,
			"email" => Self::Email,
			"tel" => Self::Tel,
			"password" => Self::Password,
			"number" => Self::Number,
			"url" => Self::Url,
			"hidden" => Self::Hidden,
			"checkbox" => Self::Checkbox,
			"radio" => Self::Radio,
			"textarea" => Self::Textarea,
			"select" | "select-one" | "select-multiple" => Self::Select,
			other => Self::Other(other.to_string()),
		}
	}

	/// Email and tel inputs get realtime checks while typing.
	pub fn validates_while_typing(&self) -> bool {
		matches!(self, Self::Email | Self::Tel)
	}
}

/// Snapshot of a form control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Field {
	pub id: Option<String>,
	pub name: String,
	pub value: String,
	pub input_type: InputType,
	pub required: bool,
	pub min_length: Option<usize>,
	pub max_length: Option<usize>,
	/// Explicitly declared pattern; inferred defaults never land here
	pub pattern: Option<String>,
	/// Override for the pattern-failure message
	pub error_message: Option<String>,
	/// Set while the field carries a submission-time error
	pub submit_error: bool,
}

impl Field {
	/// Create a new text field with the given name
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::field::{Field, InputType};
	///
	/// let field = Field::new("email");
	/// assert_eq!(field.name, "email");
	/// assert_eq!(field.input_type, InputType::Text);
	/// assert!(!field.required);
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	/// Set the element id
	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	/// Set the current value
	pub fn with_value(mut self, value: impl Into<String>) -> Self {
		self.value = value.into();
		self
	}

	/// Set the input type
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::field::{Field, InputType};
	///
	/// let field = Field::new("phone").with_type(InputType::Tel);
	/// assert!(field.input_type.validates_while_typing());
	/// ```
	pub fn with_type(mut self, input_type: InputType) -> Self {
		self.input_type = input_type;
		self
	}

	/// Mark the field as required
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	/// Set the minimum length
	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = Some(min_length);
		self
	}

	/// Set the maximum length
	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
		self
	}

	/// Set an explicit pattern
	pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
		self.pattern = Some(pattern.into());
		self
	}

	/// Set the pattern-failure message override
	pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
		self.error_message = Some(message.into());
		self
	}

	/// Flag the field as a submission-time error
	pub fn with_submit_error(mut self, flagged: bool) -> Self {
		self.submit_error = flagged;
		self
	}

	/// The value with surrounding whitespace removed, as every rule sees it.
	pub fn trimmed_value(&self) -> &str {
		self.value.trim()
	}

	/// Id of the inline error node for this field.
	///
	/// Falls back to the field name when the element has no id.
	///
	/// # Examples
	///
	/// ```
	/// use formkit_forms::field::Field;
	///
	/// assert_eq!(Field::new("email").with_id("id_email").error_id(), "id_email-error");
	/// assert_eq!(Field::new("email").error_id(), "email-error");
	/// ```
	pub fn error_id(&self) -> String {
		let key = self
			.id
			.as_deref()
			.filter(|id| !id.is_empty())
			.unwrap_or(&self.name);
		format!("{}-error", key)
	}

	/// Attributes to add at mount time.
	///
	/// Required fields gain `aria-required` unless already present; email and
	/// tel inputs without a pattern gain the default HTML pattern plus the
	/// inferred marker, so that only declared patterns take part in
	/// validation.
	pub fn inferred_attributes(
		&self,
		has_aria_required: bool,
	) -> Vec<(&'static str, &'static str)> {
		let mut attrs = Vec::new();
		if self.required && !has_aria_required {
			attrs.push(("aria-required", "true"));
		}
		if self.pattern.is_none() {
			let default_pattern = match self.input_type {
				InputType::Email => Some(EMAIL_HTML_PATTERN),
				InputType::Tel => Some(TEL_HTML_PATTERN),
				_ => None,
			};
			if let Some(pattern) = default_pattern {
				attrs.push(("pattern", pattern));
				attrs.push((PATTERN_INFERRED_ATTR, "true"));
			}
		}
		attrs
	}
}

/// Parses a `minlength`/`maxlength` attribute.
///
/// Missing, negative or non-numeric values mean "no bound".
pub fn parse_length_attr(value: Option<&str>) -> Option<usize> {
	value.and_then(|v| v.trim().parse::<usize>().ok())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("email", InputType::Email)]
	#[case("TEL", InputType::Tel)]
	#[case("", InputType::Text)]
	#[case("search", InputType::Text)]
	#[case("select-one", InputType::Select)]
	#[case("date", InputType::Other("date".to_string()))]
	fn test_input_type_from_attr(#[case] attr: &str, #[case] expected: InputType) {
		assert_eq!(InputType::from_attr(attr), expected);
	}

	#[rstest]
	fn test_inferred_attributes_for_required_email() {
		let field = Field::new("email").with_type(InputType::Email).required();
		let attrs = field.inferred_attributes(false);
		assert_eq!(
			attrs,
			vec![
				("aria-required", "true"),
				("pattern", EMAIL_HTML_PATTERN),
				(PATTERN_INFERRED_ATTR, "true"),
			]
		);
	}

	#[rstest]
	fn test_inferred_attributes_keep_declared_pattern() {
		let field = Field::new("phone")
			.with_type(InputType::Tel)
			.with_pattern("[0-9]{10}");
		assert!(field.inferred_attributes(false).is_empty());
	}

	#[rstest]
	fn test_inferred_attributes_respect_existing_aria() {
		let field = Field::new("name").required();
		assert!(field.inferred_attributes(true).is_empty());
	}

	#[rstest]
	#[case(None, None)]
	#[case(Some("5"), Some(5))]
	#[case(Some(" 12 "), Some(12))]
	#[case(Some("-1"), None)]
	#[case(Some("abc"), None)]
	fn test_parse_length_attr(#[case] raw: Option<&str>, #[case] expected: Option<usize>) {
		assert_eq!(parse_length_attr(raw), expected);
	}

	#[rstest]
	fn test_error_id_ignores_empty_id() {
		let field = Field::new("city").with_id("");
		assert_eq!(field.error_id(), "city-error");
	}
}
