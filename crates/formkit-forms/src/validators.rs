//! Field validation engine
//!
//! [`FieldValidator`] runs an ordered list of [`FieldRule`]s over a
//! [`Field`]. Every rule is evaluated; each failing rule overwrites the
//! previous failure, so the reported message is the one of the LAST failing
//! rule. The built-in order is:
//!
//! 1. required
//! 2. email shape
//! 3. phone shape
//! 4. declared pattern
//! 5. minimum length
//! 6. maximum length
//!
//! Rules added with [`FieldValidator::with_rule`] run after the built-ins.
//!
//! ## Example
//!
//! ```
//! use formkit_forms::field::{Field, InputType};
//! use formkit_forms::validators::FieldValidator;
//!
//! let validator = FieldValidator::default();
//! let field = Field::new("email").with_type(InputType::Email).with_value("a@b");
//! let result = validator.validate(&field);
//! assert!(!result.valid);
//! assert_eq!(result.message, "Format email invalide");
//! ```
//!
//! Client-side validation is a UX layer only; the submission endpoint still
//! validates everything it receives.

use crate::annotation::FieldAnnotation;
use crate::field::{Field, InputType};
use crate::settings::{ValidationMessages, ValidatorSettings};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
	pub valid: bool,
	/// Empty when `valid`
	pub message: String,
}

impl ValidationResult {
	/// A passing result
	pub fn valid() -> Self {
		Self {
			valid: true,
			message: String::new(),
		}
	}

	/// A failing result with `message`
	pub fn invalid(message: impl Into<String>) -> Self {
		Self {
			valid: false,
			message: message.into(),
		}
	}
}

/// A single validation rule.
///
/// `value` is the trimmed field value. Returning `Some(message)` marks the
/// field invalid and replaces any earlier failure.
pub trait FieldRule {
	fn check(&self, field: &Field, value: &str, messages: &ValidationMessages) -> Option<String>;
}

/// Required fields must not be blank.
struct RequiredRule;

impl FieldRule for RequiredRule {
	fn check(&self, field: &Field, value: &str, messages: &ValidationMessages) -> Option<String> {
		(field.required && value.is_empty()).then(|| messages.required.clone())
	}
}

/// Email inputs must look like `local@domain.tld`, case-insensitively.
struct EmailRule;

impl FieldRule for EmailRule {
	fn check(&self, field: &Field, value: &str, messages: &ValidationMessages) -> Option<String> {
		if field.input_type != InputType::Email || value.is_empty() {
			return None;
		}
		(!is_valid_email(value)).then(|| messages.invalid_email.clone())
	}
}

/// Tel inputs need ten or more digits/hyphens, optionally after a `+`.
struct PhoneRule;

impl FieldRule for PhoneRule {
	fn check(&self, field: &Field, value: &str, messages: &ValidationMessages) -> Option<String> {
		if field.input_type != InputType::Tel || value.is_empty() {
			return None;
		}
		(!is_valid_phone(value)).then(|| messages.invalid_phone.clone())
	}
}

/// A declared pattern must match the whole value.
struct PatternRule;

impl FieldRule for PatternRule {
	fn check(&self, field: &Field, value: &str, messages: &ValidationMessages) -> Option<String> {
		let pattern = field.pattern.as_deref().filter(|p| !p.is_empty())?;
		if value.is_empty() || matches_pattern(pattern, value) {
			return None;
		}
		Some(
			field
				.error_message
				.clone()
				.filter(|m| !m.is_empty())
				.unwrap_or_else(|| messages.invalid_format.clone()),
		)
	}
}

/// Character count must reach `min_length`. Checked on empty values too.
struct MinLengthRule;

impl FieldRule for MinLengthRule {
	fn check(&self, field: &Field, value: &str, messages: &ValidationMessages) -> Option<String> {
		let min = field.min_length.filter(|min| *min > 0)?;
		(value.chars().count() < min).then(|| messages.min_length(min))
	}
}

/// Character count must not exceed `max_length`.
struct MaxLengthRule;

impl FieldRule for MaxLengthRule {
	fn check(&self, field: &Field, value: &str, messages: &ValidationMessages) -> Option<String> {
		let max = field.max_length?;
		(value.chars().count() > max).then(|| messages.max_length(max))
	}
}

fn email_regex() -> &'static Regex {
	static EMAIL: OnceLock<Regex> = OnceLock::new();
	EMAIL.get_or_init(|| {
		Regex::new(r"(?i)^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").expect("static email regex")
	})
}

fn phone_regex() -> &'static Regex {
	static PHONE: OnceLock<Regex> = OnceLock::new();
	PHONE.get_or_init(|| Regex::new(r"^[+]?[0-9\s-]{10,}$").expect("static phone regex"))
}

/// Email shape check used for `type="email"` inputs.
pub fn is_valid_email(value: &str) -> bool {
	email_regex().is_match(value)
}

/// Phone shape check used for `type="tel"` inputs; whitespace is ignored.
pub fn is_valid_phone(value: &str) -> bool {
	let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
	phone_regex().is_match(&compact)
}

/// Matches `value` against an HTML `pattern` attribute, anchored at both
/// ends. Patterns that do not compile never fail a field.
pub fn matches_pattern(pattern: &str, value: &str) -> bool {
	match Regex::new(&format!("^(?:{})$", pattern)) {
		Ok(regex) => regex.is_match(value),
		Err(e) => {
			tracing::warn!(pattern, error = %e, "ignoring pattern that does not compile");
			true
		}
	}
}

/// Events that drive realtime validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
	Blur,
	Focus,
	Input,
}

/// What a realtime event should do to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealtimeAction {
	Validate,
	Clear,
	Ignore,
}

/// The validation engine.
pub struct FieldValidator {
	settings: ValidatorSettings,
	rules: Vec<Box<dyn FieldRule>>,
}

impl Default for FieldValidator {
	fn default() -> Self {
		Self::new(ValidatorSettings::default())
	}
}

impl std::fmt::Debug for FieldValidator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FieldValidator")
			.field("settings", &self.settings)
			.field("rules", &self.rules.len())
			.finish()
	}
}

impl FieldValidator {
	/// Creates an engine with the built-in rules.
	pub fn new(settings: ValidatorSettings) -> Self {
		Self {
			settings,
			rules: vec![
				Box::new(RequiredRule),
				Box::new(EmailRule),
				Box::new(PhoneRule),
				Box::new(PatternRule),
				Box::new(MinLengthRule),
				Box::new(MaxLengthRule),
			],
		}
	}

	/// Appends a rule evaluated after every built-in rule.
	pub fn with_rule(mut self, rule: impl FieldRule + 'static) -> Self {
		self.rules.push(Box::new(rule));
		self
	}

	pub fn settings(&self) -> &ValidatorSettings {
		&self.settings
	}

	/// Runs every rule; the last failing rule decides the message.
	pub fn validate(&self, field: &Field) -> ValidationResult {
		let value = field.trimmed_value();
		let messages = &self.settings.messages;

		self.rules
			.iter()
			.filter_map(|rule| rule.check(field, value, messages))
			.last()
			.map(ValidationResult::invalid)
			.unwrap_or_else(ValidationResult::valid)
	}

	/// Presentation plan for `result`.
	///
	/// Focus and scroll are requested only for fields flagged as
	/// submission-time errors.
	pub fn annotate(&self, field: &Field, result: &ValidationResult) -> FieldAnnotation {
		if !result.valid && !result.message.is_empty() && self.settings.show_errors {
			FieldAnnotation::Error {
				message: result.message.clone(),
				error_id: field.error_id(),
				focus: field.submit_error,
				scroll: field.submit_error && self.settings.scroll_to_error,
			}
		} else if result.valid && !field.trimmed_value().is_empty() {
			FieldAnnotation::Success
		} else {
			FieldAnnotation::Neutral
		}
	}

	/// Presentation plan removing every validation marker.
	pub fn clear(&self, _field: &Field) -> FieldAnnotation {
		FieldAnnotation::Cleared
	}

	/// Validates and plans in one step.
	pub fn check(&self, field: &Field) -> (ValidationResult, FieldAnnotation) {
		let result = self.validate(field);
		let annotation = self.annotate(field, &result);
		(result, annotation)
	}

	/// Decides what a realtime event does to `field`.
	///
	/// Blur validates, focus clears, and typing validates email/tel fields
	/// once the raw value is longer than `realtime_min_chars`.
	pub fn realtime_action(&self, field: &Field, event: FieldEvent) -> RealtimeAction {
		if !self.settings.realtime {
			return RealtimeAction::Ignore;
		}
		match event {
			FieldEvent::Blur => RealtimeAction::Validate,
			FieldEvent::Focus => RealtimeAction::Clear,
			FieldEvent::Input
				if field.input_type.validates_while_typing()
					&& field.value.chars().count() > self.settings.realtime_min_chars =>
			{
				RealtimeAction::Validate
			}
			FieldEvent::Input => RealtimeAction::Ignore,
		}
	}
}
