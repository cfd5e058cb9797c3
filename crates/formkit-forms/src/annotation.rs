//! Presentation plans for validation results
//!
//! The engine never touches the document. It returns a [`FieldAnnotation`]
//! and a renderer (the DOM presenter in `formkit-pages`, or
//! [`MemoryForm`](crate::testing::MemoryForm) in tests) applies it.
//!
//! | Annotation | error class | `aria-invalid` | `aria-describedby` | error node | success class |
//! |------------|-------------|----------------|--------------------|------------|---------------|
//! | `Neutral`  | removed     | `false`        | kept               | removed    | removed       |
//! | `Success`  | removed     | `false`        | kept               | removed    | added         |
//! | `Error`    | added       | `true`         | `<id>-error`       | inserted   | removed       |
//! | `Cleared`  | removed     | removed        | removed            | removed    | kept          |

/// CSS class toggled on invalid fields.
pub const ERROR_CLASS: &str = "form-control-error";

/// CSS class added to valid, non-empty fields.
pub const SUCCESS_CLASS: &str = "form-control-success";

/// CSS class of the inline error node.
pub const ERROR_NODE_CLASS: &str = "form-error";

/// What to do with a field's validation markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAnnotation {
	/// Remove error markers, mark `aria-invalid="false"`.
	Neutral,
	/// Like `Neutral`, plus the success class.
	Success,
	/// Show `message` in a node with id `error_id`.
	Error {
		message: String,
		error_id: String,
		/// Move keyboard focus to the field
		focus: bool,
		/// Scroll the field into view (only together with `focus`)
		scroll: bool,
	},
	/// Remove every marker including the submit-error flag (focus event).
	Cleared,
}

impl FieldAnnotation {
	/// Whether the field ends up showing an error.
	pub fn is_error(&self) -> bool {
		matches!(self, Self::Error { .. })
	}

	/// The error message, if any.
	pub fn message(&self) -> Option<&str> {
		match self {
			Self::Error { message, .. } => Some(message),
			_ => None,
		}
	}
}
