//! Page capabilities injected into widgets
//!
//! Instead of looking up `window.showToast` and `window.currentUser` at the
//! point of use, widgets receive a [`PageContext`] when they are built.

use crate::autofill::{CurrentUser, autofill_values};
use crate::snapshot::FormSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Kind of toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
	Success,
	Error,
}

impl ToastKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::Error => "error",
		}
	}
}

impl fmt::Display for ToastKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Sink for user notifications.
pub trait Notifier {
	fn notify(&self, kind: ToastKind, message: &str);
}

/// Notifier used when the page provides none.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
	fn notify(&self, kind: ToastKind, message: &str) {
		tracing::debug!(%kind, message, "no notifier installed, dropping toast");
	}
}

/// Capabilities of the hosting page.
#[derive(Clone)]
pub struct PageContext {
	pub notifier: Rc<dyn Notifier>,
	pub current_user: Option<CurrentUser>,
}

impl PageContext {
	pub fn new(notifier: Rc<dyn Notifier>) -> Self {
		Self {
			notifier,
			current_user: None,
		}
	}

	pub fn with_user(mut self, user: CurrentUser) -> Self {
		self.current_user = Some(user);
		self
	}

	/// Profile values to write into a form; empty without a logged-in user.
	pub fn autofill(&self, current: &FormSnapshot) -> Vec<(String, String)> {
		self.current_user
			.as_ref()
			.map(|user| autofill_values(user, current))
			.unwrap_or_default()
	}
}

impl Default for PageContext {
	fn default() -> Self {
		Self::new(Rc::new(SilentNotifier))
	}
}

impl fmt::Debug for PageContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PageContext")
			.field("notifier", &"<notifier>")
			.field("current_user", &self.current_user)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::autofill::UserProfile;
	use rstest::rstest;

	#[rstest]
	fn test_autofill_uses_injected_user() {
		let user = CurrentUser {
			is_authenticated: true,
			data: Some(UserProfile {
				email: Some("amina@example.ma".to_string()),
				..UserProfile::default()
			}),
		};
		let form = FormSnapshot::from_pairs([("email", ""), ("city", "")]);

		assert!(PageContext::default().autofill(&form).is_empty());
		assert_eq!(
			PageContext::default().with_user(user).autofill(&form),
			vec![("email".to_string(), "amina@example.ma".to_string())]
		);
	}
}
