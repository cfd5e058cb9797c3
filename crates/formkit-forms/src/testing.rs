//! In-memory doubles for the page seams
//!
//! These stand in for the document, `window.showToast`, `fetch` and
//! `setTimeout` so that widget behaviour can be exercised on native targets.
//! Every double is cheap to clone and clones share state, so a test can keep
//! a handle while the widget under test owns another.

use crate::annotation::FieldAnnotation;
use crate::context::{Notifier, ToastKind};
use crate::error::TransportError;
use crate::field::Field;
use crate::schedule::Schedule;
use crate::snapshot::FormSnapshot;
use crate::submission::{FormView, SubmitRequest, SubmitResponse, SubmitTransport};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

#[derive(Debug, Default)]
struct FormState {
	fields: Vec<Field>,
	defaults: BTreeMap<String, String>,
	annotations: BTreeMap<String, FieldAnnotation>,
	presented: Vec<(String, FieldAnnotation)>,
	focused: Option<(String, bool)>,
	loading_label: Option<String>,
	loading_history: Vec<bool>,
	button_label: String,
	resets: usize,
	scrolled_to_top: usize,
	csrf_token: Option<String>,
	action: Option<String>,
	method: Option<String>,
	path: String,
}

type FocusListener = Rc<dyn Fn(&str)>;

/// A form held in memory.
///
/// `reset` restores the values the fields had when added, like
/// `HTMLFormElement.reset()`. Focusing a field calls the listener set with
/// [`MemoryForm::on_focus`] synchronously, as a browser dispatches `focus`.
#[derive(Clone)]
pub struct MemoryForm {
	state: Rc<RefCell<FormState>>,
	on_focus: Rc<RefCell<Option<FocusListener>>>,
}

impl std::fmt::Debug for MemoryForm {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryForm")
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}

impl Default for MemoryForm {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryForm {
	pub fn new() -> Self {
		let state = FormState {
			button_label: "Envoyer".to_string(),
			path: "/".to_string(),
			..FormState::default()
		};
		Self {
			state: Rc::new(RefCell::new(state)),
			on_focus: Rc::new(RefCell::new(None)),
		}
	}

	/// Listener called with the field name whenever a field receives focus.
	pub fn on_focus(&self, listener: impl Fn(&str) + 'static) {
		self.on_focus.replace(Some(Rc::new(listener)));
	}

	fn dispatch_focus(&self, name: &str) {
		let listener = self.on_focus.borrow().clone();
		if let Some(listener) = listener {
			listener(name);
		}
	}

	pub fn with_field(self, field: Field) -> Self {
		{
			let mut state = self.state.borrow_mut();
			state.defaults.insert(field.name.clone(), field.value.clone());
			state.fields.push(field);
		}
		self
	}

	pub fn with_csrf_token(self, token: &str) -> Self {
		self.state.borrow_mut().csrf_token = Some(token.to_string());
		self
	}

	pub fn with_action(self, action: &str) -> Self {
		self.state.borrow_mut().action = Some(action.to_string());
		self
	}

	pub fn with_method(self, method: &str) -> Self {
		self.state.borrow_mut().method = Some(method.to_string());
		self
	}

	pub fn with_path(self, path: &str) -> Self {
		self.state.borrow_mut().path = path.to_string();
		self
	}

	/// Types into a field.
	pub fn set_value(&self, name: &str, value: &str) {
		if let Some(field) = self.state.borrow_mut().fields.iter_mut().find(|f| f.name == name) {
			field.value = value.to_string();
		}
	}

	pub fn value(&self, name: &str) -> Option<String> {
		self.state
			.borrow()
			.fields
			.iter()
			.find(|f| f.name == name)
			.map(|f| f.value.clone())
	}

	/// The last annotation applied to `name`.
	pub fn annotation(&self, name: &str) -> Option<FieldAnnotation> {
		self.state.borrow().annotations.get(name).cloned()
	}

	pub fn has_error(&self, name: &str) -> bool {
		self.annotation(name).is_some_and(|a| a.is_error())
	}

	pub fn is_submit_error(&self, name: &str) -> bool {
		self.state
			.borrow()
			.fields
			.iter()
			.any(|f| f.name == name && f.submit_error)
	}

	/// Every `present` call, in order.
	pub fn presented(&self) -> Vec<(String, FieldAnnotation)> {
		self.state.borrow().presented.clone()
	}

	/// The focused field and whether it was scrolled into view.
	pub fn focused(&self) -> Option<(String, bool)> {
		self.state.borrow().focused.clone()
	}

	pub fn is_loading(&self) -> bool {
		self.state.borrow().loading_label.is_some()
	}

	/// `true` for every enter, `false` for every leave.
	pub fn loading_history(&self) -> Vec<bool> {
		self.state.borrow().loading_history.clone()
	}

	/// Current label of the submit button.
	pub fn button_label(&self) -> String {
		let state = self.state.borrow();
		state
			.loading_label
			.clone()
			.unwrap_or_else(|| state.button_label.clone())
	}

	pub fn resets(&self) -> usize {
		self.state.borrow().resets
	}

	pub fn scrolled_to_top(&self) -> usize {
		self.state.borrow().scrolled_to_top
	}
}

impl FormView for MemoryForm {
	fn fields(&self) -> Vec<Field> {
		self.state.borrow().fields.clone()
	}

	fn snapshot(&self) -> FormSnapshot {
		self.state
			.borrow()
			.fields
			.iter()
			.map(|f| (f.name.clone(), f.value.clone()))
			.collect()
	}

	fn present(&self, name: &str, annotation: &FieldAnnotation) {
		let focused = {
			let mut state = self.state.borrow_mut();
			if *annotation == FieldAnnotation::Cleared
				&& let Some(field) = state.fields.iter_mut().find(|f| f.name == name)
			{
				field.submit_error = false;
			}
			state.annotations.insert(name.to_string(), annotation.clone());
			state.presented.push((name.to_string(), annotation.clone()));
			match annotation {
				FieldAnnotation::Error {
					focus: true,
					scroll,
					..
				} => Some(*scroll),
				_ => None,
			}
		};
		if let Some(scroll) = focused {
			self.focus_field(name, scroll);
		}
	}

	fn mark_submit_error(&self, name: &str, flagged: bool) {
		if let Some(field) = self.state.borrow_mut().fields.iter_mut().find(|f| f.name == name) {
			field.submit_error = flagged;
		}
	}

	fn focus_field(&self, name: &str, scroll: bool) {
		self.state.borrow_mut().focused = Some((name.to_string(), scroll));
		self.dispatch_focus(name);
	}

	fn set_loading(&self, loading_label: Option<&str>, default_label: &str) {
		let mut state = self.state.borrow_mut();
		state.loading_history.push(loading_label.is_some());
		state.loading_label = loading_label.map(str::to_string);
		if state.button_label.is_empty() {
			state.button_label = default_label.to_string();
		}
	}

	fn reset(&self) {
		let mut state = self.state.borrow_mut();
		let FormState {
			fields, defaults, ..
		} = &mut *state;
		for field in fields.iter_mut() {
			field.value = defaults.get(&field.name).cloned().unwrap_or_default();
		}
		state.resets += 1;
	}

	fn clear_all_errors(&self) {
		let mut state = self.state.borrow_mut();
		state.annotations.clear();
		for field in state.fields.iter_mut() {
			field.submit_error = false;
		}
	}

	fn scroll_to_top(&self) {
		self.state.borrow_mut().scrolled_to_top += 1;
	}

	fn csrf_token(&self) -> Option<String> {
		self.state.borrow().csrf_token.clone()
	}

	fn action(&self) -> Option<String> {
		self.state.borrow().action.clone()
	}

	fn method(&self) -> Option<String> {
		self.state.borrow().method.clone()
	}

	fn current_path(&self) -> String {
		self.state.borrow().path.clone()
	}
}

/// Records every toast.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
	toasts: RefCell<Vec<(ToastKind, String)>>,
}

impl RecordingNotifier {
	pub fn toasts(&self) -> Vec<(ToastKind, String)> {
		self.toasts.borrow().clone()
	}

	pub fn last(&self) -> Option<(ToastKind, String)> {
		self.toasts.borrow().last().cloned()
	}
}

impl Notifier for RecordingNotifier {
	fn notify(&self, kind: ToastKind, message: &str) {
		self.toasts.borrow_mut().push((kind, message.to_string()));
	}
}

/// Replies with queued responses and records every request.
///
/// An empty queue answers with a network error.
#[derive(Debug, Clone, Default)]
pub struct StubTransport {
	replies: Rc<RefCell<VecDeque<Result<SubmitResponse, TransportError>>>>,
	requests: Rc<RefCell<Vec<SubmitRequest>>>,
}

impl StubTransport {
	pub fn replying(reply: Result<SubmitResponse, TransportError>) -> Self {
		let transport = Self::default();
		transport.push(reply);
		transport
	}

	pub fn push(&self, reply: Result<SubmitResponse, TransportError>) {
		self.replies.borrow_mut().push_back(reply);
	}

	pub fn requests(&self) -> Vec<SubmitRequest> {
		self.requests.borrow().clone()
	}
}

#[async_trait(?Send)]
impl SubmitTransport for StubTransport {
	async fn send(&self, request: &SubmitRequest) -> Result<SubmitResponse, TransportError> {
		self.requests.borrow_mut().push(request.clone());
		self.replies
			.borrow_mut()
			.pop_front()
			.unwrap_or_else(|| Err(TransportError::network("no reply queued")))
	}
}

type Task = Box<dyn FnOnce() + 'static>;

#[derive(Default)]
struct Timeline {
	now: u64,
	next_id: u64,
	tasks: BTreeMap<u64, (u64, Task)>,
	runs: usize,
}

/// A virtual clock. Tasks run only when [`advance`](Self::advance) moves
/// time past their due point.
#[derive(Clone, Default)]
pub struct ManualScheduler {
	timeline: Rc<RefCell<Timeline>>,
}

impl std::fmt::Debug for ManualScheduler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let timeline = self.timeline.borrow();
		f.debug_struct("ManualScheduler")
			.field("now", &timeline.now)
			.field("pending", &timeline.tasks.len())
			.field("runs", &timeline.runs)
			.finish()
	}
}

/// Cancels its task when dropped.
#[derive(Debug)]
pub struct ManualHandle {
	id: u64,
	timeline: Weak<RefCell<Timeline>>,
}

impl Drop for ManualHandle {
	fn drop(&mut self) {
		if let Some(timeline) = self.timeline.upgrade()
			&& let Ok(mut inner) = timeline.try_borrow_mut()
		{
			inner.tasks.remove(&self.id);
		}
	}
}

impl ManualScheduler {
	pub fn new() -> Self {
		Self::default()
	}

	/// Moves the clock forward, running due tasks in due order.
	pub fn advance(&self, ms: u64) {
		let target = self.timeline.borrow().now + ms;
		loop {
			let next = {
				let mut timeline = self.timeline.borrow_mut();
				let due = timeline
					.tasks
					.iter()
					.filter(|(_, (at, _))| *at <= target)
					.min_by_key(|(id, (at, _))| (*at, **id))
					.map(|(id, (at, _))| (*id, *at));
				due.and_then(|(id, at)| {
					timeline.now = at;
					timeline.tasks.remove(&id).map(|(_, task)| task)
				})
			};
			match next {
				Some(task) => {
					task();
					self.timeline.borrow_mut().runs += 1;
				}
				None => break,
			}
		}
		self.timeline.borrow_mut().now = target;
	}

	/// Tasks run so far.
	pub fn runs(&self) -> usize {
		self.timeline.borrow().runs
	}

	/// Tasks waiting to run.
	pub fn pending(&self) -> usize {
		self.timeline.borrow().tasks.len()
	}
}

impl Schedule for ManualScheduler {
	type Handle = ManualHandle;

	fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce() + 'static>) -> ManualHandle {
		let mut timeline = self.timeline.borrow_mut();
		let id = timeline.next_id;
		timeline.next_id += 1;
		let due = timeline.now + u64::from(delay_ms);
		timeline.tasks.insert(id, (due, task));
		ManualHandle {
			id,
			timeline: Rc::downgrade(&self.timeline),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::cell::Cell;

	#[rstest]
	fn test_tasks_run_in_due_order() {
		let scheduler = ManualScheduler::new();
		let order = Rc::new(RefCell::new(Vec::new()));
		let mut handles = Vec::new();
		for (delay, tag) in [(300, "c"), (100, "a"), (200, "b")] {
			let order = order.clone();
			handles.push(scheduler.schedule(delay, Box::new(move || order.borrow_mut().push(tag))));
		}

		scheduler.advance(250);
		assert_eq!(*order.borrow(), ["a", "b"]);
		scheduler.advance(50);
		assert_eq!(*order.borrow(), ["a", "b", "c"]);
		assert_eq!(scheduler.runs(), 3);
	}

	#[rstest]
	fn test_dropped_handle_cancels() {
		let scheduler = ManualScheduler::new();
		let ran = Rc::new(Cell::new(false));
		let flag = ran.clone();
		let handle = scheduler.schedule(10, Box::new(move || flag.set(true)));
		drop(handle);
		scheduler.advance(100);
		assert!(!ran.get());
		assert_eq!(scheduler.pending(), 0);
	}

	#[rstest]
	fn test_memory_form_reset_restores_initial_values() {
		let form = MemoryForm::new().with_field(Field::new("city").with_value("Rabat"));
		form.set_value("city", "Fès");
		form.reset();
		assert_eq!(form.value("city").as_deref(), Some("Rabat"));
		assert_eq!(form.resets(), 1);
	}
}
