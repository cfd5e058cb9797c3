//! Cancellable scheduled tasks
//!
//! Timers are represented by handles that cancel their task when dropped.
//! The browser layer implements [`Schedule`] with `gloo-timers` timeouts;
//! tests use [`ManualScheduler`](crate::testing::ManualScheduler).

use std::cell::RefCell;

/// Schedules a task after a delay.
///
/// Dropping the returned handle before the delay elapses cancels the task.
pub trait Schedule {
	type Handle;

	fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce() + 'static>) -> Self::Handle;
}

/// Trailing-edge debounce.
///
/// Every [`call`](Self::call) replaces the pending task; only the last task
/// of a burst runs, `delay_ms` after the burst ends.
pub struct Debouncer<S: Schedule> {
	scheduler: S,
	delay_ms: u32,
	pending: RefCell<Option<S::Handle>>,
}

impl<S: Schedule> Debouncer<S> {
	pub fn new(scheduler: S, delay_ms: u32) -> Self {
		Self {
			scheduler,
			delay_ms,
			pending: RefCell::new(None),
		}
	}

	/// Schedules `task`, cancelling the previously pending one.
	pub fn call(&self, task: impl FnOnce() + 'static) {
		let handle = self.scheduler.schedule(self.delay_ms, Box::new(task));
		// Replacing drops (and so cancels) the previous handle.
		self.pending.replace(Some(handle));
	}

	/// Cancels the pending task, if any.
	pub fn cancel(&self) {
		self.pending.take();
	}

	pub fn delay_ms(&self) -> u32 {
		self.delay_ms
	}
}
