//! Browser timers behind the [`Schedule`] seam

use formkit_forms::Schedule;
use gloo_timers::callback::Timeout;

/// Schedules tasks with `setTimeout`.
///
/// The returned [`Timeout`] clears the timer when dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeoutScheduler;

impl Schedule for TimeoutScheduler {
	type Handle = Timeout;

	fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce() + 'static>) -> Timeout {
		Timeout::new(delay_ms, task)
	}
}
