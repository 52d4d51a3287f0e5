//! Broadcast channel for submission state transitions.
//!
//! The submitter publishes one [`SubmissionEvent`] per state change; callers
//! and tests subscribe to follow an attempt without polling.

use manager_types::SubmissionEvent;
use tokio::sync::broadcast;

/// Fan-out of [`SubmissionEvent`]s to any number of subscribers.
///
/// Cloning yields another handle to the same channel. Events published while
/// nobody is subscribed are dropped.
#[derive(Clone)]
pub struct EventBus {
	/// Sending half of the broadcast channel.
	sender: broadcast::Sender<SubmissionEvent>,
}

impl EventBus {
	/// Creates a bus buffering up to `capacity` events per subscriber.
	///
	/// A subscriber that falls further behind loses the oldest events and
	/// sees a `Lagged` error on its next receive.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Creates a receiver for every event published from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<SubmissionEvent> {
		self.sender.subscribe()
	}

	/// Publishes `event` to the current subscribers.
	///
	/// Returns the number of subscribers that received it; zero when nobody
	/// is listening, which is not an error for the submitter.
	pub fn publish(&self, event: SubmissionEvent) -> usize {
		self.sender.send(event).unwrap_or(0)
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new(64)
	}
}
