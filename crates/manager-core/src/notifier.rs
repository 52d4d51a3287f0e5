//! User-visible notifications.

use manager_types::{Notification, NotificationLevel};
use tracing::{error, info};

/// Surfaces the outcome of a submission to the user.
///
/// Called once per attempt, when it finishes.
pub trait Notifier: Send + Sync {
	/// Shows `notification`; must not block.
	fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
	fn notify(&self, notification: Notification) {
		match notification.level {
			NotificationLevel::Success => info!(message = %notification.message, "Notification"),
			NotificationLevel::Error => error!(message = %notification.message, "Notification"),
		}
	}
}
