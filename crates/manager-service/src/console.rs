//! Terminal adapters: signature prompts and notifications.

use async_trait::async_trait;
use manager_account::Approver;
use manager_core::Notifier;
use manager_types::{Notification, NotificationLevel};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

/// Asks for confirmation on stdin before each signature.
pub struct StdinApprover;

#[async_trait]
impl Approver for StdinApprover {
	async fn approve(&self, summary: &str) -> bool {
		let mut stderr = tokio::io::stderr();
		let prompt = format!("{}\nSign? [y/N] ", summary);
		if let Err(e) = stderr.write_all(prompt.as_bytes()).await {
			warn!(error = %e, "Failed to write signature prompt");
			return false;
		}
		let _ = stderr.flush().await;

		let mut line = String::new();
		let mut stdin = BufReader::new(tokio::io::stdin());
		match stdin.read_line(&mut line).await {
			Ok(_) => is_yes(&line),
			Err(e) => {
				warn!(error = %e, "Failed to read signature confirmation");
				false
			}
		}
	}
}

fn is_yes(answer: &str) -> bool {
	matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Prints notifications the way a toast would show them.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
	fn notify(&self, notification: Notification) {
		match notification.level {
			NotificationLevel::Success => println!("✔ {}", notification.message),
			NotificationLevel::Error => eprintln!("✘ {}", notification.message),
		}
	}
}
