//! Submission state machine types.

use crate::{ChangeManagerAction, SubmitError};
use alloy::primitives::{Address, TxHash};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// States of one submission attempt.
///
/// `Idle → RequestingSignature → {Broadcasting → (Success | FallingBack →
/// DirectSubmitting) | DirectSubmitting} → (Success | Failed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionState {
	Idle,
	RequestingSignature,
	Broadcasting,
	FallingBack,
	DirectSubmitting,
	Success,
	Failed,
}

impl SubmissionState {
	pub fn is_terminal(&self) -> bool {
		matches!(self, SubmissionState::Success | SubmissionState::Failed)
	}

	/// Whether `next` is a legal successor of `self`.
	pub fn can_transition_to(&self, next: SubmissionState) -> bool {
		use SubmissionState::*;
		matches!(
			(self, next),
			(Idle, RequestingSignature)
				| (Idle, Failed)
				| (RequestingSignature, Broadcasting)
				| (RequestingSignature, DirectSubmitting)
				| (RequestingSignature, Failed)
				| (Broadcasting, Success)
				| (Broadcasting, FallingBack)
				| (Broadcasting, Failed)
				| (FallingBack, DirectSubmitting)
				| (DirectSubmitting, Success)
				| (DirectSubmitting, Failed)
		)
	}
}

impl fmt::Display for SubmissionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			SubmissionState::Idle => "idle",
			SubmissionState::RequestingSignature => "requesting_signature",
			SubmissionState::Broadcasting => "broadcasting",
			SubmissionState::FallingBack => "falling_back",
			SubmissionState::DirectSubmitting => "direct_submitting",
			SubmissionState::Success => "success",
			SubmissionState::Failed => "failed",
		};
		write!(f, "{}", name)
	}
}

/// Terminal result of a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
	/// The relayer accepted the signed payload.
	Relayed {
		tx_hash: Option<String>,
		tx_id: String,
	},
	/// The relayer rejected the payload and the direct call was submitted.
	RelayFallback { tx_hash: TxHash, reason: String },
	/// The account cannot relay; the direct call was submitted.
	DirectCallSubmitted { tx_hash: TxHash },
	Failed(SubmitError),
}

impl SubmissionOutcome {
	pub fn is_success(&self) -> bool {
		!matches!(self, SubmissionOutcome::Failed(_))
	}

	/// Hash of the transaction the wallet sent, when the direct path ran.
	pub fn direct_tx_hash(&self) -> Option<TxHash> {
		match self {
			SubmissionOutcome::RelayFallback { tx_hash, .. }
			| SubmissionOutcome::DirectCallSubmitted { tx_hash } => Some(*tx_hash),
			_ => None,
		}
	}
}

/// A state transition of one attempt, published on the event bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionEvent {
	pub attempt_id: Uuid,
	pub address: Address,
	pub action: ChangeManagerAction,
	pub state: SubmissionState,
	pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLevel {
	Success,
	Error,
}

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
	pub level: NotificationLevel,
	pub message: String,
}

impl Notification {
	pub fn success(message: impl Into<String>) -> Self {
		Self {
			level: NotificationLevel::Success,
			message: message.into(),
		}
	}

	pub fn error(message: impl Into<String>) -> Self {
		Self {
			level: NotificationLevel::Error,
			message: message.into(),
		}
	}
}
