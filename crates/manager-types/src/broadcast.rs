//! Result of a gas-less relay broadcast.

use serde::{Deserialize, Serialize};

/// `broadcastOnchain` result, discriminated by its GraphQL `__typename`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum BroadcastResult {
	RelaySuccess {
		#[serde(rename = "txHash", default)]
		tx_hash: Option<String>,
		#[serde(rename = "txId")]
		tx_id: String,
	},
	RelayError {
		reason: String,
	},
	LensProfileManagerRelayError {
		reason: String,
	},
}

impl BroadcastResult {
	/// The relayer refused the payload; the caller should fall back to a
	/// direct contract write.
	pub fn is_relay_error(&self) -> bool {
		matches!(
			self,
			BroadcastResult::RelayError { .. } | BroadcastResult::LensProfileManagerRelayError { .. }
		)
	}

	pub fn typename(&self) -> &'static str {
		match self {
			BroadcastResult::RelaySuccess { .. } => "RelaySuccess",
			BroadcastResult::RelayError { .. } => "RelayError",
			BroadcastResult::LensProfileManagerRelayError { .. } => "LensProfileManagerRelayError",
		}
	}
}
