//! Direct contract writes through the user's wallet.
//!
//! This is the on-chain path of a manager change: used when the profile
//! cannot relay, and as the fallback when the relayer rejects a payload.

use async_trait::async_trait;
use manager_types::TxHash;
use thiserror::Error;

pub mod lens_hub;
pub mod types;

pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

pub use implementations::evm::alloy::AlloyDelivery;
pub use types::{ContractCall, TransactionReceipt};

#[derive(Debug, Error)]
pub enum DeliveryError {
	#[error("Network error: {0}")]
	Network(String),
	#[error("Transaction rejected: {0}")]
	Rejected(String),
	#[error("Transaction reverted: {0}")]
	Reverted(String),
	#[error("Timeout: {0}")]
	Timeout(String),
}

#[async_trait]
pub trait ContractWriter: Send + Sync {
	/// Chain the wallet is currently connected to.
	async fn chain_id(&self) -> Result<u64, DeliveryError>;

	/// Sends the call as a transaction and returns once it is submitted.
	async fn write_contract(&self, call: ContractCall) -> Result<TxHash, DeliveryError>;

	/// Waits until the transaction has `confirmations` blocks on top of it.
	async fn wait_for_confirmation(
		&self,
		hash: &TxHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError>;
}

/// Shortens a transaction hash for log lines.
pub fn truncate_hash(hash: &TxHash) -> String {
	let hash_str = hex::encode(hash.0);
	if hash_str.len() <= 8 {
		hash_str
	} else {
		format!("{}..", &hash_str[..8])
	}
}
