//! Alloy-based contract writer.
//!
//! Submits calls as transactions through an HTTP provider whose wallet
//! signs them, and polls for receipts when the caller wants to wait for
//! inclusion.

use crate::{truncate_hash, ContractCall, ContractWriter, DeliveryError, TransactionReceipt};
use alloy::network::{Ethereum, EthereumWallet, TransactionBuilder};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use manager_types::TxHash;
use std::time::Duration;
use tracing::{debug, info};

/// Seconds allowed per requested confirmation before giving up.
const SECONDS_PER_CONFIRMATION: u64 = 20;
const MAX_WAIT_SECONDS: u64 = 3600;

/// Wait budget for `confirmations` blocks, clamped to `MAX_WAIT_SECONDS`.
fn confirmation_timeout_secs(confirmations: u64) -> u64 {
	confirmations
		.saturating_mul(SECONDS_PER_CONFIRMATION)
		.clamp(SECONDS_PER_CONFIRMATION, MAX_WAIT_SECONDS)
}

pub struct AlloyDelivery {
	provider: Box<dyn Provider<Ethereum>>,
	poll_interval: Duration,
}

impl AlloyDelivery {
	/// Connects a provider to `rpc_url` with `signer` as the sending wallet.
	///
	/// The connection is lazy; nothing is requested from the node here.
	pub fn new(
		rpc_url: &str,
		chain_id: u64,
		signer: PrivateKeySigner,
	) -> Result<Self, DeliveryError> {
		let url = rpc_url
			.parse()
			.map_err(|e| DeliveryError::Network(format!("Invalid RPC URL: {}", e)))?;

		debug!(address = %signer.address(), chain_id, "Configuring contract writer");
		let wallet = EthereumWallet::from(signer);

		let provider = ProviderBuilder::new()
			.with_chain_id(chain_id)
			.wallet(wallet)
			.connect_http(url);

		Ok(Self {
			provider: Box::new(provider),
			poll_interval: Duration::from_secs(2),
		})
	}

	pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
		self.poll_interval = poll_interval;
		self
	}
}

#[async_trait]
impl ContractWriter for AlloyDelivery {
	async fn chain_id(&self) -> Result<u64, DeliveryError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get chain ID: {}", e)))
	}

	async fn write_contract(&self, call: ContractCall) -> Result<TxHash, DeliveryError> {
		let request = TransactionRequest::default()
			.with_to(call.to)
			.with_input(call.data.clone());

		let pending_tx = self
			.provider
			.send_transaction(request)
			.await
			.map_err(|e| DeliveryError::Rejected(format!("{} failed: {}", call.function, e)))?;

		let tx_hash = *pending_tx.tx_hash();
		info!(
			function = call.function,
			to = %call.to,
			tx_hash = %truncate_hash(&tx_hash),
			"Submitted contract call"
		);

		Ok(tx_hash)
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TxHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		let timeout_seconds = confirmation_timeout_secs(confirmations);
		let max_wait_time = Duration::from_secs(timeout_seconds);
		let start_time = tokio::time::Instant::now();

		info!(
			tx_hash = %truncate_hash(hash),
			"Waiting for {} confirmations (timeout: {}s)",
			confirmations,
			timeout_seconds
		);

		loop {
			if start_time.elapsed() > max_wait_time {
				return Err(DeliveryError::Timeout(format!(
					"{} confirmations not reached after {} seconds",
					confirmations, timeout_seconds
				)));
			}

			let receipt = match self.provider.get_transaction_receipt(*hash).await {
				Ok(Some(receipt)) => receipt,
				Ok(None) => {
					tokio::time::sleep(self.poll_interval).await;
					continue;
				}
				Err(e) => {
					return Err(DeliveryError::Network(format!(
						"Failed to get receipt: {}",
						e
					)));
				}
			};

			if !receipt.status() {
				return Err(DeliveryError::Reverted(format!(
					"Transaction {} reverted",
					truncate_hash(hash)
				)));
			}

			let current_block = self.provider.get_block_number().await.map_err(|e| {
				DeliveryError::Network(format!("Failed to get block number: {}", e))
			})?;

			let tx_block = receipt.block_number.unwrap_or(0);
			let current_confirmations = current_block.saturating_sub(tx_block);

			if current_confirmations >= confirmations {
				return Ok(TransactionReceipt {
					hash: receipt.transaction_hash,
					block_number: tx_block,
					success: true,
				});
			}

			debug!(
				"Waiting for {} more confirmations...",
				confirmations.saturating_sub(current_confirmations)
			);

			tokio::time::sleep(self.poll_interval).await;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_invalid_rpc_url_is_rejected() {
		let signer = PrivateKeySigner::random();
		let result = AlloyDelivery::new("not a url", 137, signer);
		assert!(matches!(result, Err(DeliveryError::Network(_))));
	}

	#[test]
	fn test_confirmation_timeout_is_clamped() {
		assert_eq!(confirmation_timeout_secs(0), SECONDS_PER_CONFIRMATION);
		assert_eq!(confirmation_timeout_secs(3), 3 * SECONDS_PER_CONFIRMATION);
		assert_eq!(confirmation_timeout_secs(u64::MAX), MAX_WAIT_SECONDS);
	}

	#[test]
	fn test_truncate_hash() {
		let hash = TxHash::repeat_byte(0xab);
		assert_eq!(truncate_hash(&hash), "abababab..");
	}
}
