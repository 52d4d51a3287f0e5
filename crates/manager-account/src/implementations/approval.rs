//! User confirmation in front of a signer.

use crate::{AccountError, TypedDataSigner};
use alloy::primitives::{Address, Signature};
use async_trait::async_trait;
use manager_types::TypedDataPayload;
use tracing::{info, warn};

/// Asks the user whether a typed data payload may be signed.
#[async_trait]
pub trait Approver: Send + Sync {
	async fn approve(&self, summary: &str) -> bool;
}

/// Wraps a signer so that every signature is confirmed by an [`Approver`].
///
/// A declined prompt surfaces as [`AccountError::UserRejected`], the same
/// way a browser wallet reports a rejected request.
pub struct ApprovalGate<S> {
	inner: S,
	approver: Box<dyn Approver>,
}

impl<S: TypedDataSigner> ApprovalGate<S> {
	pub fn new(inner: S, approver: Box<dyn Approver>) -> Self {
		Self { inner, approver }
	}
}

fn summarize(payload: &TypedDataPayload) -> String {
	let value = &payload.typed_data.value;
	let changes: Vec<String> = value
		.delegated_executors
		.iter()
		.zip(value.approvals.iter())
		.map(|(executor, approved)| {
			format!("{} {}", if *approved { "add" } else { "remove" }, executor)
		})
		.collect();

	format!(
		"Sign {} for profile {} on chain {} (nonce {}): {}",
		payload.typed_data.domain.name,
		value.delegator_profile_id,
		payload.chain_id(),
		value.nonce,
		changes.join(", ")
	)
}

#[async_trait]
impl<S: TypedDataSigner> TypedDataSigner for ApprovalGate<S> {
	async fn address(&self) -> Result<Address, AccountError> {
		self.inner.address().await
	}

	async fn sign_typed_data(&self, payload: &TypedDataPayload) -> Result<Signature, AccountError> {
		let summary = summarize(payload);

		if !self.approver.approve(&summary).await {
			warn!(typed_data_id = %payload.id, "Signature request rejected");
			return Err(AccountError::UserRejected);
		}

		info!(typed_data_id = %payload.id, "Signature request approved");
		self.inner.sign_typed_data(payload).await
	}
}
