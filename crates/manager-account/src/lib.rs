//! Wallet capability: signing Lens typed data.

use alloy::primitives::{Address, Signature};
use async_trait::async_trait;
use manager_types::TypedDataPayload;
use thiserror::Error;

pub mod implementations {
	pub mod approval;
	pub mod local;
}

pub use implementations::approval::{ApprovalGate, Approver};
pub use implementations::local::LocalWallet;

#[derive(Debug, Error)]
pub enum AccountError {
	#[error("User rejected the signature request")]
	UserRejected,
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	#[error("Invalid typed data: {0}")]
	InvalidTypedData(String),
}

/// Signs EIP-712 typed data on behalf of the profile owner.
///
/// Signing may suspend on user interaction and may be declined, in which
/// case implementations return [`AccountError::UserRejected`].
#[async_trait]
pub trait TypedDataSigner: Send + Sync {
	async fn address(&self) -> Result<Address, AccountError>;
	async fn sign_typed_data(&self, payload: &TypedDataPayload) -> Result<Signature, AccountError>;
}

/// Hex encoding of a 65-byte `(r, s, v)` signature, as the broadcast
/// endpoint expects it.
pub fn signature_hex(signature: &Signature) -> String {
	format!("0x{}", hex::encode(signature.as_bytes()))
}
