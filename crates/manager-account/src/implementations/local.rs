//! Local private key wallet.

use crate::{AccountError, TypedDataSigner};
use alloy::primitives::{Address, Signature};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use async_trait::async_trait;
use manager_types::TypedDataPayload;
use tracing::debug;

/// Wallet holding its private key in memory.
///
/// Never declines a signature on its own; wrap it in an
/// [`ApprovalGate`](crate::ApprovalGate) to ask the user first.
pub struct LocalWallet {
	signer: PrivateKeySigner,
}

impl LocalWallet {
	/// Creates a wallet from a hex-encoded private key, with or without `0x`.
	pub fn new(private_key_hex: &str) -> Result<Self, AccountError> {
		let signer = private_key_hex
			.parse::<PrivateKeySigner>()
			.map_err(|e| AccountError::InvalidKey(format!("Invalid private key: {}", e)))?;

		Ok(Self { signer })
	}

	pub fn signer(&self) -> &PrivateKeySigner {
		&self.signer
	}
}

impl From<PrivateKeySigner> for LocalWallet {
	fn from(signer: PrivateKeySigner) -> Self {
		Self { signer }
	}
}

#[async_trait]
impl TypedDataSigner for LocalWallet {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	async fn sign_typed_data(&self, payload: &TypedDataPayload) -> Result<Signature, AccountError> {
		let hash = payload
			.signing_hash()
			.map_err(|e| AccountError::InvalidTypedData(e.to_string()))?;

		debug!(typed_data_id = %payload.id, %hash, "Signing typed data");

		self.signer
			.sign_hash(&hash)
			.await
			.map_err(|e| AccountError::SigningFailed(format!("Failed to sign typed data: {}", e)))
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::signature_hex;

	const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	pub(crate) fn payload() -> TypedDataPayload {
		serde_json::from_value(serde_json::json!({
			"id": "typed-data-1",
			"typedData": {
				"domain": {
					"name": "Lens Protocol Profiles",
					"version": "2",
					"chainId": 80002,
					"verifyingContract": "0xA2574D9DdB6A325Ad2Be838Bd854228B80215148"
				},
				"types": {
					"ChangeDelegatedExecutorsConfig": [
						{"name": "delegatorProfileId", "type": "uint256"},
						{"name": "delegatedExecutors", "type": "address[]"},
						{"name": "approvals", "type": "bool[]"},
						{"name": "configNumber", "type": "uint64"},
						{"name": "switchToGivenConfig", "type": "bool"},
						{"name": "nonce", "type": "uint256"},
						{"name": "deadline", "type": "uint256"}
					]
				},
				"value": {
					"nonce": 0,
					"deadline": 1792152000,
					"delegatorProfileId": "0x2a",
					"delegatedExecutors": ["0x70997970C51812dc3A010C7d01b50e0d17dc79C8"],
					"approvals": [false],
					"configNumber": 1,
					"switchToGivenConfig": true
				}
			}
		}))
		.unwrap()
	}

	#[test]
	fn test_rejects_invalid_key() {
		assert!(matches!(
			LocalWallet::new("0x1234"),
			Err(AccountError::InvalidKey(_))
		));
	}

	#[tokio::test]
	async fn test_signature_recovers_wallet_address() {
		let wallet = LocalWallet::new(TEST_KEY).unwrap();
		let payload = payload();

		let signature = wallet.sign_typed_data(&payload).await.unwrap();
		let recovered = signature
			.recover_address_from_prehash(&payload.signing_hash().unwrap())
			.unwrap();

		assert_eq!(recovered, wallet.address().await.unwrap());
	}

	#[tokio::test]
	async fn test_signature_hex_is_65_bytes() {
		let wallet = LocalWallet::new(TEST_KEY).unwrap();
		let signature = wallet.sign_typed_data(&payload()).await.unwrap();
		let encoded = signature_hex(&signature);

		assert!(encoded.starts_with("0x"));
		assert_eq!(encoded.len(), 2 + 65 * 2);
	}
}
