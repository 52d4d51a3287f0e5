//! EIP-712 typed data for `changeDelegatedExecutorsConfig`.
//!
//! The Lens API returns the typed data split into `domain`, `types` and
//! `value`. The same payload is consumed two ways: as an EIP-712 message for
//! the off-chain signature, and as decoded call arguments for the direct
//! contract write.

use crate::serde_helpers::number_or_string;
use alloy::dyn_abi::TypedData;
use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Primary type of the change-managers typed data.
pub const CHANGE_DELEGATED_EXECUTORS_TYPE: &str = "ChangeDelegatedExecutorsConfig";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypedDataError {
	#[error("Invalid delegator profile id: {0}")]
	InvalidProfileId(String),
	#[error("Mismatched executors and approvals: {executors} executors, {approvals} approvals")]
	LengthMismatch { executors: usize, approvals: usize },
	#[error("EIP-712 encoding failed: {0}")]
	Eip712(String),
}

/// Typed data issued by `createChangeProfileManagersTypedData`.
///
/// The `id` is what the relay broadcast refers back to; the embedded nonce
/// has been reserved server-side as soon as this payload exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataPayload {
	pub id: String,
	#[serde(default)]
	pub expires_at: Option<String>,
	pub typed_data: ChangeManagersTypedData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeManagersTypedData {
	pub domain: TypedDataDomain,
	pub types: ChangeManagersTypes,
	pub value: ChangeDelegatedExecutorsValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataDomain {
	pub name: String,
	pub version: String,
	#[serde(with = "number_or_string")]
	pub chain_id: u64,
	pub verifying_contract: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeManagersTypes {
	#[serde(rename = "ChangeDelegatedExecutorsConfig")]
	pub change_delegated_executors_config: Vec<TypedDataField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedDataField {
	pub name: String,
	#[serde(rename = "type")]
	pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDelegatedExecutorsValue {
	#[serde(with = "number_or_string")]
	pub nonce: u64,
	#[serde(with = "number_or_string")]
	pub deadline: u64,
	pub delegator_profile_id: String,
	pub delegated_executors: Vec<Address>,
	pub approvals: Vec<bool>,
	#[serde(with = "number_or_string")]
	pub config_number: u64,
	pub switch_to_given_config: bool,
}

/// Arguments of `LensHub.changeDelegatedExecutorsConfig`, in ABI order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeDelegatedExecutorsArgs {
	pub delegator_profile_id: U256,
	pub delegated_executors: Vec<Address>,
	pub approvals: Vec<bool>,
	pub config_number: u64,
	pub switch_to_given_config: bool,
}

impl TypedDataPayload {
	pub fn chain_id(&self) -> u64 {
		self.typed_data.domain.chain_id
	}

	pub fn nonce(&self) -> u64 {
		self.typed_data.value.nonce
	}

	/// Decodes the contract call arguments embedded in the typed data value.
	pub fn call_args(&self) -> Result<ChangeDelegatedExecutorsArgs, TypedDataError> {
		let value = &self.typed_data.value;

		if value.delegated_executors.len() != value.approvals.len() {
			return Err(TypedDataError::LengthMismatch {
				executors: value.delegated_executors.len(),
				approvals: value.approvals.len(),
			});
		}

		let delegator_profile_id = U256::from_str(&value.delegator_profile_id)
			.map_err(|e| TypedDataError::InvalidProfileId(format!("{}: {}", value.delegator_profile_id, e)))?;

		Ok(ChangeDelegatedExecutorsArgs {
			delegator_profile_id,
			delegated_executors: value.delegated_executors.clone(),
			approvals: value.approvals.clone(),
			config_number: value.config_number,
			switch_to_given_config: value.switch_to_given_config,
		})
	}

	/// Builds the EIP-712 structure a wallet signs.
	pub fn to_eip712(&self) -> Result<TypedData, TypedDataError> {
		let args = self.call_args()?;
		let domain = &self.typed_data.domain;
		let value = &self.typed_data.value;

		let json = serde_json::json!({
			"types": {
				CHANGE_DELEGATED_EXECUTORS_TYPE: self.typed_data.types.change_delegated_executors_config,
			},
			"primaryType": CHANGE_DELEGATED_EXECUTORS_TYPE,
			"domain": {
				"name": domain.name,
				"version": domain.version,
				"chainId": domain.chain_id,
				"verifyingContract": domain.verifying_contract,
			},
			"message": {
				"delegatorProfileId": args.delegator_profile_id.to_string(),
				"delegatedExecutors": value.delegated_executors,
				"approvals": value.approvals,
				"configNumber": value.config_number,
				"switchToGivenConfig": value.switch_to_given_config,
				"nonce": value.nonce,
				"deadline": value.deadline,
			},
		});

		serde_json::from_value(json).map_err(|e| TypedDataError::Eip712(e.to_string()))
	}

	/// The digest the wallet signs.
	pub fn signing_hash(&self) -> Result<B256, TypedDataError> {
		self.to_eip712()?
			.eip712_signing_hash()
			.map_err(|e| TypedDataError::Eip712(e.to_string()))
	}
}
