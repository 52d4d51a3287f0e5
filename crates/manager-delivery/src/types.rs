//! Contract call and receipt types.

use alloy::primitives::{Address, Bytes};
use manager_types::TxHash;

/// An encoded contract invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
	/// Contract being called.
	pub to: Address,
	/// Solidity function name, for logging.
	pub function: &'static str,
	/// ABI-encoded calldata including the selector.
	pub data: Bytes,
}

/// Outcome of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
	pub hash: TxHash,
	pub block_number: u64,
	pub success: bool,
}
