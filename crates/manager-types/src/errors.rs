//! Error taxonomy of a manager change submission.
//!
//! Relay rejections are not listed here: they are recovered by falling back
//! to the direct contract write and never terminate a submission.

use alloy::primitives::Address;
use thiserror::Error;

/// Suspension message shown to the user.
pub const SUSPENDED_MESSAGE: &str = "Your profile has been suspended!";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
	/// Checked before any network request is issued.
	#[error("{}", SUSPENDED_MESSAGE)]
	SuspendedAccount,

	#[error("A manager change for {0} is already in progress")]
	AlreadyInProgress(Address),

	/// Typed data creation failed or the API was unreachable.
	#[error("Remote error: {0}")]
	Remote(String),

	#[error("Invalid typed data: {0}")]
	InvalidPayload(String),

	#[error("User rejected the signature request")]
	UserRejectedSignature,

	#[error("Signing failed: {0}")]
	Signing(String),

	#[error("Wrong network: typed data is for chain {expected}, wallet is on chain {actual}")]
	WrongNetwork { expected: u64, actual: u64 },

	#[error("Contract write failed: {0}")]
	ContractWrite(String),
}
