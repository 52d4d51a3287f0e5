//! Profile identity and the permissions derived from it.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lens profile identifier, a hex string such as `0x01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl ProfileId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// The on-chain token id of the profile.
	pub fn to_u256(&self) -> Result<U256, String> {
		U256::from_str(&self.0).map_err(|e| format!("Invalid profile id '{}': {}", self.0, e))
	}
}

impl fmt::Display for ProfileId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// The signed-in profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	pub id: ProfileId,
	pub owned_by: Address,
	/// Whether the Lens manager may sign on the profile's behalf.
	pub signless: bool,
	/// Whether the profile's gas is sponsored by the relayer.
	pub sponsor: bool,
}

/// Moderation state of the profile, supplied by the embedding application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRestriction {
	pub is_suspended: bool,
}

/// What a submission attempt is allowed to do, computed once per attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionCapability {
	/// The gas-less relay path may be attempted.
	pub can_relay: bool,
}

impl SubmissionCapability {
	/// The relayed payload carries the owner's own signature, so only
	/// sponsorship matters. `signless` governs the Lens manager, not relaying.
	pub fn from_profile(profile: &Profile) -> Self {
		Self {
			can_relay: profile.sponsor,
		}
	}
}
