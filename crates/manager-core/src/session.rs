//! Signed-in session: profile, restriction, and the signature nonce.

use crate::CoreError;
use manager_api::LensApi;
use manager_types::{Profile, ProfileId, ProfileRestriction, SubmissionCapability};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// `LensHub` on-chain signature nonce of the session's wallet.
///
/// Advanced as soon as a typed data payload reserves the current value,
/// not when the transaction lands. An attempt abandoned after that point
/// leaves a gap that is never reconciled.
#[derive(Debug, Default)]
pub struct SigNonce(AtomicU64);

impl SigNonce {
	pub fn new(value: u64) -> Self {
		Self(AtomicU64::new(value))
	}

	pub fn current(&self) -> u64 {
		self.0.load(Ordering::SeqCst)
	}

	/// Advances by one and returns the new value.
	pub fn increment(&self) -> u64 {
		self.0.fetch_add(1, Ordering::SeqCst) + 1
	}

	/// Replaces the value, e.g. after re-reading it from the API.
	pub fn reset(&self, value: u64) {
		self.0.store(value, Ordering::SeqCst);
	}
}

pub struct Session {
	profile: Profile,
	restriction: ProfileRestriction,
	nonce: SigNonce,
}

impl Session {
	pub fn new(profile: Profile, nonce: u64) -> Self {
		Self {
			profile,
			restriction: ProfileRestriction::default(),
			nonce: SigNonce::new(nonce),
		}
	}

	/// Loads the profile and seeds the nonce from the Lens API.
	pub async fn load(api: &dyn LensApi, profile_id: &ProfileId) -> Result<Self, CoreError> {
		let profile = api
			.profile(profile_id)
			.await?
			.ok_or_else(|| CoreError::ProfileNotFound(profile_id.to_string()))?;
		let nonce = api.lens_hub_onchain_sig_nonce().await?;

		info!(
			profile_id = %profile.id,
			signless = profile.signless,
			sponsor = profile.sponsor,
			nonce,
			"Session loaded"
		);

		Ok(Self::new(profile, nonce))
	}

	pub fn with_restriction(mut self, restriction: ProfileRestriction) -> Self {
		self.restriction = restriction;
		self
	}

	pub fn profile(&self) -> &Profile {
		&self.profile
	}

	pub fn restriction(&self) -> ProfileRestriction {
		self.restriction
	}

	pub fn nonce(&self) -> &SigNonce {
		&self.nonce
	}

	pub fn capability(&self) -> SubmissionCapability {
		SubmissionCapability::from_profile(&self.profile)
	}
}
