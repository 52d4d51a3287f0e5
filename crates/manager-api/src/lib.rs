//! Client for the Lens API operations the manager flow depends on.
//!
//! The [`LensApi`] trait is the seam the submitter and the manager list are
//! written against; [`GraphQlClient`] talks to the real GraphQL endpoint.

use async_trait::async_trait;
use manager_types::{
	BroadcastResult, ManagerChangeRequest, ManagersPage, Profile, ProfileId, TypedDataPayload,
};
use thiserror::Error;

pub mod queries;

pub mod implementations {
	pub mod graphql;
}

pub use implementations::graphql::GraphQlClient;

#[derive(Debug, Error)]
pub enum ApiError {
	#[error("Network error: {0}")]
	Network(String),
	#[error("HTTP {status}: {body}")]
	Http { status: u16, body: String },
	#[error("GraphQL error: {0}")]
	GraphQl(String),
	#[error("Decode error: {0}")]
	Decode(String),
}

#[async_trait]
pub trait LensApi: Send + Sync {
	/// Requests typed data for a manager change, pinning the signature nonce
	/// to `nonce_override` so concurrent operations cannot race on it.
	async fn create_change_profile_managers_typed_data(
		&self,
		changes: &[ManagerChangeRequest],
		nonce_override: u64,
	) -> Result<TypedDataPayload, ApiError>;

	/// Hands a signed typed data payload to the relayer.
	async fn broadcast_onchain(
		&self,
		id: &str,
		signature: &str,
	) -> Result<BroadcastResult, ApiError>;

	/// One page of the managers of `profile_id`, starting at `cursor`.
	async fn profile_managers(
		&self,
		profile_id: &ProfileId,
		cursor: Option<&str>,
	) -> Result<ManagersPage, ApiError>;

	/// Current `LensHub` on-chain signature nonce of the authenticated wallet.
	async fn lens_hub_onchain_sig_nonce(&self) -> Result<u64, ApiError>;

	async fn profile(&self, id: &ProfileId) -> Result<Option<Profile>, ApiError>;
}
