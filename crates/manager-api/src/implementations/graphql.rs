//! GraphQL-over-HTTP implementation of [`LensApi`].

use crate::{queries, ApiError, LensApi};
use async_trait::async_trait;
use manager_types::serde_helpers::number_or_string;
use manager_types::{
	Address, BroadcastResult, ManagerChangeRequest, ManagersPage, Profile, ProfileId,
	TypedDataPayload,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

const ACCESS_TOKEN_HEADER: &str = "x-access-token";

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
	data: Option<T>,
	#[serde(default)]
	errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
	message: String,
}

#[derive(Deserialize)]
struct CreateTypedDataData {
	#[serde(rename = "createChangeProfileManagersTypedData")]
	result: TypedDataPayload,
}

#[derive(Deserialize)]
struct BroadcastOnchainData {
	#[serde(rename = "broadcastOnchain")]
	result: BroadcastResult,
}

#[derive(Deserialize)]
struct ProfileManagersData {
	#[serde(rename = "profileManagers")]
	result: ManagersPage,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserSigNoncesData {
	user_sig_nonces: UserSigNonces,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserSigNonces {
	#[serde(with = "number_or_string")]
	lens_hub_onchain_sig_nonce: u64,
}

#[derive(Deserialize)]
struct ProfileData {
	profile: Option<ProfileNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileNode {
	id: ProfileId,
	#[serde(default)]
	signless: bool,
	#[serde(default)]
	sponsor: bool,
	owned_by: OwnedBy,
}

#[derive(Deserialize)]
struct OwnedBy {
	address: Address,
}

impl From<ProfileNode> for Profile {
	fn from(node: ProfileNode) -> Self {
		Profile {
			id: node.id,
			owned_by: node.owned_by.address,
			signless: node.signless,
			sponsor: node.sponsor,
		}
	}
}

/// Lens API client posting `{query, variables}` documents.
#[derive(Clone)]
pub struct GraphQlClient {
	http: reqwest::Client,
	endpoint: String,
	access_token: Option<String>,
}

impl GraphQlClient {
	pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
		let http = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

		Ok(Self {
			http,
			endpoint: endpoint.into(),
			access_token: None,
		})
	}

	pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(token.into());
		self
	}

	async fn execute<T: DeserializeOwned>(
		&self,
		operation: &str,
		query: &str,
		variables: Value,
	) -> Result<T, ApiError> {
		debug!(operation, "Sending GraphQL request");

		let mut request = self.http.post(&self.endpoint).json(&json!({
			"operationName": operation,
			"query": query,
			"variables": variables,
		}));
		if let Some(token) = &self.access_token {
			request = request.header(ACCESS_TOKEN_HEADER, token);
		}

		let response = request
			.send()
			.await
			.map_err(|e| ApiError::Network(format!("{} request failed: {}", operation, e)))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			warn!(operation, status = status.as_u16(), "GraphQL request rejected");
			return Err(ApiError::Http {
				status: status.as_u16(),
				body,
			});
		}

		let body: GraphQlResponse<T> = response
			.json()
			.await
			.map_err(|e| ApiError::Decode(format!("{} response: {}", operation, e)))?;

		if !body.errors.is_empty() {
			let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
			return Err(ApiError::GraphQl(messages.join("; ")));
		}

		body.data
			.ok_or_else(|| ApiError::Decode(format!("{} response has no data", operation)))
	}
}

#[async_trait]
impl LensApi for GraphQlClient {
	async fn create_change_profile_managers_typed_data(
		&self,
		changes: &[ManagerChangeRequest],
		nonce_override: u64,
	) -> Result<TypedDataPayload, ApiError> {
		let data: CreateTypedDataData = self
			.execute(
				"CreateChangeProfileManagersTypedData",
				queries::CREATE_CHANGE_PROFILE_MANAGERS_TYPED_DATA,
				json!({
					"options": { "overrideSigNonce": nonce_override },
					"request": { "changeManagers": changes },
				}),
			)
			.await?;

		Ok(data.result)
	}

	async fn broadcast_onchain(
		&self,
		id: &str,
		signature: &str,
	) -> Result<BroadcastResult, ApiError> {
		let data: BroadcastOnchainData = self
			.execute(
				"BroadcastOnchain",
				queries::BROADCAST_ONCHAIN,
				json!({ "request": { "id": id, "signature": signature } }),
			)
			.await?;

		Ok(data.result)
	}

	async fn profile_managers(
		&self,
		profile_id: &ProfileId,
		cursor: Option<&str>,
	) -> Result<ManagersPage, ApiError> {
		let mut request = json!({ "for": profile_id });
		if let Some(cursor) = cursor {
			request["cursor"] = json!(cursor);
		}

		let data: ProfileManagersData = self
			.execute(
				"ProfileManagers",
				queries::PROFILE_MANAGERS,
				json!({ "request": request }),
			)
			.await?;

		Ok(data.result)
	}

	async fn lens_hub_onchain_sig_nonce(&self) -> Result<u64, ApiError> {
		let data: UserSigNoncesData = self
			.execute("UserSigNonces", queries::USER_SIG_NONCES, json!({}))
			.await?;

		Ok(data.user_sig_nonces.lens_hub_onchain_sig_nonce)
	}

	async fn profile(&self, id: &ProfileId) -> Result<Option<Profile>, ApiError> {
		let data: ProfileData = self
			.execute(
				"Profile",
				queries::PROFILE,
				json!({ "request": { "forProfileId": id } }),
			)
			.await?;

		Ok(data.profile.map(Profile::from))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use wiremock::matchers::{body_partial_json, header, method};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	async fn client(server: &MockServer) -> GraphQlClient {
		GraphQlClient::new(server.uri(), Duration::from_secs(5))
			.unwrap()
			.with_access_token("token-123")
	}

	#[tokio::test]
	async fn test_typed_data_request_carries_nonce_override() {
		let server = MockServer::start().await;
		let address: Address = "0x000000000000000000000000000000000000aBc0".parse().unwrap();

		Mock::given(method("POST"))
			.and(header(ACCESS_TOKEN_HEADER, "token-123"))
			.and(body_partial_json(json!({
				"operationName": "CreateChangeProfileManagersTypedData",
				"variables": {
					"options": { "overrideSigNonce": 9 },
					"request": { "changeManagers": [{ "action": "REMOVE", "address": address }] }
				}
			})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"data": {
					"createChangeProfileManagersTypedData": {
						"id": "td-1",
						"expiresAt": null,
						"typedData": {
							"domain": {
								"name": "Lens Protocol Profiles",
								"version": "2",
								"chainId": 137,
								"verifyingContract": "0xDb46d1Dc155634FbC732f92E853b10B288AD5a1d"
							},
							"types": { "ChangeDelegatedExecutorsConfig": [] },
							"value": {
								"nonce": 9,
								"deadline": 1792152000,
								"delegatorProfileId": "0x01",
								"delegatedExecutors": [address],
								"approvals": [false],
								"configNumber": 0,
								"switchToGivenConfig": false
							}
						}
					}
				}
			})))
			.expect(1)
			.mount(&server)
			.await;

		let payload = client(&server)
			.await
			.create_change_profile_managers_typed_data(&[ManagerChangeRequest::remove(address)], 9)
			.await
			.unwrap();

		assert_eq!(payload.id, "td-1");
		assert_eq!(payload.nonce(), 9);
	}

	#[tokio::test]
	async fn test_broadcast_relay_error_is_decoded() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(body_partial_json(json!({
				"variables": { "request": { "id": "td-1", "signature": "0xsig" } }
			})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"data": { "broadcastOnchain": { "__typename": "RelayError", "reason": "REJECTED" } }
			})))
			.mount(&server)
			.await;

		let result = client(&server)
			.await
			.broadcast_onchain("td-1", "0xsig")
			.await
			.unwrap();

		assert!(result.is_relay_error());
	}

	#[tokio::test]
	async fn test_graphql_errors_are_surfaced() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"data": null,
				"errors": [{ "message": "Profile is suspended" }]
			})))
			.mount(&server)
			.await;

		let result = client(&server)
			.await
			.create_change_profile_managers_typed_data(
				&[ManagerChangeRequest::remove(Address::ZERO)],
				0,
			)
			.await;

		assert!(matches!(result, Err(ApiError::GraphQl(msg)) if msg == "Profile is suspended"));
	}

	#[tokio::test]
	async fn test_http_failure_keeps_status() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
			.mount(&server)
			.await;

		let result = client(&server).await.lens_hub_onchain_sig_nonce().await;
		assert!(matches!(result, Err(ApiError::Http { status: 503, .. })));
	}

	#[tokio::test]
	async fn test_profile_managers_sends_cursor() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(body_partial_json(json!({
				"variables": { "request": { "for": "0x01", "cursor": "page-2" } }
			})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"data": {
					"profileManagers": {
						"items": [{ "address": "0x000000000000000000000000000000000000aBc0", "isLensManager": false }],
						"pageInfo": { "next": null, "prev": "page-1" }
					}
				}
			})))
			.expect(1)
			.mount(&server)
			.await;

		let page = client(&server)
			.await
			.profile_managers(&ProfileId::new("0x01"), Some("page-2"))
			.await
			.unwrap();

		assert_eq!(page.items.len(), 1);
		assert_eq!(page.page_info.prev.as_deref(), Some("page-1"));
	}

	#[tokio::test]
	async fn test_sig_nonce_accepts_string() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"data": { "userSigNonces": { "lensHubOnchainSigNonce": "17" } }
			})))
			.mount(&server)
			.await;

		assert_eq!(
			client(&server).await.lens_hub_onchain_sig_nonce().await.unwrap(),
			17
		);
	}

	#[tokio::test]
	async fn test_profile_flattens_owner() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"data": {
					"profile": {
						"id": "0x01",
						"signless": true,
						"sponsor": true,
						"ownedBy": { "address": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8" }
					}
				}
			})))
			.mount(&server)
			.await;

		let profile = client(&server)
			.await
			.profile(&ProfileId::new("0x01"))
			.await
			.unwrap()
			.unwrap();

		assert!(profile.signless && profile.sponsor);
		assert_eq!(
			profile.owned_by,
			"0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
				.parse::<Address>()
				.unwrap()
		);
	}
}
