//! Mock adapters shared by the core tests.

use alloy::primitives::Signature;
use async_trait::async_trait;
use manager_account::{AccountError, TypedDataSigner};
use manager_api::{ApiError, LensApi};
use manager_delivery::{ContractCall, ContractWriter, DeliveryError, TransactionReceipt};
use manager_storage::{MemoryStorage, StorageService};
use manager_types::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const CHAIN_ID: u64 = 80002;

pub fn owner() -> Address {
	Address::repeat_byte(0x0f)
}

pub fn lens_hub() -> Address {
	Address::repeat_byte(0x11)
}

pub fn profile(can_relay: bool) -> Profile {
	Profile {
		id: ProfileId::new("0x01"),
		owned_by: owner(),
		signless: can_relay,
		sponsor: can_relay,
	}
}

pub fn memory_cache() -> Arc<StorageService> {
	Arc::new(StorageService::new(Box::new(MemoryStorage::new())))
}

/// Typed data the API would return for `request` at `nonce`.
pub fn typed_data_for(request: &ManagerChangeRequest, nonce: u64) -> TypedDataPayload {
	TypedDataPayload {
		id: format!("typed-data-{}", nonce),
		expires_at: None,
		typed_data: ChangeManagersTypedData {
			domain: TypedDataDomain {
				name: "Lens Protocol Profiles".to_string(),
				version: "2".to_string(),
				chain_id: CHAIN_ID,
				verifying_contract: lens_hub(),
			},
			types: ChangeManagersTypes {
				change_delegated_executors_config: Vec::new(),
			},
			value: ChangeDelegatedExecutorsValue {
				nonce,
				deadline: 1_900_000_000,
				delegator_profile_id: "0x01".to_string(),
				delegated_executors: vec![request.address],
				approvals: vec![request.action == ChangeManagerAction::Add],
				config_number: 0,
				switch_to_given_config: false,
			},
		},
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
	TypedData { nonce: u64, address: Address },
	Broadcast { id: String },
	Managers { cursor: Option<String> },
	SigNonce,
	Profile,
}

pub struct MockApi {
	calls: Mutex<Vec<ApiCall>>,
	broadcast: BroadcastResult,
	fail_typed_data: bool,
	sig_nonce: u64,
	pages: HashMap<Option<String>, ManagersPage>,
	gate: Option<Arc<Notify>>,
}

impl MockApi {
	pub fn new() -> Self {
		Self {
			calls: Mutex::new(Vec::new()),
			broadcast: BroadcastResult::RelaySuccess {
				tx_hash: Some("0xabc".to_string()),
				tx_id: "relay-1".to_string(),
			},
			fail_typed_data: false,
			sig_nonce: 0,
			pages: HashMap::new(),
			gate: None,
		}
	}

	pub fn with_broadcast(mut self, result: BroadcastResult) -> Self {
		self.broadcast = result;
		self
	}

	pub fn failing_typed_data(mut self) -> Self {
		self.fail_typed_data = true;
		self
	}

	pub fn with_sig_nonce(mut self, nonce: u64) -> Self {
		self.sig_nonce = nonce;
		self
	}

	pub fn with_page(mut self, cursor: Option<&str>, page: ManagersPage) -> Self {
		self.pages.insert(cursor.map(str::to_string), page);
		self
	}

	/// Typed data requests block until `gate` is notified.
	pub fn gated(mut self, gate: Arc<Notify>) -> Self {
		self.gate = Some(gate);
		self
	}

	pub fn calls(&self) -> Vec<ApiCall> {
		self.calls.lock().unwrap().clone()
	}

	fn record(&self, call: ApiCall) {
		self.calls.lock().unwrap().push(call);
	}
}

#[async_trait]
impl LensApi for MockApi {
	async fn create_change_profile_managers_typed_data(
		&self,
		changes: &[ManagerChangeRequest],
		nonce_override: u64,
	) -> Result<TypedDataPayload, ApiError> {
		let request = changes[0];
		self.record(ApiCall::TypedData {
			nonce: nonce_override,
			address: request.address,
		});
		if let Some(gate) = &self.gate {
			gate.notified().await;
		}
		if self.fail_typed_data {
			return Err(ApiError::GraphQl("Forbidden".to_string()));
		}
		Ok(typed_data_for(&request, nonce_override))
	}

	async fn broadcast_onchain(
		&self,
		id: &str,
		_signature: &str,
	) -> Result<BroadcastResult, ApiError> {
		self.record(ApiCall::Broadcast { id: id.to_string() });
		Ok(self.broadcast.clone())
	}

	async fn profile_managers(
		&self,
		_profile_id: &ProfileId,
		cursor: Option<&str>,
	) -> Result<ManagersPage, ApiError> {
		let cursor = cursor.map(str::to_string);
		self.record(ApiCall::Managers {
			cursor: cursor.clone(),
		});
		self.pages
			.get(&cursor)
			.cloned()
			.ok_or_else(|| ApiError::GraphQl("unknown cursor".to_string()))
	}

	async fn lens_hub_onchain_sig_nonce(&self) -> Result<u64, ApiError> {
		self.record(ApiCall::SigNonce);
		Ok(self.sig_nonce)
	}

	async fn profile(&self, id: &ProfileId) -> Result<Option<Profile>, ApiError> {
		self.record(ApiCall::Profile);
		Ok((id.0 == "0x01").then(|| profile(true)))
	}
}

pub struct MockSigner {
	reject: bool,
	signed: AtomicUsize,
}

impl MockSigner {
	pub fn new() -> Self {
		Self {
			reject: false,
			signed: AtomicUsize::new(0),
		}
	}

	pub fn rejecting() -> Self {
		Self {
			reject: true,
			signed: AtomicUsize::new(0),
		}
	}

	pub fn signed(&self) -> usize {
		self.signed.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl TypedDataSigner for MockSigner {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(owner())
	}

	async fn sign_typed_data(&self, _payload: &TypedDataPayload) -> Result<Signature, AccountError> {
		if self.reject {
			return Err(AccountError::UserRejected);
		}
		self.signed.fetch_add(1, Ordering::SeqCst);
		Ok(Signature::new(U256::from(1), U256::from(2), false))
	}
}

pub struct MockWriter {
	chain_id: u64,
	fail: bool,
	calls: Mutex<Vec<ContractCall>>,
}

impl MockWriter {
	pub fn new() -> Self {
		Self {
			chain_id: CHAIN_ID,
			fail: false,
			calls: Mutex::new(Vec::new()),
		}
	}

	pub fn on_chain(mut self, chain_id: u64) -> Self {
		self.chain_id = chain_id;
		self
	}

	pub fn failing(mut self) -> Self {
		self.fail = true;
		self
	}

	pub fn calls(&self) -> Vec<ContractCall> {
		self.calls.lock().unwrap().clone()
	}
}

pub fn tx_hash() -> TxHash {
	TxHash::repeat_byte(0xaa)
}

#[async_trait]
impl ContractWriter for MockWriter {
	async fn chain_id(&self) -> Result<u64, DeliveryError> {
		Ok(self.chain_id)
	}

	async fn write_contract(&self, call: ContractCall) -> Result<TxHash, DeliveryError> {
		self.calls.lock().unwrap().push(call);
		if self.fail {
			return Err(DeliveryError::Rejected("insufficient funds".to_string()));
		}
		Ok(tx_hash())
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TxHash,
		_confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		Ok(TransactionReceipt {
			hash: *hash,
			block_number: 42,
			success: true,
		})
	}
}

#[derive(Default)]
pub struct RecordingNotifier {
	notes: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
	pub fn notes(&self) -> Vec<Notification> {
		self.notes.lock().unwrap().clone()
	}
}

impl crate::Notifier for RecordingNotifier {
	fn notify(&self, notification: Notification) {
		self.notes.lock().unwrap().push(notification);
	}
}
