//! Manager change submission.
//!
//! A submission reserves the session nonce, requests typed data from the
//! Lens API, and then either relays the signed payload gas-lessly or writes
//! `changeDelegatedExecutorsConfig` directly through the wallet. A relay
//! rejection falls back to the direct write with the same arguments.

use crate::{EventBus, Notifier, Session};
use chrono::Utc;
use manager_account::{signature_hex, AccountError, TypedDataSigner};
use manager_api::LensApi;
use manager_delivery::{lens_hub, truncate_hash, ContractWriter};
use manager_storage::StorageService;
use manager_types::{
	manager_cache_id, Address, BroadcastResult, ChangeDelegatedExecutorsArgs,
	ChangeManagerAction, ManagerChangeRequest, Notification, SubmissionEvent,
	SubmissionOutcome, SubmissionState, SubmitError, TxHash, TypedDataPayload,
	PROFILES_MANAGED_TYPENAME, SUSPENDED_MESSAGE,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Tracks the state of one attempt and publishes every transition.
struct Attempt<'a> {
	id: Uuid,
	request: ManagerChangeRequest,
	state: SubmissionState,
	events: &'a EventBus,
}

impl<'a> Attempt<'a> {
	fn new(request: ManagerChangeRequest, events: &'a EventBus) -> Self {
		Self {
			id: Uuid::new_v4(),
			request,
			state: SubmissionState::Idle,
			events,
		}
	}

	fn transition(&mut self, next: SubmissionState) {
		debug_assert!(
			self.state.can_transition_to(next),
			"illegal transition {} -> {}",
			self.state,
			next
		);
		debug!(attempt_id = %self.id, from = %self.state, to = %next, "Submission transition");

		self.state = next;
		self.events.publish(SubmissionEvent {
			attempt_id: self.id,
			address: self.request.address,
			action: self.request.action,
			state: next,
			at: Utc::now(),
		});
	}
}

/// Drives manager change attempts against the Lens API and the wallet.
///
/// Shared by reference between concurrent attempts; the only mutable state
/// is the set of addresses with an attempt in flight.
pub struct ManagerSubmitter {
	api: Arc<dyn LensApi>,
	signer: Arc<dyn TypedDataSigner>,
	writer: Arc<dyn ContractWriter>,
	cache: Arc<StorageService>,
	notifier: Arc<dyn Notifier>,
	events: EventBus,
	lens_hub: Address,
	in_progress: Mutex<HashSet<Address>>,
}

impl ManagerSubmitter {
	pub fn new(
		api: Arc<dyn LensApi>,
		signer: Arc<dyn TypedDataSigner>,
		writer: Arc<dyn ContractWriter>,
		cache: Arc<StorageService>,
		notifier: Arc<dyn Notifier>,
		lens_hub: Address,
	) -> Self {
		Self {
			api,
			signer,
			writer,
			cache,
			notifier,
			events: EventBus::default(),
			lens_hub,
			in_progress: Mutex::new(HashSet::new()),
		}
	}

	/// Publishes transitions on `events` instead of a private bus.
	pub fn with_event_bus(mut self, events: EventBus) -> Self {
		self.events = events;
		self
	}

	pub fn event_bus(&self) -> &EventBus {
		&self.events
	}

	pub fn writer(&self) -> &Arc<dyn ContractWriter> {
		&self.writer
	}

	/// Whether a change for `address` is currently being submitted.
	pub fn is_in_progress(&self, address: &Address) -> bool {
		self.in_progress
			.lock()
			.map(|set| set.contains(address))
			.unwrap_or(false)
	}

	/// Revokes the delegated executor at `address`.
	pub async fn remove_manager(&self, session: &Session, address: Address) -> SubmissionOutcome {
		self.submit(session, ManagerChangeRequest::remove(address)).await
	}

	/// Approves `address` as a delegated executor.
	pub async fn add_manager(&self, session: &Session, address: Address) -> SubmissionOutcome {
		self.submit(session, ManagerChangeRequest::add(address)).await
	}

	/// Runs one submission attempt to a terminal outcome.
	///
	/// Never panics and never returns an error: every failure is reported
	/// to the notifier and surfaced as [`SubmissionOutcome::Failed`].
	#[instrument(skip_all, fields(action = %request.action, address = %request.address))]
	pub async fn submit(&self, session: &Session, request: ManagerChangeRequest) -> SubmissionOutcome {
		let mut attempt = Attempt::new(request, &self.events);

		if session.restriction().is_suspended {
			warn!("Refusing manager change for a suspended profile");
			self.notifier.notify(Notification::error(SUSPENDED_MESSAGE));
			attempt.transition(SubmissionState::Failed);
			return SubmissionOutcome::Failed(SubmitError::SuspendedAccount);
		}

		// The marker of an attempt already in flight is left untouched.
		if !self.mark_in_progress(request.address) {
			let error = SubmitError::AlreadyInProgress(request.address);
			warn!("{}", error);
			self.notifier.notify(Notification::error(error.to_string()));
			attempt.transition(SubmissionState::Failed);
			return SubmissionOutcome::Failed(error);
		}

		let result = self.run(&mut attempt, session).await;
		self.clear_in_progress(&request.address);

		match result {
			Ok(outcome) => {
				if let Err(e) = self
					.cache
					.evict(PROFILES_MANAGED_TYPENAME, &manager_cache_id(&request.address))
					.await
				{
					warn!(error = %e, "Failed to evict manager from cache");
				}

				self.notifier.notify(Notification::success(success_message(request.action)));
				attempt.transition(SubmissionState::Success);
				info!(attempt_id = %attempt.id, ?outcome, "Manager change submitted");
				outcome
			}
			Err(error) => {
				warn!(attempt_id = %attempt.id, %error, "Manager change failed");
				self.notifier.notify(Notification::error(error.to_string()));
				attempt.transition(SubmissionState::Failed);
				SubmissionOutcome::Failed(error)
			}
		}
	}

	async fn run(
		&self,
		attempt: &mut Attempt<'_>,
		session: &Session,
	) -> Result<SubmissionOutcome, SubmitError> {
		attempt.transition(SubmissionState::RequestingSignature);

		let capability = session.capability();
		let nonce = session.nonce().current();
		let payload = self
			.api
			.create_change_profile_managers_typed_data(&[attempt.request], nonce)
			.await
			.map_err(|e| SubmitError::Remote(e.to_string()))?;

		// Reserved as soon as the payload exists, whatever happens next.
		let next = session.nonce().increment();
		debug!(typed_data_id = %payload.id, nonce, next, "Typed data received");

		let args = payload
			.call_args()
			.map_err(|e| SubmitError::InvalidPayload(e.to_string()))?;
		self.ensure_network(&payload).await?;

		if !capability.can_relay {
			let tx_hash = self.write(attempt, &args).await?;
			return Ok(SubmissionOutcome::DirectCallSubmitted { tx_hash });
		}

		let signature = self
			.signer
			.sign_typed_data(&payload)
			.await
			.map_err(signing_error)?;

		attempt.transition(SubmissionState::Broadcasting);
		let result = self
			.api
			.broadcast_onchain(&payload.id, &signature_hex(&signature))
			.await
			.map_err(|e| SubmitError::Remote(e.to_string()))?;

		match result {
			BroadcastResult::RelaySuccess { tx_hash, tx_id } => {
				info!(%tx_id, "Relayer accepted manager change");
				Ok(SubmissionOutcome::Relayed { tx_hash, tx_id })
			}
			BroadcastResult::RelayError { reason }
			| BroadcastResult::LensProfileManagerRelayError { reason } => {
				warn!(%reason, "Relay rejected, falling back to direct contract write");
				attempt.transition(SubmissionState::FallingBack);
				let tx_hash = self.write(attempt, &args).await?;
				Ok(SubmissionOutcome::RelayFallback { tx_hash, reason })
			}
		}
	}

	async fn ensure_network(&self, payload: &TypedDataPayload) -> Result<(), SubmitError> {
		let expected = payload.chain_id();
		let actual = self
			.writer
			.chain_id()
			.await
			.map_err(|e| SubmitError::ContractWrite(e.to_string()))?;

		if expected != actual {
			return Err(SubmitError::WrongNetwork { expected, actual });
		}
		Ok(())
	}

	async fn write(
		&self,
		attempt: &mut Attempt<'_>,
		args: &ChangeDelegatedExecutorsArgs,
	) -> Result<TxHash, SubmitError> {
		attempt.transition(SubmissionState::DirectSubmitting);

		let call = lens_hub::change_delegated_executors_config(self.lens_hub, args);
		let tx_hash = self
			.writer
			.write_contract(call)
			.await
			.map_err(|e| SubmitError::ContractWrite(e.to_string()))?;

		info!(tx_hash = %truncate_hash(&tx_hash), "Direct contract write submitted");
		Ok(tx_hash)
	}

	fn mark_in_progress(&self, address: Address) -> bool {
		match self.in_progress.lock() {
			Ok(mut set) => set.insert(address),
			Err(poisoned) => poisoned.into_inner().insert(address),
		}
	}

	fn clear_in_progress(&self, address: &Address) {
		match self.in_progress.lock() {
			Ok(mut set) => set.remove(address),
			Err(poisoned) => poisoned.into_inner().remove(address),
		};
	}
}

fn success_message(action: ChangeManagerAction) -> &'static str {
	match action {
		ChangeManagerAction::Add => "Manager added successfully!",
		ChangeManagerAction::Remove => "Manager removed successfully!",
	}
}

fn signing_error(error: AccountError) -> SubmitError {
	match error {
		AccountError::UserRejected => SubmitError::UserRejectedSignature,
		AccountError::InvalidTypedData(msg) => SubmitError::InvalidPayload(msg),
		other => SubmitError::Signing(other.to_string()),
	}
}
