//! Component wiring for the CLI commands.

use anyhow::{Context, Result};
use manager_account::{ApprovalGate, LocalWallet, TypedDataSigner};
use manager_api::{GraphQlClient, LensApi};
use manager_config::{AppConfig, StorageBackend};
use manager_core::{ManagerList, ManagerSubmitter, Session};
use manager_delivery::{truncate_hash, AlloyDelivery};
use manager_storage::{FileStorage, MemoryStorage, StorageInterface, StorageService};
use manager_types::{Address, ManagerChangeRequest, ProfileManager, SubmissionOutcome};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::console::{ConsoleNotifier, StdinApprover};

pub struct ManagerService {
	config: AppConfig,
	api: Arc<dyn LensApi>,
	cache: Arc<StorageService>,
	submitter: ManagerSubmitter,
	wallet_address: Address,
}

impl ManagerService {
	pub fn build(config: AppConfig) -> Result<Self> {
		let mut client = GraphQlClient::new(
			&config.lens.api_url,
			Duration::from_secs(config.lens.request_timeout_secs),
		)
		.context("Failed to create Lens API client")?;
		if let Some(token) = &config.lens.access_token {
			client = client.with_access_token(token);
		}
		let api: Arc<dyn LensApi> = Arc::new(client);

		let cache = Arc::new(build_storage(&config)?);

		let wallet =
			LocalWallet::new(&config.account.private_key).context("Failed to load wallet")?;
		let wallet_address = wallet.signer().address();
		let delivery = AlloyDelivery::new(
			&config.chain.rpc_url,
			config.chain.chain_id,
			wallet.signer().clone(),
		)
		.context("Failed to create contract writer")?;

		let signer: Arc<dyn TypedDataSigner> = if config.account.require_approval {
			Arc::new(ApprovalGate::new(wallet, Box::new(StdinApprover)))
		} else {
			Arc::new(wallet)
		};

		let submitter = ManagerSubmitter::new(
			api.clone(),
			signer,
			Arc::new(delivery),
			cache.clone(),
			Arc::new(ConsoleNotifier),
			config.chain.lens_hub_proxy,
		);

		Ok(Self {
			config,
			api,
			cache,
			submitter,
			wallet_address,
		})
	}

	/// Loads the configured profile and seeds its signature nonce.
	pub async fn session(&self) -> Result<Session> {
		let session = Session::load(self.api.as_ref(), &self.config.lens.profile_id)
			.await
			.context("Failed to load session")?;

		if self.wallet_address != session.profile().owned_by {
			warn!(
				wallet = %self.wallet_address,
				owner = %session.profile().owned_by,
				"Wallet does not own the configured profile"
			);
		}

		Ok(session)
	}

	pub async fn list(&self, all: bool) -> Result<Vec<ProfileManager>> {
		let mut list = ManagerList::new(
			self.api.clone(),
			self.cache.clone(),
			self.config.lens.profile_id.clone(),
		);

		if all {
			list.load_all().await?;
		} else {
			list.load_first().await?;
			if list.has_more() {
				info!("More managers available, pass --all to load every page");
			}
		}

		Ok(list.managers().to_vec())
	}

	/// Submits one change. With `wait`, blocks until a directly written
	/// transaction has the configured number of confirmations.
	pub async fn change(
		&self,
		request: ManagerChangeRequest,
		wait: bool,
	) -> Result<SubmissionOutcome> {
		let session = self.session().await?;
		let outcome = self.submitter.submit(&session, request).await;

		if wait {
			if let Some(hash) = outcome.direct_tx_hash() {
				info!(tx_hash = %truncate_hash(&hash), "Waiting for confirmation");
				let receipt = self
					.submitter
					.writer()
					.wait_for_confirmation(&hash, self.config.chain.confirmations)
					.await
					.context("Failed waiting for confirmation")?;
				info!(
					block = receipt.block_number,
					success = receipt.success,
					"Transaction confirmed"
				);
			}
		}

		Ok(outcome)
	}
}

fn build_storage(config: &AppConfig) -> Result<StorageService> {
	let backend: Box<dyn StorageInterface> = match config.storage.backend {
		StorageBackend::Memory => Box::new(MemoryStorage::new()),
		StorageBackend::File => {
			let path = config
				.storage
				.path
				.clone()
				.context("storage.path is required for the file backend")?;
			Box::new(FileStorage::new(path))
		}
	};

	Ok(StorageService::new(backend)
		.with_default_ttl(config.storage.ttl_secs.map(Duration::from_secs)))
}
