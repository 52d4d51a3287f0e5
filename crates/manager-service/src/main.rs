use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use manager_config::{AppConfig, ConfigLoader};
use manager_types::{Address, ManagerChangeRequest, SubmissionOutcome};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod console;
mod service;

use service::ManagerService;

#[derive(Parser)]
#[command(name = "profile-managers")]
#[command(about = "Manage the delegated executors of a Lens profile", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[arg(short, long, value_name = "FILE", env = "MANAGER_CONFIG", default_value = "config/local.toml")]
	config: PathBuf,

	/// Overrides the configured log level
	#[arg(long)]
	log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// List the profile's managers
	List {
		/// Follow pagination until every manager is loaded
		#[arg(long)]
		all: bool,
	},
	/// Approve an address as a profile manager
	Add { address: Address },
	/// Revoke a profile manager
	Remove {
		address: Address,
		/// Wait for a direct transaction to be confirmed
		#[arg(long)]
		wait: bool,
	},
	/// Validate the configuration file
	Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

	let log_level = cli.log_level.as_deref().unwrap_or(&config.app.log_level);
	setup_tracing(log_level, config.app.json_logs)?;

	match cli.command {
		Commands::Validate => validate_config(&cli.config, &config),
		Commands::List { all } => list_managers(config, all).await,
		Commands::Add { address } => {
			change_manager(config, ManagerChangeRequest::add(address), false).await
		}
		Commands::Remove { address, wait } => {
			change_manager(config, ManagerChangeRequest::remove(address), wait).await
		}
	}
}

fn validate_config(path: &std::path::Path, config: &AppConfig) -> Result<()> {
	info!("Configuration is valid: {}", path.display());
	info!("Name: {}", config.app.name);
	info!("Profile: {}", config.lens.profile_id);
	info!("Chain: {} via {}", config.chain.chain_id, config.chain.rpc_url);
	info!("LensHub proxy: {}", config.chain.lens_hub_proxy);
	info!("Storage: {:?}", config.storage.backend);
	Ok(())
}

async fn list_managers(config: AppConfig, all: bool) -> Result<()> {
	let service = ManagerService::build(config)?;
	let managers = service.list(all).await.context("Failed to list managers")?;

	if managers.is_empty() {
		println!("No managers");
	}
	for manager in managers {
		println!("{}", manager.address);
	}
	Ok(())
}

async fn change_manager(config: AppConfig, request: ManagerChangeRequest, wait: bool) -> Result<()> {
	info!(action = %request.action, address = %request.address, "Submitting manager change");

	let service = ManagerService::build(config)?;
	match service.change(request, wait).await? {
		SubmissionOutcome::Relayed { tx_hash, tx_id } => {
			info!(%tx_id, tx_hash = tx_hash.as_deref().unwrap_or("pending"), "Relayed");
			Ok(())
		}
		SubmissionOutcome::RelayFallback { tx_hash, reason } => {
			info!(%tx_hash, %reason, "Relay rejected, sent directly");
			Ok(())
		}
		SubmissionOutcome::DirectCallSubmitted { tx_hash } => {
			info!(%tx_hash, "Sent directly");
			Ok(())
		}
		SubmissionOutcome::Failed(error) => Err(error).context("Manager change failed"),
	}
}

fn setup_tracing(log_level: &str, json: bool) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	let registry = tracing_subscriber::registry().with(env_filter);
	if json {
		registry
			.with(tracing_subscriber::fmt::layer().json())
			.try_init()?;
	} else {
		registry.with(tracing_subscriber::fmt::layer()).try_init()?;
	}

	Ok(())
}
