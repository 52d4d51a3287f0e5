//! Configuration schema.

use manager_types::{Address, ProfileId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration of the profile manager client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
	#[serde(default)]
	pub app: AppSettings,
	pub lens: LensConfig,
	pub chain: ChainConfig,
	pub account: AccountConfig,
	#[serde(default)]
	pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
	#[serde(default = "default_name")]
	pub name: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
	/// Emit logs as JSON lines instead of human-readable text.
	#[serde(default)]
	pub json_logs: bool,
}

impl Default for AppSettings {
	fn default() -> Self {
		Self {
			name: default_name(),
			log_level: default_log_level(),
			json_logs: false,
		}
	}
}

/// Lens API access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensConfig {
	/// GraphQL endpoint.
	pub api_url: String,
	/// Value sent in the `x-access-token` header.
	#[serde(default)]
	pub access_token: Option<String>,
	/// Profile whose managers are listed and changed.
	pub profile_id: ProfileId,
	#[serde(default = "default_request_timeout_secs")]
	pub request_timeout_secs: u64,
}

/// Chain the `LensHub` proxy lives on, used for direct contract writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
	pub rpc_url: String,
	pub chain_id: u64,
	pub lens_hub_proxy: Address,
	/// Blocks to wait for when a command asks to wait for inclusion.
	#[serde(default = "default_confirmations")]
	pub confirmations: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
	/// Hex private key of the profile owner.
	pub private_key: String,
	/// Ask for confirmation on the terminal before every signature.
	#[serde(default = "default_true")]
	pub require_approval: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
	Memory,
	File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
	#[serde(default = "default_storage_backend")]
	pub backend: StorageBackend,
	/// Directory for the file backend.
	#[serde(default)]
	pub path: Option<PathBuf>,
	/// Lifetime of cached entities; unset keeps them until evicted.
	#[serde(default)]
	pub ttl_secs: Option<u64>,
}

impl Default for StorageConfig {
	fn default() -> Self {
		Self {
			backend: default_storage_backend(),
			path: None,
			ttl_secs: None,
		}
	}
}

fn default_name() -> String {
	"profile-managers".to_string()
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_request_timeout_secs() -> u64 {
	30
}

fn default_confirmations() -> u64 {
	1
}

fn default_true() -> bool {
	true
}

fn default_storage_backend() -> StorageBackend {
	StorageBackend::Memory
}
