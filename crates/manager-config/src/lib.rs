//! Configuration loading with environment variable substitution.
//!
//! The file format follows the extension (`.toml`, `.json`, `.yaml`/`.yml`).
//! `${VAR}` placeholders are replaced from the environment before parsing,
//! then prefixed variables (`MANAGER_` by default) override single fields.

use regex::Regex;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub mod types;

pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
	Toml,
	Json,
	Yaml,
}

impl Format {
	fn from_path(path: &Path) -> Result<Self, ConfigError> {
		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Ok(Format::Toml),
			Some("json") => Ok(Format::Json),
			Some("yaml") | Some("yml") => Ok(Format::Yaml),
			_ => Err(ConfigError::ParseError(format!(
				"Unsupported config format: {}",
				path.display()
			))),
		}
	}
}

pub struct ConfigLoader {
	file_path: Option<PathBuf>,
	env_prefix: String,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "MANAGER_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_path_buf());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<AppConfig, ConfigError> {
		let file_path = self.file_path.as_ref().ok_or_else(|| {
			ConfigError::FileNotFound("No configuration file specified".to_string())
		})?;

		info!("Loading configuration from {}", file_path.display());

		if !file_path.exists() {
			return Err(ConfigError::FileNotFound(file_path.display().to_string()));
		}

		let content = tokio::fs::read_to_string(file_path).await?;
		let mut config = self.parse(&content, Format::from_path(file_path)?)?;

		self.apply_env_overrides(&mut config)?;
		validate_config(&config)?;

		Ok(config)
	}

	/// Parses TOML content without touching the filesystem.
	pub fn load_from_toml(&self, content: &str) -> Result<AppConfig, ConfigError> {
		let mut config = self.parse(content, Format::Toml)?;
		self.apply_env_overrides(&mut config)?;
		validate_config(&config)?;
		Ok(config)
	}

	fn parse(&self, content: &str, format: Format) -> Result<AppConfig, ConfigError> {
		let substituted = substitute_env_vars(content)?;

		match format {
			Format::Toml => {
				toml::from_str(&substituted).map_err(|e| ConfigError::ParseError(e.to_string()))
			}
			Format::Json => serde_json::from_str(&substituted)
				.map_err(|e| ConfigError::ParseError(e.to_string())),
			Format::Yaml => serde_yaml::from_str(&substituted)
				.map_err(|e| ConfigError::ParseError(e.to_string())),
		}
	}

	fn env_var(&self, name: &str) -> Option<String> {
		env::var(format!("{}{}", self.env_prefix, name)).ok()
	}

	fn apply_env_overrides(&self, config: &mut AppConfig) -> Result<(), ConfigError> {
		if let Some(log_level) = self.env_var("LOG_LEVEL") {
			config.app.log_level = log_level;
		}

		if let Some(api_url) = self.env_var("LENS_API_URL") {
			debug!("Overriding Lens API URL from environment");
			config.lens.api_url = api_url;
		}

		if let Some(token) = self.env_var("LENS_ACCESS_TOKEN") {
			debug!("Overriding Lens access token from environment");
			config.lens.access_token = Some(token);
		}

		if let Some(rpc_url) = self.env_var("RPC_URL") {
			debug!("Overriding RPC URL from environment");
			config.chain.rpc_url = rpc_url;
		}

		if let Some(key) = self.env_var("PRIVATE_KEY") {
			debug!("Overriding private key from environment");
			config.account.private_key = key;
		}

		if let Some(chain_id) = self.env_var("CHAIN_ID") {
			config.chain.chain_id = chain_id
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid chain ID: {}", e)))?;
		}

		Ok(())
	}
}

/// Replaces every `${VAR}` with the value of `VAR`.
fn substitute_env_vars(content: &str) -> Result<String, ConfigError> {
	let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::ParseError(e.to_string()))?;
	let mut result = content.to_string();

	for cap in re.captures_iter(content) {
		let full_match = &cap[0];
		let var_name = &cap[1];

		let env_value =
			env::var(var_name).map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

		result = result.replace(full_match, &env_value);
	}

	Ok(result)
}

fn validate_url(field: &str, url: &str) -> Result<(), ConfigError> {
	if url.starts_with("http://") || url.starts_with("https://") {
		Ok(())
	} else {
		Err(ConfigError::ValidationError(format!(
			"{} must start with http:// or https://",
			field
		)))
	}
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
	validate_url("lens.api_url", &config.lens.api_url)?;
	validate_url("chain.rpc_url", &config.chain.rpc_url)?;

	if config.chain.chain_id == 0 {
		return Err(ConfigError::ValidationError(
			"chain.chain_id must be at least 1".to_string(),
		));
	}

	if config.lens.profile_id.to_u256().is_err() {
		return Err(ConfigError::ValidationError(format!(
			"lens.profile_id '{}' is not a valid profile id",
			config.lens.profile_id
		)));
	}

	let key = &config.account.private_key;
	let key_without_prefix = key.strip_prefix("0x").unwrap_or(key);
	if key_without_prefix.len() != 64 {
		return Err(ConfigError::ValidationError(
			"Private key must be 64 hex characters (32 bytes)".to_string(),
		));
	}
	if hex::decode(key_without_prefix).is_err() {
		return Err(ConfigError::ValidationError(
			"Private key must be valid hexadecimal".to_string(),
		));
	}

	if config.storage.backend == StorageBackend::File && config.storage.path.is_none() {
		return Err(ConfigError::ValidationError(
			"storage.path is required for the file backend".to_string(),
		));
	}

	Ok(())
}
