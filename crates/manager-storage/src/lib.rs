//! Local entity cache.
//!
//! Entities are stored under `Typename:id` keys, the same normalized
//! identifiers the GraphQL cache uses, so a manager change can evict exactly
//! the entry it invalidated and the next read refetches it.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub mod implementations {
	pub mod file;
	pub mod memory;
}

pub use implementations::file::FileStorage;
pub use implementations::memory::MemoryStorage;

#[derive(Debug, Error)]
pub enum StorageError {
	#[error("Not found")]
	NotFound,
	#[error("Serialization error: {0}")]
	Serialization(String),
	#[error("Backend error: {0}")]
	Backend(String),
}

/// Raw key-value backend with optional time-to-live.
#[async_trait]
pub trait StorageInterface: Send + Sync {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError>;

	async fn set_bytes(
		&self,
		key: &str,
		value: Vec<u8>,
		ttl: Option<Duration>,
	) -> Result<(), StorageError>;

	/// Deleting a missing key is not an error.
	async fn delete(&self, key: &str) -> Result<(), StorageError>;

	async fn exists(&self, key: &str) -> Result<bool, StorageError>;
}

/// Typed cache operations over a [`StorageInterface`].
pub struct StorageService {
	backend: Box<dyn StorageInterface>,
	default_ttl: Option<Duration>,
}

/// Normalized cache identifier, e.g. `ProfilesManagedResult:0xAbC...`.
pub fn cache_key(typename: &str, id: &str) -> String {
	format!("{}:{}", typename, id)
}

impl StorageService {
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self {
			backend,
			default_ttl: None,
		}
	}

	pub fn with_default_ttl(mut self, ttl: Option<Duration>) -> Self {
		self.default_ttl = ttl;
		self
	}

	pub async fn store<T: Serialize>(
		&self,
		typename: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend
			.set_bytes(&cache_key(typename, id), bytes, self.default_ttl)
			.await
	}

	/// Returns `None` when the entity is not cached (or has expired).
	pub async fn retrieve<T: DeserializeOwned>(
		&self,
		typename: &str,
		id: &str,
	) -> Result<Option<T>, StorageError> {
		match self.backend.get_bytes(&cache_key(typename, id)).await {
			Ok(bytes) => serde_json::from_slice(&bytes)
				.map(Some)
				.map_err(|e| StorageError::Serialization(e.to_string())),
			Err(StorageError::NotFound) => Ok(None),
			Err(e) => Err(e),
		}
	}

	pub async fn contains(&self, typename: &str, id: &str) -> Result<bool, StorageError> {
		self.backend.exists(&cache_key(typename, id)).await
	}

	/// Drops the cached entity so the next read goes back to the source.
	pub async fn evict(&self, typename: &str, id: &str) -> Result<(), StorageError> {
		let key = cache_key(typename, id);
		debug!(%key, "Evicting cache entry");
		self.backend.delete(&key).await
	}
}
