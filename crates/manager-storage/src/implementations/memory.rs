//! In-memory backend.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

struct Slot {
	value: Vec<u8>,
	expires_at: Option<Instant>,
}

impl Slot {
	fn is_expired(&self) -> bool {
		self.expires_at.is_some_and(|at| Instant::now() >= at)
	}
}

/// Process-local cache, lost on exit.
#[derive(Default)]
pub struct MemoryStorage {
	data: DashMap<String, Slot>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.data.iter().filter(|slot| !slot.is_expired()).count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[async_trait]
impl StorageInterface for MemoryStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		if let Some(slot) = self.data.get(key) {
			if !slot.is_expired() {
				return Ok(slot.value.clone());
			}
		}
		self.data.remove_if(key, |_, slot| slot.is_expired());
		Err(StorageError::NotFound)
	}

	async fn set_bytes(
		&self,
		key: &str,
		value: Vec<u8>,
		ttl: Option<Duration>,
	) -> Result<(), StorageError> {
		self.data.insert(
			key.to_string(),
			Slot {
				value,
				expires_at: ttl.map(|ttl| Instant::now() + ttl),
			},
		);
		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		self.data.remove(key);
		Ok(())
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		Ok(self
			.data
			.get(key)
			.map(|slot| !slot.is_expired())
			.unwrap_or(false))
	}
}
