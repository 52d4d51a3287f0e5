//! File-backed cache that survives restarts.
//!
//! Each entry is one file: an 8-byte big-endian expiry (unix seconds, zero
//! for none) followed by the value.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::fs;

const HEADER_LEN: usize = 8;

pub struct FileStorage {
	base_path: PathBuf,
}

impl FileStorage {
	pub fn new(base_path: PathBuf) -> Self {
		Self { base_path }
	}

	fn get_file_path(&self, key: &str) -> PathBuf {
		let safe_key = key.replace(['/', ':'], "_");
		self.base_path.join(format!("{}.bin", safe_key))
	}
}

fn now_secs() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or(0)
}

fn split_entry(data: &[u8]) -> Result<(u64, &[u8]), StorageError> {
	if data.len() < HEADER_LEN {
		return Err(StorageError::Backend("Corrupt cache entry".to_string()));
	}
	let mut header = [0u8; HEADER_LEN];
	header.copy_from_slice(&data[..HEADER_LEN]);
	Ok((u64::from_be_bytes(header), &data[HEADER_LEN..]))
}

fn is_expired(expires_at: u64) -> bool {
	expires_at != 0 && now_secs() >= expires_at
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.get_file_path(key);

		let data = match fs::read(&path).await {
			Ok(data) => data,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(StorageError::NotFound)
			}
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		let (expires_at, value) = split_entry(&data)?;
		if is_expired(expires_at) {
			self.delete(key).await?;
			return Err(StorageError::NotFound);
		}

		Ok(value.to_vec())
	}

	async fn set_bytes(
		&self,
		key: &str,
		value: Vec<u8>,
		ttl: Option<Duration>,
	) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		let expires_at = ttl.map(|ttl| now_secs() + ttl.as_secs().max(1)).unwrap_or(0);
		let mut entry = Vec::with_capacity(HEADER_LEN + value.len());
		entry.extend_from_slice(&expires_at.to_be_bytes());
		entry.extend_from_slice(&value);

		// write-then-rename keeps readers from seeing a partial entry
		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, entry)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		fs::rename(&temp_path, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		match fs::remove_file(&path).await {
			Ok(_) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		match self.get_bytes(key).await {
			Ok(_) => Ok(true),
			Err(StorageError::NotFound) => Ok(false),
			Err(e) => Err(e),
		}
	}
}
