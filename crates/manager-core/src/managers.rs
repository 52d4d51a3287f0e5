//! Paginated list of a profile's managers.

use crate::CoreError;
use manager_api::LensApi;
use manager_storage::StorageService;
use manager_types::{manager_cache_id, Address, ProfileId, ProfileManager, PROFILES_MANAGED_TYPENAME};
use std::sync::Arc;
use tracing::{debug, warn};

/// Managers of one profile, loaded page by page.
///
/// The built-in Lens manager is filtered out; every other entry is written
/// to the cache under `ProfilesManagedResult:<address>`.
pub struct ManagerList {
	api: Arc<dyn LensApi>,
	cache: Arc<StorageService>,
	profile_id: ProfileId,
	managers: Vec<ProfileManager>,
	next_cursor: Option<String>,
}

impl ManagerList {
	/// Creates an empty list; nothing is fetched until [`Self::load_first`].
	pub fn new(api: Arc<dyn LensApi>, cache: Arc<StorageService>, profile_id: ProfileId) -> Self {
		Self {
			api,
			cache,
			profile_id,
			managers: Vec::new(),
			next_cursor: None,
		}
	}

	/// Managers loaded so far, in API order.
	pub fn managers(&self) -> &[ProfileManager] {
		&self.managers
	}

	/// Whether the last page reported a next cursor.
	pub fn has_more(&self) -> bool {
		self.next_cursor.is_some()
	}

	/// Discards anything loaded so far and fetches the first page.
	pub async fn load_first(&mut self) -> Result<&[ProfileManager], CoreError> {
		self.managers.clear();
		self.next_cursor = None;
		self.fetch(None).await?;
		Ok(&self.managers)
	}

	/// Appends the next page. Returns the newly added managers, or nothing
	/// when there is no further page.
	pub async fn load_more(&mut self) -> Result<Vec<ProfileManager>, CoreError> {
		let Some(cursor) = self.next_cursor.clone() else {
			debug!("No further manager pages");
			return Ok(Vec::new());
		};
		self.fetch(Some(&cursor)).await
	}

	/// Follows the cursor until the list is exhausted. Stops early if the
	/// API hands back the cursor it was just given.
	pub async fn load_all(&mut self) -> Result<&[ProfileManager], CoreError> {
		self.load_first().await?;
		while let Some(cursor) = self.next_cursor.clone() {
			self.load_more().await?;
			if self.next_cursor.as_deref() == Some(cursor.as_str()) {
				warn!(%cursor, "Managers cursor did not advance, stopping");
				self.next_cursor = None;
				break;
			}
		}
		Ok(&self.managers)
	}

	/// Cached entry for `address`, if it has not been evicted.
	pub async fn cached(&self, address: &Address) -> Result<Option<ProfileManager>, CoreError> {
		Ok(self
			.cache
			.retrieve(PROFILES_MANAGED_TYPENAME, &manager_cache_id(address))
			.await?)
	}

	async fn fetch(&mut self, cursor: Option<&str>) -> Result<Vec<ProfileManager>, CoreError> {
		let page = self.api.profile_managers(&self.profile_id, cursor).await?;

		let added: Vec<ProfileManager> = page
			.items
			.into_iter()
			.filter(|manager| !manager.is_lens_manager)
			.collect();

		for manager in &added {
			self.cache
				.store(
					PROFILES_MANAGED_TYPENAME,
					&manager_cache_id(&manager.address),
					manager,
				)
				.await?;
		}

		debug!(
			profile_id = %self.profile_id,
			count = added.len(),
			next = ?page.page_info.next,
			"Loaded managers page"
		);

		self.next_cursor = page.page_info.next;
		self.managers.extend(added.iter().cloned());
		Ok(added)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{memory_cache, ApiCall, MockApi};
	use manager_types::{ManagersPage, PageInfo};

	fn entry(byte: u8, is_lens_manager: bool) -> ProfileManager {
		ProfileManager {
			address: Address::repeat_byte(byte),
			is_lens_manager,
		}
	}

	fn page(items: Vec<ProfileManager>, next: Option<&str>) -> ManagersPage {
		ManagersPage {
			items,
			page_info: PageInfo {
				next: next.map(str::to_string),
				prev: None,
			},
		}
	}

	fn two_page_api() -> Arc<MockApi> {
		Arc::new(
			MockApi::new()
				.with_page(None, page(vec![entry(0x01, true), entry(0x02, false)], Some("c1")))
				.with_page(Some("c1"), page(vec![entry(0x03, false)], None)),
		)
	}

	#[tokio::test]
	async fn test_lens_manager_is_hidden_and_others_cached() {
		let api = two_page_api();
		let mut list = ManagerList::new(api, memory_cache(), ProfileId::new("0x01"));

		let managers = list.load_first().await.unwrap().to_vec();

		assert_eq!(managers, vec![entry(0x02, false)]);
		assert!(list.has_more());
		assert_eq!(
			list.cached(&Address::repeat_byte(0x02)).await.unwrap(),
			Some(entry(0x02, false))
		);
		assert_eq!(list.cached(&Address::repeat_byte(0x01)).await.unwrap(), None);
	}

	#[tokio::test]
	async fn test_load_more_follows_cursor() {
		let api = two_page_api();
		let mut list = ManagerList::new(api.clone(), memory_cache(), ProfileId::new("0x01"));

		list.load_first().await.unwrap();
		let added = list.load_more().await.unwrap();

		assert_eq!(added, vec![entry(0x03, false)]);
		assert_eq!(list.managers().len(), 2);
		assert!(!list.has_more());
		assert_eq!(
			api.calls(),
			vec![
				ApiCall::Managers { cursor: None },
				ApiCall::Managers {
					cursor: Some("c1".to_string())
				},
			]
		);
	}

	#[tokio::test]
	async fn test_load_more_without_cursor_is_noop() {
		let api = Arc::new(MockApi::new().with_page(None, page(vec![entry(0x02, false)], None)));
		let mut list = ManagerList::new(api.clone(), memory_cache(), ProfileId::new("0x01"));

		list.load_first().await.unwrap();
		let added = list.load_more().await.unwrap();

		assert!(added.is_empty());
		assert_eq!(api.calls().len(), 1);
	}

	#[tokio::test]
	async fn test_load_all_stops_on_repeated_cursor() {
		let api = Arc::new(
			MockApi::new()
				.with_page(None, page(vec![entry(0x02, false)], Some("c1")))
				.with_page(Some("c1"), page(vec![entry(0x03, false)], Some("c1"))),
		);
		let mut list = ManagerList::new(api.clone(), memory_cache(), ProfileId::new("0x01"));

		let managers = list.load_all().await.unwrap().to_vec();

		assert_eq!(managers, vec![entry(0x02, false), entry(0x03, false)]);
		assert!(!list.has_more());
		assert_eq!(api.calls().len(), 2);
	}

	#[tokio::test]
	async fn test_load_all_and_reload_resets() {
		let api = two_page_api();
		let mut list = ManagerList::new(api, memory_cache(), ProfileId::new("0x01"));

		assert_eq!(list.load_all().await.unwrap().len(), 2);
		assert_eq!(list.load_first().await.unwrap().len(), 1);
	}
}
