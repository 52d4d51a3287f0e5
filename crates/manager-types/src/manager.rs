//! Profile manager entities and change requests.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cache typename under which listed managers are stored.
///
/// Entries are keyed `ProfilesManagedResult:<address>`, so a successful
/// change evicts exactly the entry of the address it touched.
pub const PROFILES_MANAGED_TYPENAME: &str = "ProfilesManagedResult";

/// Stable cache identifier for a manager address.
pub fn manager_cache_id(address: &Address) -> String {
	address.to_string()
}

/// Whether an address is being granted or stripped of manager rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeManagerAction {
	Add,
	Remove,
}

impl fmt::Display for ChangeManagerAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ChangeManagerAction::Add => write!(f, "add"),
			ChangeManagerAction::Remove => write!(f, "remove"),
		}
	}
}

/// A single user intent to change the manager list.
///
/// Lives only for the duration of one submission. Serializes to the
/// `ChangeProfileManager` GraphQL input shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerChangeRequest {
	pub action: ChangeManagerAction,
	pub address: Address,
}

impl ManagerChangeRequest {
	pub fn add(address: Address) -> Self {
		Self {
			action: ChangeManagerAction::Add,
			address,
		}
	}

	pub fn remove(address: Address) -> Self {
		Self {
			action: ChangeManagerAction::Remove,
			address,
		}
	}
}

/// A delegated executor of a profile as reported by the Lens API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileManager {
	pub address: Address,
	/// The built-in Lens manager; never offered for removal.
	#[serde(default)]
	pub is_lens_manager: bool,
}

/// Cursor pair returned with every paginated query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
	#[serde(default)]
	pub next: Option<String>,
	#[serde(default)]
	pub prev: Option<String>,
}

/// One page of the `profileManagers` query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagersPage {
	pub items: Vec<ProfileManager>,
	pub page_info: PageInfo,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_request_serializes_to_graphql_input() {
		let address = Address::repeat_byte(0xab);
		let json = serde_json::to_value(ManagerChangeRequest::remove(address)).unwrap();

		assert_eq!(json["action"], "REMOVE");
		assert_eq!(json["address"], serde_json::json!(address));
	}

	#[test]
	fn test_page_deserializes_with_missing_cursors() {
		let page: ManagersPage = serde_json::from_str(
			r#"{
				"items": [
					{"address": "0x000000000000000000000000000000000000abcd", "isLensManager": false},
					{"address": "0x0000000000000000000000000000000000001234", "isLensManager": true}
				],
				"pageInfo": {"next": null}
			}"#,
		)
		.unwrap();

		assert_eq!(page.items.len(), 2);
		assert!(page.items[1].is_lens_manager);
		assert_eq!(page.page_info, PageInfo::default());
	}
}
