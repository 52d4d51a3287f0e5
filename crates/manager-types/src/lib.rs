//! Shared types for the profile manager client.
//!
//! Everything that crosses a crate boundary lives here: manager change
//! requests, the typed data returned by the Lens API, broadcast results,
//! and the submission state machine's states and outcomes.

pub mod broadcast;
pub mod errors;
pub mod manager;
pub mod profile;
pub mod serde_helpers;
pub mod submission;
pub mod typed_data;

pub use broadcast::*;
pub use errors::*;
pub use manager::*;
pub use profile::*;
pub use submission::*;
pub use typed_data::*;

pub use alloy::primitives::{Address, TxHash, U256};
