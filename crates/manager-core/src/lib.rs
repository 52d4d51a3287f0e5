//! Manager change orchestration.
//!
//! Wires the Lens API, the wallet signer, the contract writer and the cache
//! into the two user-facing operations: listing a profile's managers and
//! submitting a manager change.

pub mod error;
pub mod event_bus;
pub mod managers;
pub mod notifier;
pub mod session;
pub mod submitter;

#[cfg(test)]
pub(crate) mod testing;

pub use error::CoreError;
pub use event_bus::EventBus;
pub use managers::ManagerList;
pub use notifier::{Notifier, TracingNotifier};
pub use session::{Session, SigNonce};
pub use submitter::ManagerSubmitter;
