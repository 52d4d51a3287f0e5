use manager_api::ApiError;
use manager_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
	#[error("Lens API error: {0}")]
	Api(#[from] ApiError),

	#[error("Cache error: {0}")]
	Storage(#[from] StorageError),

	#[error("Profile {0} not found")]
	ProfileNotFound(String),
}
