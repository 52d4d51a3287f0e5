//! `LensHub` ABI binding.

use crate::ContractCall;
use alloy::primitives::Address;
use alloy::{sol, sol_types::SolCall};
use manager_types::ChangeDelegatedExecutorsArgs;

sol! {
	/// Subset of the LensHub proxy interface used for delegated executors.
	interface ILensHub {
		function changeDelegatedExecutorsConfig(
			uint256 delegatorProfileId,
			address[] delegatedExecutors,
			bool[] approvals,
			uint64 configNumber,
			bool switchToGivenConfig
		) external;
	}
}

/// Encodes `changeDelegatedExecutorsConfig` against the proxy at `lens_hub`.
pub fn change_delegated_executors_config(
	lens_hub: Address,
	args: &ChangeDelegatedExecutorsArgs,
) -> ContractCall {
	let call = ILensHub::changeDelegatedExecutorsConfigCall {
		delegatorProfileId: args.delegator_profile_id,
		delegatedExecutors: args.delegated_executors.clone(),
		approvals: args.approvals.clone(),
		configNumber: args.config_number,
		switchToGivenConfig: args.switch_to_given_config,
	};

	ContractCall {
		to: lens_hub,
		function: "changeDelegatedExecutorsConfig",
		data: call.abi_encode().into(),
	}
}
