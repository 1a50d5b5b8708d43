use codec::{Decode, Encode};
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;

/// What an app earned in a round, and where it goes.
#[derive(Encode, Decode, Clone, Copy, Default, PartialEq, Eq, RuntimeDebug, TypeInfo)]
pub struct RoundEarnings {
	/// Base allocation plus the app's capped share of the variable allocation.
	pub total: u128,
	/// Part of the app's uncapped share cut off by the cap. Goes to the treasury.
	pub unallocated: u128,
	/// Paid to the team wallet.
	pub team: u128,
	/// Paid to the app's rewards pool, `total - team`.
	pub rewards_pool: u128,
}
