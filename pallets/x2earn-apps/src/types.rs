use codec::{Decode, Encode};
use scale_info::prelude::vec::Vec;
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;

// A registered app and where its allocation is paid
#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug, TypeInfo)]
pub struct AppInfo<AccountId, BlockNumber> {
	pub name: Vec<u8>,
	/// Receives the team share of each round's allocation.
	pub team_wallet: AccountId,
	/// Receives the share the app hands out to its own users.
	pub rewards_pool: AccountId,
	pub created_at: BlockNumber,
}
