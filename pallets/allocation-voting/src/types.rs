use allocation_primitives::{AppId, RoundId};
use codec::{Decode, Encode};
use scale_info::prelude::vec::Vec;
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;

/// A funding round. Parameters are copied from the live settings when the round starts
/// so later admin changes never alter a round in flight.
#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug, TypeInfo)]
pub struct RoundInfo<BlockNumber> {
	/// Block at which voting power and app eligibility are read.
	pub snapshot: BlockNumber,
	/// Last block on which votes are accepted.
	pub deadline: BlockNumber,
	/// Apps eligible at the snapshot. Only these can receive votes.
	pub apps: Vec<AppId>,
	/// Latest succeeded round before this one. Every earlier round has ended and been
	/// finalized by the time this round starts.
	pub previous_succeeded: Option<RoundId>,
	pub base_allocation_percentage: u32,
	pub app_shares_cap: u32,
	/// Minimum total weight a single vote must carry.
	pub voting_threshold: u128,
	pub finalized: bool,
}
