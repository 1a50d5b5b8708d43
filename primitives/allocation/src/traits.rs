use crate::{AppId, CycleId, RoundId, RoundState};
use codec::{Decode, Encode};
use scale_info::TypeInfo;
use sp_runtime::{DispatchError, DispatchResult, RuntimeDebug};
use sp_std::vec::Vec;

/// Source of truth for whether an app may receive votes.
pub trait EligibilityRegistry<BlockNumber> {
	/// Whether `app` was eligible for voting as of block `at`.
	fn is_eligible(app: &AppId, at: BlockNumber) -> bool;

	/// All apps eligible for voting as of block `at`, in registration order.
	fn eligible_apps(at: BlockNumber) -> Vec<AppId>;
}

impl<BlockNumber> EligibilityRegistry<BlockNumber> for () {
	fn is_eligible(_app: &AppId, _at: BlockNumber) -> bool {
		false
	}

	fn eligible_apps(_at: BlockNumber) -> Vec<AppId> {
		Vec::new()
	}
}

/// Where an app's allocation is paid.
pub trait AppPayoutTargets<AccountId> {
	fn team_wallet(app: &AppId) -> Option<AccountId>;

	/// Account holding the share an app distributes to its own users.
	fn rewards_pool(app: &AppId) -> Option<AccountId>;
}

impl<AccountId> AppPayoutTargets<AccountId> for () {
	fn team_wallet(_app: &AppId) -> Option<AccountId> {
		None
	}

	fn rewards_pool(_app: &AppId) -> Option<AccountId> {
		None
	}
}

/// Historical voting power (e.g. a governance token's past votes).
pub trait VotingPowerSource<AccountId, BlockNumber> {
	fn voting_power(who: &AccountId, at: BlockNumber) -> u128;

	fn total_supply(at: BlockNumber) -> u128;
}

impl<AccountId, BlockNumber> VotingPowerSource<AccountId, BlockNumber> for () {
	fn voting_power(_who: &AccountId, _at: BlockNumber) -> u128 {
		0
	}

	fn total_supply(_at: BlockNumber) -> u128 {
		0
	}
}

/// Participant level (e.g. an NFT tier) as of a block.
pub trait ParticipantLevels<AccountId, BlockNumber> {
	fn level_of(who: &AccountId, at: BlockNumber) -> u8;
}

impl<AccountId, BlockNumber> ParticipantLevels<AccountId, BlockNumber> for () {
	fn level_of(_who: &AccountId, _at: BlockNumber) -> u8 {
		0
	}
}

/// Reward bonus, in whole percent, applied to a participant's vote weight.
pub trait LevelMultiplierProvider<AccountId, BlockNumber> {
	fn multiplier(who: &AccountId, at: BlockNumber) -> u32;
}

impl<AccountId, BlockNumber> LevelMultiplierProvider<AccountId, BlockNumber> for () {
	fn multiplier(_who: &AccountId, _at: BlockNumber) -> u32 {
		0
	}
}

/// Emission schedule feeding both the allocation pool and voter rewards.
pub trait FundingSource {
	fn current_cycle() -> CycleId;

	/// Amount emitted for voters in `cycle`.
	fn cycle_emission(cycle: CycleId) -> u128;

	fn is_cycle_ended(cycle: CycleId) -> bool;

	/// Amount available to apps for `round`.
	fn total_round_funds(round: RoundId) -> u128;
}

impl FundingSource for () {
	fn current_cycle() -> CycleId {
		0
	}

	fn cycle_emission(_cycle: CycleId) -> u128 {
		0
	}

	fn is_cycle_ended(_cycle: CycleId) -> bool {
		false
	}

	fn total_round_funds(_round: RoundId) -> u128 {
		0
	}
}

/// Balance that claims are paid from.
pub trait PayoutSink<AccountId> {
	/// Amount that can currently be paid out.
	fn available() -> u128;

	fn credit(who: &AccountId, amount: u128) -> DispatchResult;
}

impl<AccountId> PayoutSink<AccountId> for () {
	fn available() -> u128 {
		0
	}

	fn credit(_who: &AccountId, _amount: u128) -> DispatchResult {
		Err(DispatchError::Unavailable)
	}
}

/// Receives every accepted allocation vote for reward accounting.
pub trait VoteRewardsRegistrar<AccountId, BlockNumber> {
	/// `cycle_start` is the block the vote's round snapshotted at; `linear` is the vote's
	/// total weight and `quadratic` its integer square root.
	fn register_vote(
		cycle_start: BlockNumber,
		voter: &AccountId,
		linear: u128,
		quadratic: u128,
	) -> DispatchResult;
}

impl<AccountId, BlockNumber> VoteRewardsRegistrar<AccountId, BlockNumber> for () {
	fn register_vote(
		_cycle_start: BlockNumber,
		_voter: &AccountId,
		_linear: u128,
		_quadratic: u128,
	) -> DispatchResult {
		Ok(())
	}
}

/// Allocation parameters a round snapshotted when it started.
#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug, TypeInfo)]
pub struct RoundAllocationParams {
	pub apps: Vec<AppId>,
	/// Whole percent of the round funds split evenly between `apps`.
	pub base_allocation_percentage: u32,
	/// Whole percent cap on a single app's share of the variable allocation.
	pub app_shares_cap: u32,
}

/// Read access to the round tallies the allocation pool is computed from.
pub trait RoundsInspector {
	fn round_state(round: RoundId) -> Option<RoundState>;

	fn allocation_params(round: RoundId) -> Option<RoundAllocationParams>;

	/// Squared sum of square-rooted votes received by `app`.
	fn app_votes_qf(round: RoundId, app: &AppId) -> u128;

	fn total_votes_qf(round: RoundId) -> u128;

	/// Most recent succeeded round strictly before `round`.
	fn latest_succeeded_round_before(round: RoundId) -> Option<RoundId>;
}

impl RoundsInspector for () {
	fn round_state(_round: RoundId) -> Option<RoundState> {
		None
	}

	fn allocation_params(_round: RoundId) -> Option<RoundAllocationParams> {
		None
	}

	fn app_votes_qf(_round: RoundId, _app: &AppId) -> u128 {
		0
	}

	fn total_votes_qf(_round: RoundId) -> u128 {
		0
	}

	fn latest_succeeded_round_before(_round: RoundId) -> Option<RoundId> {
		None
	}
}
