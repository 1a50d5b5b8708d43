use crate as pallet_allocation_voting;
use allocation_primitives::{VoteRewardsRegistrar, VotingPowerSource};
use frame_support::{derive_impl, parameter_types};
use frame_system::EnsureRoot;
use sp_runtime::{BuildStorage, DispatchResult};
use std::{cell::RefCell, collections::BTreeMap};

type Block = frame_system::mocking::MockBlock<Test>;
pub type AccountId = u64;

pub const VOTING_PERIOD: u64 = 10;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
	pub enum Test {
		System: frame_system,
		X2EarnApps: pallet_x2earn_apps,
		AllocationVoting: pallet_allocation_voting,
	}
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
	type Block = Block;
	type AccountId = AccountId;
}

parameter_types! {
	pub const MaxApps: u32 = 10;
	pub const MaxNameLength: u32 = 32;
	pub const VotingPeriod: u64 = VOTING_PERIOD;
	pub const MaxAppsPerVote: u32 = 3;
}

impl pallet_x2earn_apps::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type AdminOrigin = EnsureRoot<AccountId>;
	type MaxApps = MaxApps;
	type MaxNameLength = MaxNameLength;
	type WeightInfo = ();
}

thread_local! {
	static VOTING_POWER: RefCell<BTreeMap<AccountId, u128>> = RefCell::new(BTreeMap::new());
	static TOTAL_SUPPLY: RefCell<u128> = RefCell::new(0);
	pub static REGISTERED_VOTES: RefCell<Vec<(u64, AccountId, u128, u128)>> = RefCell::new(Vec::new());
}

/// Flat voting power, the same at every block.
pub struct MockVotingPower;

impl VotingPowerSource<AccountId, u64> for MockVotingPower {
	fn voting_power(who: &AccountId, _at: u64) -> u128 {
		VOTING_POWER.with(|p| p.borrow().get(who).copied().unwrap_or_default())
	}

	fn total_supply(_at: u64) -> u128 {
		TOTAL_SUPPLY.with(|s| *s.borrow())
	}
}

pub fn set_voting_power(who: AccountId, power: u128) {
	VOTING_POWER.with(|p| p.borrow_mut().insert(who, power));
}

pub fn set_total_supply(supply: u128) {
	TOTAL_SUPPLY.with(|s| *s.borrow_mut() = supply);
}

pub struct RecordVotes;

impl VoteRewardsRegistrar<AccountId, u64> for RecordVotes {
	fn register_vote(
		cycle_start: u64,
		voter: &AccountId,
		linear: u128,
		quadratic: u128,
	) -> DispatchResult {
		REGISTERED_VOTES.with(|v| v.borrow_mut().push((cycle_start, *voter, linear, quadratic)));
		Ok(())
	}
}

pub fn registered_votes() -> Vec<(u64, AccountId, u128, u128)> {
	REGISTERED_VOTES.with(|v| v.borrow().clone())
}

impl pallet_allocation_voting::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type AdminOrigin = EnsureRoot<AccountId>;
	type Eligibility = X2EarnApps;
	type VotingPower = MockVotingPower;
	type VoteRewards = RecordVotes;
	type VotingPeriod = VotingPeriod;
	type MaxAppsPerVote = MaxAppsPerVote;
	type WeightInfo = ();
}

// Build genesis storage according to the mock runtime.
pub fn new_test_ext() -> sp_io::TestExternalities {
	let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

	pallet_allocation_voting::GenesisConfig::<Test> {
		quorum_numerator: 10,
		voting_threshold: 1,
		base_allocation_percentage: 20,
		app_shares_cap: 30,
		..Default::default()
	}
	.assimilate_storage(&mut t)
	.unwrap();

	// Accounts 1..=5 hold 1_000 each
	VOTING_POWER.with(|p| p.borrow_mut().clear());
	for who in 1..=5 {
		set_voting_power(who, 1_000);
	}
	set_total_supply(5_000);
	REGISTERED_VOTES.with(|v| v.borrow_mut().clear());

	let mut ext = sp_io::TestExternalities::new(t);
	ext.execute_with(|| System::set_block_number(1));
	ext
}

pub fn run_to_block(n: u64) {
	System::set_block_number(n);
}

/// Register an app with throwaway payout accounts and return its id.
pub fn add_app(name: &[u8]) -> allocation_primitives::AppId {
	frame_support::assert_ok!(X2EarnApps::add_app(RuntimeOrigin::root(), name.to_vec(), 100, 101));
	pallet_x2earn_apps::Pallet::<Test>::app_id_of(name)
}
