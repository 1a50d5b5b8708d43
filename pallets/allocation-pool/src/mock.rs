use crate as pallet_allocation_pool;
use allocation_primitives::{AppId, CycleId, FundingSource, PalletPot, RoundId, VotingPowerSource};
use frame_support::{assert_ok, derive_impl, parameter_types, PalletId};
use frame_system::EnsureRoot;
use sp_runtime::BuildStorage;
use std::{
	cell::RefCell,
	collections::{BTreeMap, BTreeSet},
};

type Block = frame_system::mocking::MockBlock<Test>;
pub type AccountId = u64;
pub type Balance = u128;

pub const TREASURY: AccountId = 99;
pub const POT_BALANCE: Balance = 1_000_000;
pub const ROUND_FUNDS: u128 = 10_000;
pub const VOTING_PERIOD: u64 = 10;

// Configure a mock runtime with the whole allocation ledger.
frame_support::construct_runtime!(
	pub enum Test {
		System: frame_system,
		Balances: pallet_balances,
		X2EarnApps: pallet_x2earn_apps,
		AllocationVoting: pallet_allocation_voting,
		VoterRewards: pallet_voter_rewards,
		AllocationPool: pallet_allocation_pool,
	}
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
	type Block = Block;
	type AccountId = AccountId;
	type AccountData = pallet_balances::AccountData<Balance>;
}

parameter_types! {
	pub const ExistentialDeposit: Balance = 1;
	pub const MaxApps: u32 = 10;
	pub const MaxNameLength: u32 = 32;
	pub const VotingPeriod: u64 = VOTING_PERIOD;
	pub const MaxAppsPerVote: u32 = 5;
	pub const RewardsPotId: PalletId = PalletId(*b"vtrrwrds");
	pub const AllocationPotId: PalletId = PalletId(*b"x2ealloc");
	pub const TreasuryAccount: AccountId = TREASURY;
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Test {
	type Balance = Balance;
	type AccountStore = System;
	type ExistentialDeposit = ExistentialDeposit;
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
	static ROUND_FUNDING: RefCell<BTreeMap<RoundId, u128>> = RefCell::new(BTreeMap::new());
	static CURRENT_CYCLE: RefCell<CycleId> = RefCell::new(1);
	static ENDED_CYCLES: RefCell<BTreeSet<CycleId>> = RefCell::new(BTreeSet::new());
	static EMISSIONS: RefCell<BTreeMap<CycleId, u128>> = RefCell::new(BTreeMap::new());
}

pub const TOTAL_SUPPLY: u128 = 5_000;

/// Flat voting power, the same at every block.
pub struct MockVotingPower;

impl VotingPowerSource<AccountId, u64> for MockVotingPower {
	fn voting_power(who: &AccountId, _at: u64) -> u128 {
		VOTING_POWER.with(|p| p.borrow().get(who).copied().unwrap_or_default())
	}

	fn total_supply(_at: u64) -> u128 {
		TOTAL_SUPPLY
	}
}

pub fn set_voting_power(who: AccountId, power: u128) {
	VOTING_POWER.with(|p| p.borrow_mut().insert(who, power));
}

pub struct MockFunding;

impl FundingSource for MockFunding {
	fn current_cycle() -> CycleId {
		CURRENT_CYCLE.with(|c| *c.borrow())
	}

	fn cycle_emission(cycle: CycleId) -> u128 {
		EMISSIONS.with(|e| e.borrow().get(&cycle).copied().unwrap_or_default())
	}

	fn is_cycle_ended(cycle: CycleId) -> bool {
		ENDED_CYCLES.with(|e| e.borrow().contains(&cycle))
	}

	fn total_round_funds(round: RoundId) -> u128 {
		ROUND_FUNDING.with(|f| f.borrow().get(&round).copied().unwrap_or(ROUND_FUNDS))
	}
}

pub fn set_round_funds(round: RoundId, funds: u128) {
	ROUND_FUNDING.with(|f| f.borrow_mut().insert(round, funds));
}

/// Close the current cycle with `emission` for voters and move to the next one.
pub fn end_cycle(emission: u128) -> CycleId {
	let cycle = MockFunding::current_cycle();
	EMISSIONS.with(|e| e.borrow_mut().insert(cycle, emission));
	ENDED_CYCLES.with(|e| e.borrow_mut().insert(cycle));
	CURRENT_CYCLE.with(|c| *c.borrow_mut() = cycle + 1);
	cycle
}

impl pallet_allocation_voting::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type AdminOrigin = EnsureRoot<AccountId>;
	type Eligibility = X2EarnApps;
	type VotingPower = MockVotingPower;
	type VoteRewards = VoterRewards;
	type VotingPeriod = VotingPeriod;
	type MaxAppsPerVote = MaxAppsPerVote;
	type WeightInfo = ();
}

pub type RewardsPot = PalletPot<Balances, RewardsPotId>;
pub type AllocationPot = PalletPot<Balances, AllocationPotId>;

impl pallet_voter_rewards::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type AdminOrigin = EnsureRoot<AccountId>;
	type Funding = MockFunding;
	type Levels = ();
	type Payout = RewardsPot;
	type WeightInfo = ();
}

impl pallet_allocation_pool::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type AdminOrigin = EnsureRoot<AccountId>;
	type Rounds = AllocationVoting;
	type Funding = MockFunding;
	type Apps = X2EarnApps;
	type Payout = AllocationPot;
	type TreasuryAccount = TreasuryAccount;
	type WeightInfo = ();
}

pub fn allocation_pot() -> AccountId {
	AllocationPot::account_id()
}

pub fn rewards_pot() -> AccountId {
	RewardsPot::account_id()
}

// Build genesis storage according to the mock runtime.
pub fn new_test_ext() -> sp_io::TestExternalities {
	let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

	pallet_balances::GenesisConfig::<Test> {
		balances: vec![(allocation_pot(), POT_BALANCE), (rewards_pot(), POT_BALANCE)],
		..Default::default()
	}
	.assimilate_storage(&mut t)
	.unwrap();

	pallet_allocation_voting::GenesisConfig::<Test> {
		quorum_numerator: 10,
		voting_threshold: 1,
		base_allocation_percentage: 20,
		app_shares_cap: 100,
		..Default::default()
	}
	.assimilate_storage(&mut t)
	.unwrap();

	pallet_voter_rewards::GenesisConfig::<Test>::default().assimilate_storage(&mut t).unwrap();

	pallet_allocation_pool::GenesisConfig::<Test> {
		team_allocation_percentage: 30,
		..Default::default()
	}
	.assimilate_storage(&mut t)
	.unwrap();

	// Accounts 1..=5 hold 1_000 each, quorum is 500
	VOTING_POWER.with(|p| p.borrow_mut().clear());
	for who in 1..=5 {
		set_voting_power(who, 1_000);
	}
	ROUND_FUNDING.with(|f| f.borrow_mut().clear());
	CURRENT_CYCLE.with(|c| *c.borrow_mut() = 1);
	ENDED_CYCLES.with(|e| e.borrow_mut().clear());
	EMISSIONS.with(|e| e.borrow_mut().clear());

	let mut ext = sp_io::TestExternalities::new(t);
	ext.execute_with(|| System::set_block_number(1));
	ext
}

pub fn run_to_block(n: u64) {
	System::set_block_number(n);
}

/// Register an app whose team wallet is `10 + n` and rewards pool `20 + n`.
pub fn add_app(n: u64) -> AppId {
	let name = format!("app-{}", n).into_bytes();
	assert_ok!(X2EarnApps::add_app(RuntimeOrigin::root(), name.clone(), 10 + n, 20 + n));
	pallet_x2earn_apps::Pallet::<Test>::app_id_of(&name)
}

pub fn start_round() -> RoundId {
	assert_ok!(AllocationVoting::start_new_round(RuntimeOrigin::root()));
	AllocationVoting::current_round_id()
}

pub fn vote(who: AccountId, round_id: RoundId, votes: &[(AppId, u128)]) {
	let (apps, weights): (Vec<_>, Vec<_>) = votes.iter().copied().unzip();
	assert_ok!(AllocationVoting::cast_vote(RuntimeOrigin::signed(who), round_id, apps, weights));
}

pub fn end_round(round_id: RoundId) {
	let deadline = pallet_allocation_voting::Rounds::<Test>::get(round_id)
		.expect("round exists")
		.deadline;
	run_to_block(deadline + 1);
}
