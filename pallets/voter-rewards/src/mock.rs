use crate as pallet_voter_rewards;
use allocation_primitives::{CycleId, FundingSource, PalletPot, ParticipantLevels, RoundId};
use frame_support::{derive_impl, parameter_types, PalletId};
use frame_system::EnsureRoot;
use sp_runtime::BuildStorage;
use std::{
	cell::RefCell,
	collections::{BTreeMap, BTreeSet},
};

type Block = frame_system::mocking::MockBlock<Test>;
pub type AccountId = u64;
pub type Balance = u128;

pub const POT_BALANCE: Balance = 1_000_000;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
	pub enum Test {
		System: frame_system,
		Balances: pallet_balances,
		VoterRewards: pallet_voter_rewards,
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
	pub const RewardsPotId: PalletId = PalletId(*b"vtrrwrds");
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Test {
	type Balance = Balance;
	type AccountStore = System;
	type ExistentialDeposit = ExistentialDeposit;
}

thread_local! {
	static CURRENT_CYCLE: RefCell<CycleId> = RefCell::new(1);
	static ENDED_CYCLES: RefCell<BTreeSet<CycleId>> = RefCell::new(BTreeSet::new());
	static EMISSIONS: RefCell<BTreeMap<CycleId, u128>> = RefCell::new(BTreeMap::new());
	static LEVELS: RefCell<BTreeMap<AccountId, u8>> = RefCell::new(BTreeMap::new());
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

	fn total_round_funds(_round: RoundId) -> u128 {
		0
	}
}

/// Close the current cycle with `emission` for voters and move to the next one.
pub fn end_cycle(emission: u128) -> CycleId {
	let cycle = MockFunding::current_cycle();
	EMISSIONS.with(|e| e.borrow_mut().insert(cycle, emission));
	ENDED_CYCLES.with(|e| e.borrow_mut().insert(cycle));
	CURRENT_CYCLE.with(|c| *c.borrow_mut() = cycle + 1);
	cycle
}

pub struct MockLevels;

impl ParticipantLevels<AccountId, u64> for MockLevels {
	fn level_of(who: &AccountId, _at: u64) -> u8 {
		LEVELS.with(|l| l.borrow().get(who).copied().unwrap_or(1))
	}
}

pub fn set_level(who: AccountId, level: u8) {
	LEVELS.with(|l| l.borrow_mut().insert(who, level));
}

pub type RewardsPot = PalletPot<Balances, RewardsPotId>;

impl pallet_voter_rewards::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type AdminOrigin = EnsureRoot<AccountId>;
	type Funding = MockFunding;
	type Levels = MockLevels;
	type Payout = RewardsPot;
	type WeightInfo = ();
}

pub fn pot_account() -> AccountId {
	RewardsPot::account_id()
}

// Build genesis storage according to the mock runtime.
pub fn new_test_ext() -> sp_io::TestExternalities {
	let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

	pallet_balances::GenesisConfig::<Test> {
		balances: vec![(pot_account(), POT_BALANCE)],
		..Default::default()
	}
	.assimilate_storage(&mut t)
	.unwrap();

	// level 1 is the default and carries no bonus
	pallet_voter_rewards::GenesisConfig::<Test> {
		level_multipliers: vec![(2, 10), (5, 50), (10, 100)],
		quadratic_rewarding_disabled: false,
		..Default::default()
	}
	.assimilate_storage(&mut t)
	.unwrap();

	CURRENT_CYCLE.with(|c| *c.borrow_mut() = 1);
	ENDED_CYCLES.with(|e| e.borrow_mut().clear());
	EMISSIONS.with(|e| e.borrow_mut().clear());
	LEVELS.with(|l| l.borrow_mut().clear());

	let mut ext = sp_io::TestExternalities::new(t);
	ext.execute_with(|| System::set_block_number(1));
	ext
}

pub fn run_to_block(n: u64) {
	System::set_block_number(n);
}
