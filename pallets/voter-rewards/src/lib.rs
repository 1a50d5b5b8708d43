//! # Voter Rewards Pallet
//!
//! Accounts every allocation vote against the emission cycle it was cast in, and lets voters
//! claim a proportional share of that cycle's voter emission once the cycle ends.
//!
//! A vote's reward weight is its square-rooted power scaled by [`QF_PRECISION_SCALE`], or its
//! raw linear power when quadratic rewarding is disabled, plus a level bonus:
//!
//! ```ignore
//! weighted = scaled + scaled * multiplier / 100
//! reward   = voter_total * emission * 1e6 / cycle_total / 1e6
//! ```
//!
//! Whether quadratic rewarding is disabled is a block-indexed checkpoint read at the vote's
//! cycle start, so toggling only affects votes in rounds that snapshot afterwards.
//!
//! Votes arrive through [`VoteRewardsRegistrar`], normally from the allocation voting pallet.

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;

#[cfg(test)]
mod mock;


pub mod weights;
pub use weights::*;

use allocation_primitives::{
	CycleId, LevelMultiplierProvider, ParticipantLevels, VoteRewardsRegistrar,
	PERCENTAGE_DENOMINATOR, QF_PRECISION_SCALE, REWARD_PRECISION_SCALE,
};
use codec::Decode;
use frame_system::pallet_prelude::BlockNumberFor;
use sp_core::U256;
use sp_runtime::{
	helpers_128bit::multiply_by_rational_with_rounding,
	traits::{TrailingZeroInput, Zero},
	ArithmeticError, DispatchResult, Rounding,
};

const LOG_TARGET: &str = "runtime::voter-rewards";

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use allocation_primitives::{FundingSource, PayoutSink, Trace};
	use frame_support::pallet_prelude::*;
	use frame_system::pallet_prelude::*;
	use sp_std::vec::Vec;

	#[pallet::pallet]
	#[pallet::without_storage_info]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// Origin allowed to change the reward mode and level multipliers.
		type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

		type Funding: FundingSource;

		type Levels: ParticipantLevels<Self::AccountId, BlockNumberFor<Self>>;

		/// Pool the rewards are paid from.
		type Payout: PayoutSink<Self::AccountId>;

		type WeightInfo: WeightInfo;
	}

	/// Reward-weighted votes of each voter, per cycle. Zeroed on claim.
	#[pallet::storage]
	pub type CycleToVoterToTotal<T: Config> = StorageDoubleMap<
		_,
		Twox64Concat,
		CycleId,
		Blake2_128Concat,
		T::AccountId,
		u128,
		ValueQuery,
	>;

	#[pallet::storage]
	pub type CycleToTotal<T: Config> = StorageMap<_, Twox64Concat, CycleId, u128, ValueQuery>;

	/// Reward bonus in whole percent, per participant level.
	#[pallet::storage]
	#[pallet::getter(fn level_to_multiplier)]
	pub type LevelToMultiplier<T: Config> = StorageMap<_, Twox64Concat, u8, u32, ValueQuery>;

	#[pallet::storage]
	pub type QuadraticRewardingDisabled<T: Config> =
		StorageValue<_, Trace<BlockNumberFor<T>, bool>, ValueQuery>;

	#[pallet::genesis_config]
	#[derive(frame_support::DefaultNoBound)]
	pub struct GenesisConfig<T: Config> {
		/// `(level, multiplier)` pairs.
		pub level_multipliers: Vec<(u8, u32)>,
		pub quadratic_rewarding_disabled: bool,
		#[serde(skip)]
		pub _config: sp_std::marker::PhantomData<T>,
	}

	#[pallet::genesis_build]
	impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
		fn build(&self) {
			for (level, multiplier) in &self.level_multipliers {
				LevelToMultiplier::<T>::insert(level, multiplier);
			}
			QuadraticRewardingDisabled::<T>::mutate(|trace| {
				trace
					.push(Zero::zero(), self.quadratic_rewarding_disabled)
					.expect("genesis reward mode is the first checkpoint");
			});
		}
	}

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		/// A vote was counted towards `cycle` with the given reward weight.
		VoteRegistered {
			cycle: CycleId,
			voter: T::AccountId,
			votes: u128,
			reward_weighted_votes: u128,
		},
		RewardClaimed { cycle: CycleId, voter: T::AccountId, reward: u128 },
		QuadraticRewardingToggled { disabled: bool },
		LevelToMultiplierSet { level: u8, multiplier: u32 },
	}

	#[pallet::error]
	pub enum Error<T> {
		/// Votes must come from a round with a non-zero snapshot
		InvalidProposalStart,
		/// The zero account cannot collect rewards
		InvalidVoter,
		InvalidCycle,
		CycleNotEnded,
		/// Nothing left to claim for this voter and cycle
		ZeroClaim,
		InsufficientPoolBalance,
		/// Reward mode was already toggled in this block
		CheckpointOutOfOrder,
	}

	#[pallet::call(weight(<T as Config>::WeightInfo))]
	impl<T: Config> Pallet<T> {
		/// Pay `voter` their share of the emission of an ended `cycle`.
		///
		/// Anyone may submit the claim; the reward always goes to `voter`.
		#[pallet::call_index(0)]
		pub fn claim_reward(
			origin: OriginFor<T>,
			cycle: CycleId,
			voter: T::AccountId,
		) -> DispatchResult {
			ensure_signed(origin)?;
			ensure!(cycle > 0, Error::<T>::InvalidCycle);
			ensure!(T::Funding::is_cycle_ended(cycle), Error::<T>::CycleNotEnded);

			let reward = Self::get_reward(cycle, &voter);
			ensure!(reward > 0, Error::<T>::ZeroClaim);
			ensure!(T::Payout::available() >= reward, Error::<T>::InsufficientPoolBalance);

			CycleToVoterToTotal::<T>::remove(cycle, &voter);
			T::Payout::credit(&voter, reward)?;

			log::info!(
				target: LOG_TARGET,
				"✅ Voter {:?} claimed {} for cycle {}",
				voter,
				reward,
				cycle
			);
			Self::deposit_event(Event::RewardClaimed { cycle, voter, reward });
			Ok(())
		}

		/// Flip between quadratic and linear reward weighting from this block on.
		#[pallet::call_index(1)]
		pub fn toggle_quadratic_rewarding(origin: OriginFor<T>) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;

			let now = frame_system::Pallet::<T>::block_number();
			let disabled = QuadraticRewardingDisabled::<T>::try_mutate(
				|trace| -> Result<bool, DispatchError> {
					let disabled = !trace.latest();
					trace.push(now, disabled).map_err(|e| {
						log::error!(
							target: LOG_TARGET,
							"❌ Reward mode checkpoint out of order at {:?}: {:?}",
							now,
							e
						);
						Error::<T>::CheckpointOutOfOrder
					})?;
					Ok(disabled)
				},
			)?;

			Self::deposit_event(Event::QuadraticRewardingToggled { disabled });
			Ok(())
		}

		#[pallet::call_index(2)]
		pub fn set_level_to_multiplier(
			origin: OriginFor<T>,
			level: u8,
			multiplier: u32,
		) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;
			LevelToMultiplier::<T>::insert(level, multiplier);
			Self::deposit_event(Event::LevelToMultiplierSet { level, multiplier });
			Ok(())
		}
	}

	impl<T: Config> Pallet<T> {
		/// What `voter` could claim for `cycle` right now.
		pub fn get_reward(cycle: CycleId, voter: &T::AccountId) -> u128 {
			let cycle_total = CycleToTotal::<T>::get(cycle);
			if cycle_total == 0 {
				return 0;
			}
			let voter_total = CycleToVoterToTotal::<T>::get(cycle, voter);
			let emission = T::Funding::cycle_emission(cycle);

			let scale = U256::from(REWARD_PRECISION_SCALE);
			let scaled = U256::from(voter_total)
				.saturating_mul(U256::from(emission))
				.saturating_mul(scale) /
				U256::from(cycle_total);
			(scaled / scale).min(U256::from(emission)).as_u128()
		}

		pub fn cycle_total(cycle: CycleId) -> u128 {
			CycleToTotal::<T>::get(cycle)
		}

		pub fn voter_total(cycle: CycleId, voter: &T::AccountId) -> u128 {
			CycleToVoterToTotal::<T>::get(cycle, voter)
		}

		pub fn is_quadratic_rewarding_disabled_at(at: BlockNumberFor<T>) -> bool {
			QuadraticRewardingDisabled::<T>::get().upper_lookup_recent(at)
		}

		pub fn is_quadratic_rewarding_disabled() -> bool {
			QuadraticRewardingDisabled::<T>::get().latest()
		}

		/// Level bonus of `who` as of `at`, in whole percent.
		pub fn multiplier_of(who: &T::AccountId, at: BlockNumberFor<T>) -> u32 {
			LevelToMultiplier::<T>::get(T::Levels::level_of(who, at))
		}

		/// Reward weight of a vote cast against a round that snapshotted at `cycle_start`.
		pub fn reward_weighted_vote(
			cycle_start: BlockNumberFor<T>,
			voter: &T::AccountId,
			linear: u128,
			quadratic: u128,
		) -> Result<u128, DispatchError> {
			let scaled = if Self::is_quadratic_rewarding_disabled_at(cycle_start) {
				linear
			} else {
				quadratic.checked_mul(QF_PRECISION_SCALE).ok_or(ArithmeticError::Overflow)?
			};

			let multiplier =
				<Self as LevelMultiplierProvider<_, _>>::multiplier(voter, cycle_start) as u128;
			let bonus = multiply_by_rational_with_rounding(
				scaled,
				multiplier,
				PERCENTAGE_DENOMINATOR,
				Rounding::Down,
			)
			.ok_or(ArithmeticError::Overflow)?;

			scaled.checked_add(bonus).ok_or(ArithmeticError::Overflow.into())
		}

		fn is_zero_account(who: &T::AccountId) -> bool {
			T::AccountId::decode(&mut TrailingZeroInput::zeroes())
				.map(|zero| &zero == who)
				.unwrap_or(false)
		}
	}

	impl<T: Config> VoteRewardsRegistrar<T::AccountId, BlockNumberFor<T>> for Pallet<T> {
		fn register_vote(
			cycle_start: BlockNumberFor<T>,
			voter: &T::AccountId,
			linear: u128,
			quadratic: u128,
		) -> DispatchResult {
			if quadratic == 0 {
				return Ok(());
			}
			ensure!(!cycle_start.is_zero(), Error::<T>::InvalidProposalStart);
			ensure!(!Self::is_zero_account(voter), Error::<T>::InvalidVoter);

			let weighted = Self::reward_weighted_vote(cycle_start, voter, linear, quadratic)?;
			let cycle = T::Funding::current_cycle();

			CycleToVoterToTotal::<T>::try_mutate(cycle, voter, |total| -> DispatchResult {
				*total = total.checked_add(weighted).ok_or(ArithmeticError::Overflow)?;
				Ok(())
			})?;
			CycleToTotal::<T>::try_mutate(cycle, |total| -> DispatchResult {
				*total = total.checked_add(weighted).ok_or(ArithmeticError::Overflow)?;
				Ok(())
			})?;

			log::debug!(
				target: LOG_TARGET,
				"Vote of {:?} registered for cycle {} with reward weight {}",
				voter,
				cycle,
				weighted
			);
			Self::deposit_event(Event::VoteRegistered {
				cycle,
				voter: voter.clone(),
				votes: linear,
				reward_weighted_votes: weighted,
			});
			Ok(())
		}
	}
}

impl<T: Config> LevelMultiplierProvider<T::AccountId, BlockNumberFor<T>> for Pallet<T> {
	fn multiplier(who: &T::AccountId, at: BlockNumberFor<T>) -> u32 {
		Self::multiplier_of(who, at)
	}
}
