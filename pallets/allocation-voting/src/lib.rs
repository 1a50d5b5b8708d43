//! # Allocation Voting Pallet
//!
//! Rounds of quadratic-funding votes over the eligible x2earn apps.
//!
//! A round snapshots the current block when it starts. Voting power is read at that snapshot
//! and the apps eligible at that moment are the only ones the round accepts votes for. The
//! round accepts votes until `snapshot + VotingPeriod`. Each account votes at most once per
//! round, splitting any part of its power across apps.
//!
//! Tallies are kept twice per app: the plain sum of weights and the sum of integer square
//! roots of weights. The round total of squared root-sums is updated incrementally on every
//! vote so allocation shares can be read without iterating apps:
//!
//! ```ignore
//! sum' = sum + isqrt(weight)
//! TotalVotesQF += sum'² - sum²
//! ```
//!
//! ## Interface
//!
//! ### Dispatchable Functions
//!
//! - `start_new_round`: admin only. Finalizes the previous round, then opens a new one.
//! - `cast_vote`: vote in a round with parallel lists of app ids and weights.
//! - `finalize_round`: anyone may close an ended round and record its outcome.
//! - `set_quorum_numerator`, `set_voting_threshold`, `set_base_allocation_percentage`,
//!   `set_app_shares_cap`: admin setters.
//!
//! Every accepted vote is forwarded to [`Config::VoteRewards`] and the pallet implements
//! [`RoundsInspector`] for the allocation pool.

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;

#[cfg(test)]
mod mock;


pub mod weights;
pub use weights::*;
mod types;
pub use types::*;

use allocation_primitives::{
	isqrt, AppId, RoundAllocationParams, RoundId, RoundState, RoundsInspector,
	PERCENTAGE_DENOMINATOR,
};
use sp_std::vec::Vec;

const LOG_TARGET: &str = "runtime::allocation-voting";

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use allocation_primitives::{EligibilityRegistry, Trace, VoteRewardsRegistrar, VotingPowerSource};
	use frame_support::pallet_prelude::*;
	use frame_system::pallet_prelude::*;
	use sp_runtime::{
		helpers_128bit::multiply_by_rational_with_rounding,
		traits::{Saturating, Zero},
		ArithmeticError, Rounding,
	};

	#[pallet::pallet]
	#[pallet::without_storage_info]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// Origin allowed to start rounds and change voting parameters.
		type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

		type Eligibility: EligibilityRegistry<BlockNumberFor<Self>>;

		type VotingPower: VotingPowerSource<Self::AccountId, BlockNumberFor<Self>>;

		/// Notified of every accepted vote.
		type VoteRewards: VoteRewardsRegistrar<Self::AccountId, BlockNumberFor<Self>>;

		/// Blocks after the snapshot during which votes are accepted.
		#[pallet::constant]
		type VotingPeriod: Get<BlockNumberFor<Self>>;

		#[pallet::constant]
		type MaxAppsPerVote: Get<u32>;

		type WeightInfo: WeightInfo;
	}

	/// Latest round id. Zero until the first round starts.
	#[pallet::storage]
	#[pallet::getter(fn current_round_id)]
	pub type CurrentRoundId<T: Config> = StorageValue<_, RoundId, ValueQuery>;

	#[pallet::storage]
	#[pallet::getter(fn round)]
	pub type Rounds<T: Config> = StorageMap<_, Twox64Concat, RoundId, RoundInfo<BlockNumberFor<T>>>;

	#[pallet::storage]
	pub type VotesReceived<T: Config> =
		StorageDoubleMap<_, Twox64Concat, RoundId, Blake2_128Concat, AppId, u128, ValueQuery>;

	// Sum of the square roots of the votes received by an app
	#[pallet::storage]
	pub type VotesReceivedQF<T: Config> =
		StorageDoubleMap<_, Twox64Concat, RoundId, Blake2_128Concat, AppId, u128, ValueQuery>;

	#[pallet::storage]
	pub type TotalVotes<T: Config> = StorageMap<_, Twox64Concat, RoundId, u128, ValueQuery>;

	// Sum over apps of the squared VotesReceivedQF
	#[pallet::storage]
	pub type TotalVotesQF<T: Config> = StorageMap<_, Twox64Concat, RoundId, u128, ValueQuery>;

	#[pallet::storage]
	pub type TotalVoters<T: Config> = StorageMap<_, Twox64Concat, RoundId, u32, ValueQuery>;

	#[pallet::storage]
	pub type HasVoted<T: Config> = StorageDoubleMap<
		_,
		Twox64Concat,
		RoundId,
		Blake2_128Concat,
		T::AccountId,
		bool,
		ValueQuery,
	>;

	/// Quorum as a whole percent of total voting supply, by block it took effect.
	#[pallet::storage]
	pub type QuorumNumerator<T: Config> =
		StorageValue<_, Trace<BlockNumberFor<T>, u32>, ValueQuery>;

	#[pallet::storage]
	#[pallet::getter(fn voting_threshold)]
	pub type VotingThreshold<T: Config> = StorageValue<_, u128, ValueQuery>;

	#[pallet::storage]
	#[pallet::getter(fn base_allocation_percentage)]
	pub type BaseAllocationPercentage<T: Config> = StorageValue<_, u32, ValueQuery>;

	#[pallet::storage]
	#[pallet::getter(fn app_shares_cap)]
	pub type AppSharesCap<T: Config> = StorageValue<_, u32, ValueQuery>;

	/// Most recent round finalized as succeeded. Zero when none has.
	#[pallet::storage]
	#[pallet::getter(fn latest_succeeded_round_id)]
	pub type LatestSucceededRoundId<T: Config> = StorageValue<_, RoundId, ValueQuery>;

	#[pallet::genesis_config]
	#[derive(frame_support::DefaultNoBound)]
	pub struct GenesisConfig<T: Config> {
		pub quorum_numerator: u32,
		pub voting_threshold: u128,
		pub base_allocation_percentage: u32,
		pub app_shares_cap: u32,
		#[serde(skip)]
		pub _config: sp_std::marker::PhantomData<T>,
	}

	#[pallet::genesis_build]
	impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
		fn build(&self) {
			assert!(
				Pallet::<T>::is_valid_percentage(self.quorum_numerator) &&
					Pallet::<T>::is_valid_percentage(self.base_allocation_percentage) &&
					Pallet::<T>::is_valid_percentage(self.app_shares_cap),
				"genesis percentages must not exceed 100"
			);
			assert!(self.app_shares_cap > 0, "genesis app shares cap must be positive");

			QuorumNumerator::<T>::mutate(|trace| {
				trace
					.push(Zero::zero(), self.quorum_numerator)
					.expect("genesis quorum is the first checkpoint");
			});
			VotingThreshold::<T>::put(self.voting_threshold);
			BaseAllocationPercentage::<T>::put(self.base_allocation_percentage);
			AppSharesCap::<T>::put(self.app_shares_cap);
		}
	}

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		RoundCreated {
			round_id: RoundId,
			snapshot: BlockNumberFor<T>,
			deadline: BlockNumberFor<T>,
			apps: Vec<AppId>,
		},
		AllocationVoteCast {
			voter: T::AccountId,
			round_id: RoundId,
			app_ids: Vec<AppId>,
			weights: Vec<u128>,
		},
		RoundFinalized { round_id: RoundId, state: RoundState },
		QuorumNumeratorUpdated { old: u32, new: u32 },
		VotingThresholdSet { old: u128, new: u128 },
		BaseAllocationPercentageSet { old: u32, new: u32 },
		AppSharesCapSet { old: u32, new: u32 },
	}

	#[pallet::error]
	pub enum Error<T> {
		RoundNotFound,
		/// The round's voting period is over
		RoundNotActive,
		/// The previous round is still accepting votes
		RoundStillActive,
		/// The round's voting period has not ended yet
		RoundNotEnded,
		RoundAlreadyFinalized,
		AlreadyVoted,
		/// App ids and weights differ in length, or are empty
		LengthMismatch,
		TooManyVotes,
		ZeroVoteWeight,
		/// App is not among the apps eligible when the round started
		IneligibleRecipient,
		InsufficientVotingPower,
		BelowVotingThreshold,
		/// Percentage above 100
		InvalidPercentage,
		/// Quorum was already changed in this block
		CheckpointOutOfOrder,
	}

	#[pallet::call(weight(<T as Config>::WeightInfo))]
	impl<T: Config> Pallet<T> {
		/// Open the next round, snapshotting at the current block.
		///
		/// The previous round must have ended; it is finalized here if nobody did so yet.
		#[pallet::call_index(0)]
		pub fn start_new_round(origin: OriginFor<T>) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;
			Self::do_start_new_round()?;
			Ok(())
		}

		/// Vote in `round_id`, giving `weights[i]` of the caller's voting power to
		/// `app_ids[i]`.
		///
		/// The whole vote is checked before anything is counted. Emits `AllocationVoteCast`.
		#[pallet::call_index(1)]
		#[pallet::weight(T::WeightInfo::cast_vote(app_ids.len() as u32))]
		pub fn cast_vote(
			origin: OriginFor<T>,
			round_id: RoundId,
			app_ids: Vec<AppId>,
			weights: Vec<u128>,
		) -> DispatchResult {
			let voter = ensure_signed(origin)?;

			let round = Rounds::<T>::get(round_id).ok_or(Error::<T>::RoundNotFound)?;
			ensure!(
				frame_system::Pallet::<T>::block_number() <= round.deadline,
				Error::<T>::RoundNotActive
			);
			ensure!(!HasVoted::<T>::get(round_id, &voter), Error::<T>::AlreadyVoted);
			ensure!(
				!app_ids.is_empty() && app_ids.len() == weights.len(),
				Error::<T>::LengthMismatch
			);
			ensure!(
				app_ids.len() as u32 <= T::MaxAppsPerVote::get(),
				Error::<T>::TooManyVotes
			);

			let total_weight = Self::validate_vote(&voter, &round, &app_ids, &weights)?;

			for (app_id, weight) in app_ids.iter().zip(weights.iter()) {
				Self::count_vote(round_id, app_id, *weight)?;
			}
			HasVoted::<T>::insert(round_id, &voter, true);
			TotalVoters::<T>::mutate(round_id, |voters| voters.saturating_inc());

			T::VoteRewards::register_vote(
				round.snapshot,
				&voter,
				total_weight,
				isqrt(total_weight),
			)?;

			log::debug!(
				target: LOG_TARGET,
				"Vote of {:?} counted in round {} across {} apps",
				total_weight,
				round_id,
				app_ids.len()
			);
			Self::deposit_event(Event::AllocationVoteCast { voter, round_id, app_ids, weights });
			Ok(())
		}

		/// Record the outcome of an ended round.
		#[pallet::call_index(2)]
		pub fn finalize_round(origin: OriginFor<T>, round_id: RoundId) -> DispatchResult {
			ensure_signed(origin)?;
			Self::do_finalize_round(round_id)?;
			Ok(())
		}

		/// Set the quorum for rounds snapshotting from this block on.
		#[pallet::call_index(3)]
		pub fn set_quorum_numerator(origin: OriginFor<T>, numerator: u32) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;
			ensure!(Self::is_valid_percentage(numerator), Error::<T>::InvalidPercentage);

			let now = frame_system::Pallet::<T>::block_number();
			let (old, new) = QuorumNumerator::<T>::try_mutate(
				|trace| -> Result<(u32, u32), DispatchError> {
					trace.push(now, numerator).map_err(|e| {
						log::error!(
							target: LOG_TARGET,
							"❌ Quorum checkpoint out of order at {:?}: {:?}",
							now,
							e
						);
						Error::<T>::CheckpointOutOfOrder.into()
					})
				},
			)?;

			Self::deposit_event(Event::QuorumNumeratorUpdated { old, new });
			Ok(())
		}

		#[pallet::call_index(4)]
		pub fn set_voting_threshold(origin: OriginFor<T>, threshold: u128) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;
			let old = VotingThreshold::<T>::mutate(|t| sp_std::mem::replace(t, threshold));
			Self::deposit_event(Event::VotingThresholdSet { old, new: threshold });
			Ok(())
		}

		#[pallet::call_index(5)]
		pub fn set_base_allocation_percentage(
			origin: OriginFor<T>,
			percentage: u32,
		) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;
			ensure!(Self::is_valid_percentage(percentage), Error::<T>::InvalidPercentage);
			let old = BaseAllocationPercentage::<T>::mutate(|p| sp_std::mem::replace(p, percentage));
			Self::deposit_event(Event::BaseAllocationPercentageSet { old, new: percentage });
			Ok(())
		}

		#[pallet::call_index(6)]
		pub fn set_app_shares_cap(origin: OriginFor<T>, cap: u32) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;
			ensure!(cap > 0 && Self::is_valid_percentage(cap), Error::<T>::InvalidPercentage);
			let old = AppSharesCap::<T>::mutate(|c| sp_std::mem::replace(c, cap));
			Self::deposit_event(Event::AppSharesCapSet { old, new: cap });
			Ok(())
		}
	}

	impl<T: Config> Pallet<T> {
		/// Open a new round at the current block, finalizing the previous one first.
		pub fn do_start_new_round() -> Result<RoundId, DispatchError> {
			let now = frame_system::Pallet::<T>::block_number();
			let current = CurrentRoundId::<T>::get();

			if current > 0 {
				let previous = Rounds::<T>::get(current).ok_or(Error::<T>::RoundNotFound)?;
				ensure!(now > previous.deadline, Error::<T>::RoundStillActive);
				if !previous.finalized {
					Self::do_finalize_round(current)?;
				}
			}

			let round_id = current.checked_add(1).ok_or(ArithmeticError::Overflow)?;
			let deadline = now.saturating_add(T::VotingPeriod::get());
			let apps = T::Eligibility::eligible_apps(now);

			Rounds::<T>::insert(
				round_id,
				RoundInfo {
					snapshot: now,
					deadline,
					apps: apps.clone(),
					previous_succeeded: Some(LatestSucceededRoundId::<T>::get())
						.filter(|id| *id > 0),
					base_allocation_percentage: BaseAllocationPercentage::<T>::get(),
					app_shares_cap: AppSharesCap::<T>::get(),
					voting_threshold: VotingThreshold::<T>::get(),
					finalized: false,
				},
			);
			CurrentRoundId::<T>::put(round_id);

			log::info!(
				target: LOG_TARGET,
				"✅ Round {} started at {:?} with {} apps, deadline {:?}",
				round_id,
				now,
				apps.len(),
				deadline
			);
			Self::deposit_event(Event::RoundCreated { round_id, snapshot: now, deadline, apps });
			Ok(round_id)
		}

		pub fn do_finalize_round(round_id: RoundId) -> Result<RoundState, DispatchError> {
			let state = Self::state(round_id).ok_or(Error::<T>::RoundNotFound)?;
			ensure!(state.has_ended(), Error::<T>::RoundNotEnded);

			Rounds::<T>::try_mutate(round_id, |maybe_round| -> DispatchResult {
				let round = maybe_round.as_mut().ok_or(Error::<T>::RoundNotFound)?;
				ensure!(!round.finalized, Error::<T>::RoundAlreadyFinalized);
				round.finalized = true;
				Ok(())
			})?;

			if state == RoundState::Succeeded {
				LatestSucceededRoundId::<T>::mutate(|latest| {
					if round_id > *latest {
						*latest = round_id;
					}
				});
			}

			log::info!(target: LOG_TARGET, "✅ Round {} finalized as {:?}", round_id, state);
			Self::deposit_event(Event::RoundFinalized { round_id, state });
			Ok(state)
		}

		/// Checks every pair and returns the vote's total weight.
		fn validate_vote(
			voter: &T::AccountId,
			round: &RoundInfo<BlockNumberFor<T>>,
			app_ids: &[AppId],
			weights: &[u128],
		) -> Result<u128, DispatchError> {
			let power = T::VotingPower::voting_power(voter, round.snapshot);

			let mut total: u128 = 0;
			for (app_id, weight) in app_ids.iter().zip(weights.iter()) {
				ensure!(*weight > 0, Error::<T>::ZeroVoteWeight);
				// the round's app list is its eligibility snapshot; later changes in the
				// snapshot block must not let other apps in
				ensure!(round.apps.contains(app_id), Error::<T>::IneligibleRecipient);
				total = total.checked_add(*weight).ok_or(ArithmeticError::Overflow)?;
				ensure!(total <= power, Error::<T>::InsufficientVotingPower);
			}

			ensure!(total >= round.voting_threshold, Error::<T>::BelowVotingThreshold);
			Ok(total)
		}

		fn count_vote(round_id: RoundId, app_id: &AppId, weight: u128) -> DispatchResult {
			let old_sum = VotesReceivedQF::<T>::get(round_id, app_id);
			let new_sum = old_sum.checked_add(isqrt(weight)).ok_or(ArithmeticError::Overflow)?;

			let old_square = old_sum.checked_mul(old_sum).ok_or(ArithmeticError::Overflow)?;
			let new_square = new_sum.checked_mul(new_sum).ok_or(ArithmeticError::Overflow)?;

			TotalVotesQF::<T>::try_mutate(round_id, |total| -> DispatchResult {
				*total = total
					.checked_add(new_square - old_square)
					.ok_or(ArithmeticError::Overflow)?;
				Ok(())
			})?;
			VotesReceivedQF::<T>::insert(round_id, app_id, new_sum);

			VotesReceived::<T>::try_mutate(round_id, app_id, |votes| -> DispatchResult {
				*votes = votes.checked_add(weight).ok_or(ArithmeticError::Overflow)?;
				Ok(())
			})?;
			TotalVotes::<T>::try_mutate(round_id, |total| -> DispatchResult {
				*total = total.checked_add(weight).ok_or(ArithmeticError::Overflow)?;
				Ok(())
			})
		}

		pub(crate) fn is_valid_percentage(value: u32) -> bool {
			value as u128 <= PERCENTAGE_DENOMINATOR
		}

		/// Voting or ended state of a round, `None` if it does not exist.
		pub fn state(round_id: RoundId) -> Option<RoundState> {
			let round = Rounds::<T>::get(round_id)?;
			let state = if frame_system::Pallet::<T>::block_number() <= round.deadline {
				RoundState::Active
			} else if Self::vote_succeeded(round_id) {
				RoundState::Succeeded
			} else {
				RoundState::Failed
			};
			Some(state)
		}

		pub fn quorum_numerator(at: BlockNumberFor<T>) -> u32 {
			QuorumNumerator::<T>::get().upper_lookup_recent(at)
		}

		/// Votes needed for a round snapshotted at `at` to succeed.
		pub fn quorum(at: BlockNumberFor<T>) -> u128 {
			multiply_by_rational_with_rounding(
				T::VotingPower::total_supply(at),
				Self::quorum_numerator(at) as u128,
				PERCENTAGE_DENOMINATOR,
				Rounding::Down,
			)
			.unwrap_or(u128::MAX)
		}

		pub fn quorum_reached(round_id: RoundId) -> bool {
			Rounds::<T>::get(round_id)
				.map(|round| TotalVotes::<T>::get(round_id) >= Self::quorum(round.snapshot))
				.unwrap_or(false)
		}

		/// A round succeeds when it reaches quorum; there is no further threshold.
		pub fn vote_succeeded(round_id: RoundId) -> bool {
			Self::quorum_reached(round_id)
		}

		pub fn is_active(round_id: RoundId) -> bool {
			Self::state(round_id) == Some(RoundState::Active)
		}

		pub fn has_voted(round_id: RoundId, who: &T::AccountId) -> bool {
			HasVoted::<T>::get(round_id, who)
		}

		pub fn get_app_votes(round_id: RoundId, app_id: &AppId) -> u128 {
			VotesReceived::<T>::get(round_id, app_id)
		}

		/// Squared sum of the square roots of the votes received by `app_id`.
		pub fn get_app_votes_qf(round_id: RoundId, app_id: &AppId) -> u128 {
			let sum = VotesReceivedQF::<T>::get(round_id, app_id);
			sum.saturating_mul(sum)
		}

		pub fn total_votes(round_id: RoundId) -> u128 {
			TotalVotes::<T>::get(round_id)
		}

		pub fn total_votes_qf(round_id: RoundId) -> u128 {
			TotalVotesQF::<T>::get(round_id)
		}

		pub fn total_voters(round_id: RoundId) -> u32 {
			TotalVoters::<T>::get(round_id)
		}
	}
}

impl<T: Config> RoundsInspector for Pallet<T> {
	fn round_state(round: RoundId) -> Option<RoundState> {
		Self::state(round)
	}

	fn allocation_params(round: RoundId) -> Option<RoundAllocationParams> {
		Rounds::<T>::get(round).map(|info| RoundAllocationParams {
			apps: info.apps,
			base_allocation_percentage: info.base_allocation_percentage,
			app_shares_cap: info.app_shares_cap,
		})
	}

	fn app_votes_qf(round: RoundId, app: &AppId) -> u128 {
		Self::get_app_votes_qf(round, app)
	}

	fn total_votes_qf(round: RoundId) -> u128 {
		Self::total_votes_qf(round)
	}

	// Recorded when the round started; `None` for rounds that were never started.
	fn latest_succeeded_round_before(round: RoundId) -> Option<RoundId> {
		Rounds::<T>::get(round)?.previous_succeeded
	}
}
