//! # Allocation Pool Pallet
//!
//! Turns the final tallies of an allocation round into amounts each app can claim.
//!
//! A round's funds are split in two. The base allocation is a fixed percentage divided evenly
//! between every app in the round's snapshot. The variable allocation is shared out by each
//! app's quadratic vote share, in basis points:
//!
//! ```ignore
//! share = votes_qf(app) * 10_000 / total_votes_qf
//! ```
//!
//! A share above the round's cap is cut down to it and the excess is left unallocated; it is
//! not redistributed to other apps. Whatever no app earns (capped excess, rounds without votes,
//! rounding dust) can be sent to the treasury with `claim_unallocated`.
//!
//! A failed round is shared out using the tallies of the most recent succeeded round before
//! it. With no such round every share is zero.
//!
//! Each app's earnings are paid once per round, split between its team wallet and its rewards
//! pool by `TeamAllocationPercentage`.

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;

#[cfg(test)]
mod mock;


pub mod weights;
pub use weights::*;
mod types;
pub use types::*;

use allocation_primitives::{
	AppId, RoundAllocationParams, RoundId, RoundState, PERCENTAGE_DENOMINATOR, SHARE_DENOMINATOR,
};
use core::marker::PhantomData;
use sp_runtime::{helpers_128bit::multiply_by_rational_with_rounding, Rounding};

const LOG_TARGET: &str = "runtime::allocation-pool";

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use allocation_primitives::{AppPayoutTargets, FundingSource, PayoutSink, RoundsInspector};
	use frame_support::pallet_prelude::*;
	use frame_system::pallet_prelude::*;

	#[pallet::pallet]
	#[pallet::without_storage_info]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// Origin allowed to change the team allocation percentage.
		type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

		type Rounds: RoundsInspector;

		type Funding: FundingSource;

		type Apps: AppPayoutTargets<Self::AccountId>;

		/// Pool the round funds are paid from.
		type Payout: PayoutSink<Self::AccountId>;

		/// Receives the unallocated part of each round.
		#[pallet::constant]
		type TreasuryAccount: Get<Self::AccountId>;

		type WeightInfo: WeightInfo;
	}

	/// Whole percent of an app's earnings paid to its team wallet.
	#[pallet::storage]
	#[pallet::getter(fn team_allocation_percentage)]
	pub type TeamAllocationPercentage<T: Config> = StorageValue<_, u32, ValueQuery>;

	#[pallet::storage]
	pub type Claimed<T: Config> =
		StorageDoubleMap<_, Twox64Concat, RoundId, Blake2_128Concat, AppId, bool, ValueQuery>;

	#[pallet::storage]
	pub type UnallocatedClaimed<T: Config> = StorageMap<_, Twox64Concat, RoundId, bool, ValueQuery>;

	#[pallet::genesis_config]
	#[derive(frame_support::DefaultNoBound)]
	pub struct GenesisConfig<T: Config> {
		pub team_allocation_percentage: u32,
		#[serde(skip)]
		pub _config: sp_std::marker::PhantomData<T>,
	}

	#[pallet::genesis_build]
	impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
		fn build(&self) {
			assert!(
				self.team_allocation_percentage as u128 <= PERCENTAGE_DENOMINATOR,
				"team allocation percentage must not exceed 100"
			);
			TeamAllocationPercentage::<T>::put(self.team_allocation_percentage);
		}
	}

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		AllocationClaimed {
			round_id: RoundId,
			app_id: AppId,
			team_wallet: T::AccountId,
			team_amount: u128,
			rewards_pool: T::AccountId,
			rewards_pool_amount: u128,
		},
		UnallocatedClaimed { round_id: RoundId, treasury: T::AccountId, amount: u128 },
		TeamAllocationPercentageSet { old: u32, new: u32 },
	}

	#[pallet::error]
	pub enum Error<T> {
		RoundNotFound,
		/// Earnings are only paid once the round's voting period is over
		RoundNotEnded,
		AppNotInRound,
		AlreadyClaimed,
		NothingToClaim,
		/// The app has no payout accounts
		AppNotFound,
		InsufficientPoolBalance,
		InvalidPercentage,
	}

	#[pallet::call(weight(<T as Config>::WeightInfo))]
	impl<T: Config> Pallet<T> {
		/// Pay `app_id` its earnings for an ended round.
		///
		/// Anyone may trigger the claim. The team share goes to the app's team wallet and the
		/// rest to its rewards pool.
		#[pallet::call_index(0)]
		pub fn claim(origin: OriginFor<T>, round_id: RoundId, app_id: AppId) -> DispatchResult {
			ensure_signed(origin)?;
			Self::ensure_round_ended(round_id)?;

			let params = T::Rounds::allocation_params(round_id).ok_or(Error::<T>::RoundNotFound)?;
			ensure!(params.apps.contains(&app_id), Error::<T>::AppNotInRound);
			ensure!(!Claimed::<T>::get(round_id, app_id), Error::<T>::AlreadyClaimed);

			let earnings = Self::round_earnings(round_id, &app_id);
			ensure!(earnings.total > 0, Error::<T>::NothingToClaim);

			let team_wallet = T::Apps::team_wallet(&app_id).ok_or(Error::<T>::AppNotFound)?;
			let rewards_pool = T::Apps::rewards_pool(&app_id).ok_or(Error::<T>::AppNotFound)?;
			ensure!(T::Payout::available() >= earnings.total, Error::<T>::InsufficientPoolBalance);

			Claimed::<T>::insert(round_id, app_id, true);
			T::Payout::credit(&team_wallet, earnings.team)?;
			T::Payout::credit(&rewards_pool, earnings.rewards_pool)?;

			log::info!(
				target: LOG_TARGET,
				"✅ App {:?} claimed {} for round {}",
				app_id,
				earnings.total,
				round_id
			);
			Self::deposit_event(Event::AllocationClaimed {
				round_id,
				app_id,
				team_wallet,
				team_amount: earnings.team,
				rewards_pool,
				rewards_pool_amount: earnings.rewards_pool,
			});
			Ok(())
		}

		/// Send the part of an ended round that no app earned to the treasury.
		#[pallet::call_index(1)]
		pub fn claim_unallocated(origin: OriginFor<T>, round_id: RoundId) -> DispatchResult {
			ensure_signed(origin)?;
			Self::ensure_round_ended(round_id)?;
			ensure!(!UnallocatedClaimed::<T>::get(round_id), Error::<T>::AlreadyClaimed);

			let amount = Self::round_unallocated_amount(round_id);
			ensure!(amount > 0, Error::<T>::NothingToClaim);
			ensure!(T::Payout::available() >= amount, Error::<T>::InsufficientPoolBalance);

			let treasury = T::TreasuryAccount::get();
			UnallocatedClaimed::<T>::insert(round_id, true);
			T::Payout::credit(&treasury, amount)?;

			log::info!(
				target: LOG_TARGET,
				"✅ {} unallocated from round {} sent to treasury",
				amount,
				round_id
			);
			Self::deposit_event(Event::UnallocatedClaimed { round_id, treasury, amount });
			Ok(())
		}

		#[pallet::call_index(2)]
		pub fn set_team_allocation_percentage(
			origin: OriginFor<T>,
			percentage: u32,
		) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;
			ensure!(
				percentage as u128 <= PERCENTAGE_DENOMINATOR,
				Error::<T>::InvalidPercentage
			);

			let old = TeamAllocationPercentage::<T>::mutate(|p| sp_std::mem::replace(p, percentage));
			Self::deposit_event(Event::TeamAllocationPercentageSet { old, new: percentage });
			Ok(())
		}
	}

	impl<T: Config> Pallet<T> {
		/// Amount every app in the round receives regardless of votes.
		pub fn base_allocation_amount(round_id: RoundId) -> u128 {
			let Some(params) = T::Rounds::allocation_params(round_id) else { return 0 };
			if params.apps.is_empty() {
				return 0;
			}
			let funds = T::Funding::total_round_funds(round_id);
			percentage_of(funds, params.base_allocation_percentage) / params.apps.len() as u128
		}

		/// Amount shared out by quadratic vote share.
		pub fn variable_allocation_amount(round_id: RoundId) -> u128 {
			let Some(params) = T::Rounds::allocation_params(round_id) else { return 0 };
			let funds = T::Funding::total_round_funds(round_id);
			funds.saturating_sub(percentage_of(funds, params.base_allocation_percentage))
		}

		/// `(app_share, unallocated_share)` of the variable allocation, in basis points.
		pub fn get_app_shares(round_id: RoundId, app_id: &AppId) -> (u128, u128) {
			let Some(params) = T::Rounds::allocation_params(round_id) else { return (0, 0) };
			Self::app_shares(Self::tally_round(round_id), params.app_shares_cap, app_id)
		}

		/// Earnings of `app_id` in `round_id`. Zero for apps outside the round's snapshot.
		///
		/// For a round still in voting this is an estimate from the current tallies.
		pub fn round_earnings(round_id: RoundId, app_id: &AppId) -> RoundEarnings {
			Self::round_context(round_id)
				.filter(|ctx| ctx.params.apps.contains(app_id))
				.map(|ctx| ctx.earnings(app_id))
				.unwrap_or_default()
		}

		/// Round funds that no app earns. This is what the treasury receives.
		pub fn round_unallocated_amount(round_id: RoundId) -> u128 {
			let Some(ctx) = Self::round_context(round_id) else { return 0 };
			let allocated = ctx
				.params
				.apps
				.iter()
				.map(|app_id| ctx.earnings(app_id).total)
				.fold(0u128, |acc, total| acc.saturating_add(total));
			ctx.funds.saturating_sub(allocated)
		}

		pub fn is_claimed(round_id: RoundId, app_id: &AppId) -> bool {
			Claimed::<T>::get(round_id, app_id)
		}

		// Round whose tallies decide the shares of `round_id`
		fn tally_round(round_id: RoundId) -> Option<RoundId> {
			match T::Rounds::round_state(round_id)? {
				RoundState::Failed => T::Rounds::latest_succeeded_round_before(round_id),
				RoundState::Active | RoundState::Succeeded => Some(round_id),
			}
		}

		pub(crate) fn app_shares(
			tally_round: Option<RoundId>,
			cap: u32,
			app_id: &AppId,
		) -> (u128, u128) {
			let Some(tally_round) = tally_round else { return (0, 0) };
			let total = T::Rounds::total_votes_qf(tally_round);
			if total == 0 {
				return (0, 0);
			}
			let votes = T::Rounds::app_votes_qf(tally_round, app_id);
			let share =
				multiply_by_rational_with_rounding(votes, SHARE_DENOMINATOR, total, Rounding::Down)
					.unwrap_or_default();

			let cap = (cap as u128).saturating_mul(SHARE_DENOMINATOR / PERCENTAGE_DENOMINATOR);
			if share > cap {
				(cap, share - cap)
			} else {
				(share, 0)
			}
		}

		fn round_context(round_id: RoundId) -> Option<RoundContext<T>> {
			let params = T::Rounds::allocation_params(round_id)?;
			let funds = T::Funding::total_round_funds(round_id);
			let base_total = percentage_of(funds, params.base_allocation_percentage);
			let base = match params.apps.len() as u128 {
				0 => 0,
				apps => base_total / apps,
			};
			Some(RoundContext {
				tally_round: Self::tally_round(round_id),
				funds,
				base,
				variable: funds.saturating_sub(base_total),
				team_percentage: TeamAllocationPercentage::<T>::get(),
				params,
				_phantom: PhantomData,
			})
		}

		fn ensure_round_ended(round_id: RoundId) -> DispatchResult {
			let state = T::Rounds::round_state(round_id).ok_or(Error::<T>::RoundNotFound)?;
			ensure!(state.has_ended(), Error::<T>::RoundNotEnded);
			Ok(())
		}
	}
}

fn percentage_of(amount: u128, percentage: u32) -> u128 {
	multiply_by_rational_with_rounding(
		amount,
		percentage as u128,
		PERCENTAGE_DENOMINATOR,
		Rounding::Down,
	)
	.unwrap_or_default()
}

fn share_of(amount: u128, share: u128) -> u128 {
	multiply_by_rational_with_rounding(amount, share, SHARE_DENOMINATOR, Rounding::Down)
		.unwrap_or_default()
}

// Everything about a round that is the same for each of its apps
struct RoundContext<T> {
	params: RoundAllocationParams,
	tally_round: Option<RoundId>,
	funds: u128,
	base: u128,
	variable: u128,
	team_percentage: u32,
	_phantom: PhantomData<T>,
}

impl<T: Config> RoundContext<T> {
	fn earnings(&self, app_id: &AppId) -> RoundEarnings {
		let (share, unallocated_share) =
			Pallet::<T>::app_shares(self.tally_round, self.params.app_shares_cap, app_id);
		let total = self.base.saturating_add(share_of(self.variable, share));
		let team = percentage_of(total, self.team_percentage);
		RoundEarnings {
			total,
			unallocated: share_of(self.variable, unallocated_share),
			team,
			rewards_pool: total - team,
		}
	}
}
