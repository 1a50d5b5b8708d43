//! # X2Earn Apps Pallet
//!
//! Registry of the apps that compete for allocation votes.
//!
//! Each app is identified by the hash of its name and carries the two accounts its round
//! allocation is paid to. Voting eligibility is stored as a block-indexed checkpoint trace so
//! the voting pallet can ask whether an app was eligible at a round's snapshot, long after the
//! flag has changed.
//!
//! ## Interface
//!
//! ### Admin Functions
//!
//! - `add_app`: register an app; it starts out eligible.
//! - `set_voting_eligibility`: flip an app's eligibility as of the current block.
//! - `update_team_wallet` / `update_rewards_pool`: change payout accounts.
//!
//! The pallet implements [`EligibilityRegistry`] and [`AppPayoutTargets`].

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;

#[cfg(test)]
mod mock;


pub mod weights;
pub use weights::*;
mod types;
pub use types::*;

use allocation_primitives::{AppId, AppPayoutTargets, EligibilityRegistry};
use frame_system::pallet_prelude::BlockNumberFor;
use sp_std::vec::Vec;

const LOG_TARGET: &str = "runtime::x2earn-apps";

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use allocation_primitives::Trace;
	use frame_support::pallet_prelude::*;
	use frame_system::pallet_prelude::*;
	use sp_runtime::traits::{BlakeTwo256, Hash};

	#[pallet::pallet]
	#[pallet::without_storage_info]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// Origin allowed to register apps and change their eligibility.
		type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

		#[pallet::constant]
		type MaxApps: Get<u32>;

		#[pallet::constant]
		type MaxNameLength: Get<u32>;

		type WeightInfo: WeightInfo;
	}

	#[pallet::storage]
	#[pallet::getter(fn app)]
	pub type Apps<T: Config> =
		StorageMap<_, Blake2_128Concat, AppId, AppInfo<T::AccountId, BlockNumberFor<T>>>;

	// Registration order, used when listing eligible apps
	#[pallet::storage]
	#[pallet::getter(fn app_ids)]
	pub type AppIds<T: Config> = StorageValue<_, Vec<AppId>, ValueQuery>;

	#[pallet::storage]
	pub type VotingEligibility<T: Config> =
		StorageMap<_, Blake2_128Concat, AppId, Trace<BlockNumberFor<T>, bool>, ValueQuery>;

	#[pallet::genesis_config]
	#[derive(frame_support::DefaultNoBound)]
	pub struct GenesisConfig<T: Config> {
		/// `(name, team_wallet, rewards_pool)` of apps registered at genesis.
		pub apps: Vec<(Vec<u8>, T::AccountId, T::AccountId)>,
	}

	#[pallet::genesis_build]
	impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
		fn build(&self) {
			for (name, team_wallet, rewards_pool) in &self.apps {
				Pallet::<T>::do_add_app(name.clone(), team_wallet.clone(), rewards_pool.clone())
					.expect("genesis apps must be unique and well formed");
			}
		}
	}

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		AppAdded { app_id: AppId, name: Vec<u8>, team_wallet: T::AccountId, rewards_pool: T::AccountId },
		VotingEligibilityUpdated { app_id: AppId, eligible: bool },
		TeamWalletUpdated { app_id: AppId, team_wallet: T::AccountId },
		RewardsPoolUpdated { app_id: AppId, rewards_pool: T::AccountId },
	}

	#[pallet::error]
	pub enum Error<T> {
		/// An app with the same name is already registered
		AppAlreadyExists,
		AppNotFound,
		EmptyName,
		NameTooLong,
		TooManyApps,
		/// The app already has the requested eligibility
		EligibilityUnchanged,
		/// Eligibility was already changed in this block
		CheckpointOutOfOrder,
	}

	#[pallet::call(weight(<T as Config>::WeightInfo))]
	impl<T: Config> Pallet<T> {
		/// Register a new app. Its id is the hash of `name`.
		///
		/// Emits `AppAdded`.
		#[pallet::call_index(0)]
		pub fn add_app(
			origin: OriginFor<T>,
			name: Vec<u8>,
			team_wallet: T::AccountId,
			rewards_pool: T::AccountId,
		) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;
			Self::do_add_app(name, team_wallet, rewards_pool)?;
			Ok(())
		}

		#[pallet::call_index(1)]
		pub fn set_voting_eligibility(
			origin: OriginFor<T>,
			app_id: AppId,
			eligible: bool,
		) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;
			ensure!(Apps::<T>::contains_key(app_id), Error::<T>::AppNotFound);
			ensure!(
				VotingEligibility::<T>::get(app_id).latest() != eligible,
				Error::<T>::EligibilityUnchanged
			);

			Self::push_eligibility(app_id, eligible)?;
			Self::deposit_event(Event::VotingEligibilityUpdated { app_id, eligible });
			Ok(())
		}

		#[pallet::call_index(2)]
		pub fn update_team_wallet(
			origin: OriginFor<T>,
			app_id: AppId,
			team_wallet: T::AccountId,
		) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;
			Apps::<T>::try_mutate(app_id, |maybe_app| -> DispatchResult {
				let app = maybe_app.as_mut().ok_or(Error::<T>::AppNotFound)?;
				app.team_wallet = team_wallet.clone();
				Ok(())
			})?;

			Self::deposit_event(Event::TeamWalletUpdated { app_id, team_wallet });
			Ok(())
		}

		#[pallet::call_index(3)]
		pub fn update_rewards_pool(
			origin: OriginFor<T>,
			app_id: AppId,
			rewards_pool: T::AccountId,
		) -> DispatchResult {
			T::AdminOrigin::ensure_origin(origin)?;
			Apps::<T>::try_mutate(app_id, |maybe_app| -> DispatchResult {
				let app = maybe_app.as_mut().ok_or(Error::<T>::AppNotFound)?;
				app.rewards_pool = rewards_pool.clone();
				Ok(())
			})?;

			Self::deposit_event(Event::RewardsPoolUpdated { app_id, rewards_pool });
			Ok(())
		}
	}

	impl<T: Config> Pallet<T> {
		pub fn app_id_of(name: &[u8]) -> AppId {
			BlakeTwo256::hash(name)
		}

		/// Whether `app_id` is eligible as of the current block.
		pub fn is_eligible_now(app_id: &AppId) -> bool {
			VotingEligibility::<T>::get(app_id).latest()
		}

		pub(crate) fn do_add_app(
			name: Vec<u8>,
			team_wallet: T::AccountId,
			rewards_pool: T::AccountId,
		) -> Result<AppId, DispatchError> {
			ensure!(!name.is_empty(), Error::<T>::EmptyName);
			ensure!(name.len() as u32 <= T::MaxNameLength::get(), Error::<T>::NameTooLong);

			let app_id = Self::app_id_of(&name);
			ensure!(!Apps::<T>::contains_key(app_id), Error::<T>::AppAlreadyExists);

			AppIds::<T>::try_mutate(|ids| -> DispatchResult {
				ensure!((ids.len() as u32) < T::MaxApps::get(), Error::<T>::TooManyApps);
				ids.push(app_id);
				Ok(())
			})?;

			let info = AppInfo {
				name: name.clone(),
				team_wallet: team_wallet.clone(),
				rewards_pool: rewards_pool.clone(),
				created_at: frame_system::Pallet::<T>::block_number(),
			};
			Apps::<T>::insert(app_id, info);
			Self::push_eligibility(app_id, true)?;

			log::info!(target: LOG_TARGET, "✅ Registered app {:?}", app_id);
			Self::deposit_event(Event::AppAdded { app_id, name, team_wallet, rewards_pool });
			Ok(app_id)
		}

		fn push_eligibility(app_id: AppId, eligible: bool) -> DispatchResult {
			let now = frame_system::Pallet::<T>::block_number();
			VotingEligibility::<T>::try_mutate(app_id, |trace| -> DispatchResult {
				trace.push(now, eligible).map(|_| ()).map_err(|e| {
					log::error!(
						target: LOG_TARGET,
						"❌ Eligibility checkpoint for {:?} out of order at {:?}: {:?}",
						app_id,
						now,
						e
					);
					Error::<T>::CheckpointOutOfOrder.into()
				})
			})
		}
	}
}

impl<T: Config> EligibilityRegistry<BlockNumberFor<T>> for Pallet<T> {
	fn is_eligible(app: &AppId, at: BlockNumberFor<T>) -> bool {
		VotingEligibility::<T>::get(app).upper_lookup_recent(at)
	}

	fn eligible_apps(at: BlockNumberFor<T>) -> Vec<AppId> {
		AppIds::<T>::get()
			.into_iter()
			.filter(|app| Self::is_eligible(app, at))
			.collect()
	}
}

impl<T: Config> AppPayoutTargets<T::AccountId> for Pallet<T> {
	fn team_wallet(app: &AppId) -> Option<T::AccountId> {
		Apps::<T>::get(app).map(|info| info.team_wallet)
	}

	fn rewards_pool(app: &AppId) -> Option<T::AccountId> {
		Apps::<T>::get(app).map(|info| info.rewards_pool)
	}
}
