#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]

use frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use sp_std::marker::PhantomData;

/// Weight functions needed for pallet_x2earn_apps.
pub trait WeightInfo {
    fn add_app() -> Weight;
    fn set_voting_eligibility() -> Weight;
    fn update_team_wallet() -> Weight;
    fn update_rewards_pool() -> Weight;
}

/// Default weights for pallet_x2earn_apps
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    fn add_app() -> Weight {
        Weight::from_parts(20_000, 0)
            .saturating_add(T::DbWeight::get().reads(2))
            .saturating_add(T::DbWeight::get().writes(3))
    }

    fn set_voting_eligibility() -> Weight {
        Weight::from_parts(15_000, 0)
            .saturating_add(T::DbWeight::get().reads(2))
            .saturating_add(T::DbWeight::get().writes(1))
    }

    fn update_team_wallet() -> Weight {
        Weight::from_parts(10_000, 0)
            .saturating_add(T::DbWeight::get().reads(1))
            .saturating_add(T::DbWeight::get().writes(1))
    }

    fn update_rewards_pool() -> Weight {
        Weight::from_parts(10_000, 0)
            .saturating_add(T::DbWeight::get().reads(1))
            .saturating_add(T::DbWeight::get().writes(1))
    }
}

impl WeightInfo for () {
    fn add_app() -> Weight {
        Weight::from_parts(20_000, 0)
    }

    fn set_voting_eligibility() -> Weight {
        Weight::from_parts(15_000, 0)
    }

    fn update_team_wallet() -> Weight {
        Weight::from_parts(10_000, 0)
    }

    fn update_rewards_pool() -> Weight {
        Weight::from_parts(10_000, 0)
    }
}
