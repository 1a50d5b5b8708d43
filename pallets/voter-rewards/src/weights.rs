#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]

use frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use sp_std::marker::PhantomData;

/// Weight functions needed for pallet_voter_rewards.
pub trait WeightInfo {
    fn claim_reward() -> Weight;
    fn toggle_quadratic_rewarding() -> Weight;
    fn set_level_to_multiplier() -> Weight;
}

/// Default weights for pallet_voter_rewards
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    // Includes the payout transfer.
    fn claim_reward() -> Weight {
        Weight::from_parts(55_000, 0)
            .saturating_add(T::DbWeight::get().reads(5))
            .saturating_add(T::DbWeight::get().writes(3))
    }

    fn toggle_quadratic_rewarding() -> Weight {
        Weight::from_parts(12_000, 0)
            .saturating_add(T::DbWeight::get().reads(1))
            .saturating_add(T::DbWeight::get().writes(1))
    }

    fn set_level_to_multiplier() -> Weight {
        Weight::from_parts(8_000, 0).saturating_add(T::DbWeight::get().writes(1))
    }
}

impl WeightInfo for () {
    fn claim_reward() -> Weight {
        Weight::from_parts(55_000, 0)
    }

    fn toggle_quadratic_rewarding() -> Weight {
        Weight::from_parts(12_000, 0)
    }

    fn set_level_to_multiplier() -> Weight {
        Weight::from_parts(8_000, 0)
    }
}
