#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]

use frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use sp_std::marker::PhantomData;

/// Weight functions needed for pallet_allocation_voting.
pub trait WeightInfo {
    fn start_new_round() -> Weight;
    fn cast_vote(n: u32) -> Weight;
    fn finalize_round() -> Weight;
    fn set_quorum_numerator() -> Weight;
    fn set_voting_threshold() -> Weight;
    fn set_base_allocation_percentage() -> Weight;
    fn set_app_shares_cap() -> Weight;
}

/// Default weights for pallet_allocation_voting
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    fn start_new_round() -> Weight {
        Weight::from_parts(40_000, 0)
            .saturating_add(T::DbWeight::get().reads(8))
            .saturating_add(T::DbWeight::get().writes(3))
    }

    // One eligibility read and four tally writes per voted app.
    fn cast_vote(n: u32) -> Weight {
        Weight::from_parts(30_000, 0)
            .saturating_add(Weight::from_parts(12_000, 0).saturating_mul(n as u64))
            .saturating_add(T::DbWeight::get().reads(4))
            .saturating_add(T::DbWeight::get().reads((3 as u64).saturating_mul(n as u64)))
            .saturating_add(T::DbWeight::get().writes(3))
            .saturating_add(T::DbWeight::get().writes((4 as u64).saturating_mul(n as u64)))
    }

    fn finalize_round() -> Weight {
        Weight::from_parts(25_000, 0)
            .saturating_add(T::DbWeight::get().reads(4))
            .saturating_add(T::DbWeight::get().writes(2))
    }

    fn set_quorum_numerator() -> Weight {
        Weight::from_parts(10_000, 0)
            .saturating_add(T::DbWeight::get().reads(1))
            .saturating_add(T::DbWeight::get().writes(1))
    }

    fn set_voting_threshold() -> Weight {
        Weight::from_parts(8_000, 0).saturating_add(T::DbWeight::get().writes(1))
    }

    fn set_base_allocation_percentage() -> Weight {
        Weight::from_parts(8_000, 0).saturating_add(T::DbWeight::get().writes(1))
    }

    fn set_app_shares_cap() -> Weight {
        Weight::from_parts(8_000, 0).saturating_add(T::DbWeight::get().writes(1))
    }
}

impl WeightInfo for () {
    fn start_new_round() -> Weight {
        Weight::from_parts(40_000, 0)
    }

    fn cast_vote(n: u32) -> Weight {
        Weight::from_parts(30_000, 0)
            .saturating_add(Weight::from_parts(12_000, 0).saturating_mul(n as u64))
    }

    fn finalize_round() -> Weight {
        Weight::from_parts(25_000, 0)
    }

    fn set_quorum_numerator() -> Weight {
        Weight::from_parts(10_000, 0)
    }

    fn set_voting_threshold() -> Weight {
        Weight::from_parts(8_000, 0)
    }

    fn set_base_allocation_percentage() -> Weight {
        Weight::from_parts(8_000, 0)
    }

    fn set_app_shares_cap() -> Weight {
        Weight::from_parts(8_000, 0)
    }
}
