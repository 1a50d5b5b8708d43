#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]

use frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use sp_std::marker::PhantomData;

/// Weight functions needed for pallet_allocation_pool.
pub trait WeightInfo {
    fn claim() -> Weight;
    fn claim_unallocated() -> Weight;
    fn set_team_allocation_percentage() -> Weight;
}

/// Default weights for pallet_allocation_pool
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    // Two payout transfers.
    fn claim() -> Weight {
        Weight::from_parts(80_000, 0)
            .saturating_add(T::DbWeight::get().reads(10))
            .saturating_add(T::DbWeight::get().writes(4))
    }

    // Reads the tallies of every app in the round.
    fn claim_unallocated() -> Weight {
        Weight::from_parts(120_000, 0)
            .saturating_add(T::DbWeight::get().reads(30))
            .saturating_add(T::DbWeight::get().writes(3))
    }

    fn set_team_allocation_percentage() -> Weight {
        Weight::from_parts(8_000, 0).saturating_add(T::DbWeight::get().writes(1))
    }
}

impl WeightInfo for () {
    fn claim() -> Weight {
        Weight::from_parts(80_000, 0)
    }

    fn claim_unallocated() -> Weight {
        Weight::from_parts(120_000, 0)
    }

    fn set_team_allocation_percentage() -> Weight {
        Weight::from_parts(8_000, 0)
    }
}
