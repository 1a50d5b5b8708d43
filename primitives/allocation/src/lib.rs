//! # Allocation Primitives
//!
//! Types shared by the allocation ledger pallets:
//!
//! * [`checkpoints`]: append-only, block-indexed value history with binary-search lookups.
//! * [`traits`]: the narrow read/write interfaces the pallets use to reach each other and
//!   the rest of the runtime (eligibility registry, voting power, levels, funding, payouts).
//! * [`payout`]: a currency-backed [`traits::PayoutSink`] paying out of a pallet pot account.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod checkpoints;
pub mod payout;
pub mod traits;

pub use checkpoints::{Checkpoint, CheckpointError, Trace};
pub use payout::PalletPot;
pub use traits::*;

use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_runtime::{traits::IntegerSquareRoot, RuntimeDebug};

/// Identifier of an allocation round.
pub type RoundId = u32;

/// Identifier of a reward emission cycle.
pub type CycleId = u32;

/// Stable identifier of a recipient app.
pub type AppId = sp_core::H256;

/// Scale applied to square-rooted vote power before it is used as a reward weight.
/// Counteracts the truncation of the integer square root.
pub const QF_PRECISION_SCALE: u128 = 1_000_000_000;

/// Scale applied while dividing a cycle emission between voters.
pub const REWARD_PRECISION_SCALE: u128 = 1_000_000;

/// Denominator for whole-number percentages (base allocation, caps, multipliers).
pub const PERCENTAGE_DENOMINATOR: u128 = 100;

/// Denominator for app shares, expressed in basis points.
pub const SHARE_DENOMINATOR: u128 = 10_000;

/// Outcome of a round as seen by the allocation pool.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub enum RoundState {
	/// Voting is still open.
	Active,
	/// Voting closed without reaching quorum.
	Failed,
	/// Voting closed with quorum reached.
	Succeeded,
}

impl RoundState {
	pub fn has_ended(&self) -> bool {
		!matches!(self, RoundState::Active)
	}
}

/// Floor of the square root of `value`.
pub fn isqrt(value: u128) -> u128 {
	value.integer_sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn isqrt_floors() {
		assert_eq!(isqrt(0), 0);
		assert_eq!(isqrt(1), 1);
		assert_eq!(isqrt(99), 9);
		assert_eq!(isqrt(100), 10);
		assert_eq!(isqrt(400), 20);
		assert_eq!(isqrt(u128::MAX), u64::MAX as u128);
	}

	#[test]
	fn only_active_round_is_open() {
		assert!(!RoundState::Active.has_ended());
		assert!(RoundState::Failed.has_ended());
		assert!(RoundState::Succeeded.has_ended());
	}
}
