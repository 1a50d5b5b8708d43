use crate::traits::PayoutSink;
use codec::{Decode, Encode};
use core::marker::PhantomData;
use frame_support::{
	traits::{Currency, ExistenceRequirement, Get},
	PalletId,
};
use sp_runtime::{
	traits::{AccountIdConversion, Zero},
	DispatchResult, SaturatedConversion,
};

/// Pays claims out of the account derived from pallet id `P`, in currency `C`.
pub struct PalletPot<C, P>(PhantomData<(C, P)>);

impl<C, P> PalletPot<C, P> {
	pub fn account_id<AccountId>() -> AccountId
	where
		AccountId: Encode + Decode,
		P: Get<PalletId>,
	{
		P::get().into_account_truncating()
	}
}

impl<AccountId, C, P> PayoutSink<AccountId> for PalletPot<C, P>
where
	AccountId: Encode + Decode,
	C: Currency<AccountId>,
	P: Get<PalletId>,
{
	fn available() -> u128 {
		C::free_balance(&Self::account_id()).saturated_into()
	}

	fn credit(who: &AccountId, amount: u128) -> DispatchResult {
		let amount: C::Balance = amount.saturated_into();
		if amount.is_zero() {
			return Ok(());
		}
		C::transfer(&Self::account_id(), who, amount, ExistenceRequirement::AllowDeath)
	}
}
