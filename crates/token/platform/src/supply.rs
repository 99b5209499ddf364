use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use crate::balance::Balance;
use crate::coin::Coin;
use crate::context::TxContext;
use crate::error::{BalanceError, PlatformError, Rejected};
use crate::ids::ObjectId;
use crate::object::Object;

/// The unlimited mint/burn primitive for currency `T`.
///
/// Creating one consumes a value of `T`, so only the module able to build
/// `T` can ever obtain one, and a platform registers each currency once, so
/// there is exactly one cap per currency. Holding a `TreasuryCap<T>` means
/// unrestricted supply control; restricted delegation is layered on top.
pub struct TreasuryCap<T> {
    id: ObjectId,
    total_supply: u64,
    _currency: PhantomData<fn() -> T>,
}

impl<T: 'static> TreasuryCap<T> {
    /// Register currency `T`, consuming its witness.
    ///
    /// Fails with [`PlatformError::DuplicateCurrency`] if `T` is already
    /// registered on this platform.
    pub fn create_currency(_witness: T, ctx: &TxContext<'_>) -> Result<Self, PlatformError> {
        ctx.store().register_currency::<T>()?;
        let cap = Self {
            id: ctx.fresh_id(),
            total_supply: 0,
            _currency: PhantomData,
        };
        debug!(
            currency = std::any::type_name::<T>(),
            treasury_cap = %cap.id,
            "Currency created"
        );
        Ok(cap)
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Create `amount` new units. Fails only if total supply would overflow.
    pub fn mint_balance(&mut self, amount: u64) -> Result<Balance<T>, BalanceError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(BalanceError::SupplyOverflow {
                supply: self.total_supply,
                minted: amount,
            })?;
        self.total_supply = supply;
        Ok(Balance::with_value(amount))
    }

    /// Destroy a balance, reducing total supply. Returns the burned amount.
    pub fn burn_balance(&mut self, balance: Balance<T>) -> Result<u64, Rejected<Balance<T>>> {
        let burned = balance.value();
        match self.total_supply.checked_sub(burned) {
            Some(supply) => {
                self.total_supply = supply;
                Ok(balance.into_raw())
            }
            None => Err(Rejected::new(
                BalanceError::SupplyUnderflow {
                    supply: self.total_supply,
                    burned,
                },
                balance,
            )),
        }
    }

    /// Mint `amount` directly into a fresh coin.
    pub fn mint(&mut self, amount: u64, ctx: &TxContext<'_>) -> Result<Coin<T>, BalanceError> {
        let balance = self.mint_balance(amount)?;
        Ok(Coin::from_balance(balance, ctx))
    }

    /// Burn a coin. Returns the burned amount.
    pub fn burn(&mut self, coin: Coin<T>) -> Result<u64, Rejected<Balance<T>>> {
        self.burn_balance(coin.into_balance())
    }
}

impl<T: 'static> Object for TreasuryCap<T> {
    fn id(&self) -> &ObjectId {
        &self.id
    }
}

impl<T> fmt::Debug for TreasuryCap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreasuryCap")
            .field("id", &self.id)
            .field("currency", &std::any::type_name::<T>())
            .field("total_supply", &self.total_supply)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Platform;
    use crate::ids::Address;

    struct Gold;

    #[test]
    fn mint_tracks_supply() {
        let (platform, _clock) = Platform::manual(0);
        let ctx = platform.begin(Address::derive("issuer"));
        let mut cap = TreasuryCap::create_currency(Gold, &ctx).unwrap();

        let b = cap.mint_balance(250).unwrap();
        assert_eq!(b.value(), 250);
        assert_eq!(cap.total_supply(), 250);

        assert_eq!(cap.burn_balance(b).unwrap(), 250);
        assert_eq!(cap.total_supply(), 0);
    }

    #[test]
    fn supply_overflow_leaves_supply_unchanged() {
        let (platform, _clock) = Platform::manual(0);
        let ctx = platform.begin(Address::derive("issuer"));
        let mut cap = TreasuryCap::create_currency(Gold, &ctx).unwrap();

        let _held = cap.mint_balance(u64::MAX).unwrap();
        assert!(matches!(
            cap.mint_balance(1),
            Err(BalanceError::SupplyOverflow { .. })
        ));
        assert_eq!(cap.total_supply(), u64::MAX);
    }

    #[test]
    fn currency_is_created_once_per_platform() {
        let (platform, _clock) = Platform::manual(0);
        let ctx = platform.begin(Address::derive("issuer"));
        let _cap = TreasuryCap::create_currency(Gold, &ctx).unwrap();

        assert!(matches!(
            TreasuryCap::create_currency(Gold, &ctx),
            Err(PlatformError::DuplicateCurrency(_))
        ));
    }

    #[test]
    fn burning_foreign_supply_is_rejected() {
        let (home, _clock) = Platform::manual(0);
        let (away, _clock) = Platform::manual(0);
        let issuer = Address::derive("issuer");
        let mut first = TreasuryCap::create_currency(Gold, &home.begin(issuer)).unwrap();
        let mut second = TreasuryCap::create_currency(Gold, &away.begin(issuer)).unwrap();

        let b = first.mint_balance(10).unwrap();
        let rejected = second.burn_balance(b).unwrap_err();
        assert!(matches!(rejected.error, BalanceError::SupplyUnderflow { .. }));
        assert_eq!(rejected.into_value().value(), 10);
    }

    #[test]
    fn mint_coin() {
        let (platform, _clock) = Platform::manual(0);
        let ctx = platform.begin(Address::derive("issuer"));
        let mut cap = TreasuryCap::create_currency(Gold, &ctx).unwrap();

        let coin = cap.mint(40, &ctx).unwrap();
        assert_eq!(coin.value(), 40);
        assert_eq!(cap.burn(coin).unwrap(), 40);
    }
}
