use std::fmt;

use maple_token_platform::{Address, Balance, BalanceError, Object, ObjectId, Rejected, TxContext};
use tracing::debug;

use crate::witness::Witness;

/// A balance of currency `T` gated by `T`'s witness.
///
/// `creator` is fixed at construction. The wrapped balance is always a
/// whole, valid `Balance<T>`; it is only reachable through the
/// witness-taking methods below.
pub struct RegulatedCoin<T> {
    id: ObjectId,
    balance: Balance<T>,
    creator: Address,
}

impl<T: Witness> RegulatedCoin<T> {
    /// Amount held. Public.
    pub fn value(&self) -> u64 {
        self.balance.value()
    }

    /// Declared creator. Public.
    pub fn creator(&self) -> Address {
        self.creator
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    /// Read access to the wrapped balance.
    pub fn borrow(&self, _witness: T) -> &Balance<T> {
        &self.balance
    }

    /// Write access to the wrapped balance.
    pub fn borrow_mut(&mut self, _witness: T) -> &mut Balance<T> {
        &mut self.balance
    }

    /// A new coin with an empty balance.
    pub fn zero(witness: T, creator: Address, ctx: &TxContext<'_>) -> Self {
        Self::from_balance(witness, Balance::zero(), creator, ctx)
    }

    /// Wrap an existing balance.
    pub fn from_balance(
        _witness: T,
        balance: Balance<T>,
        creator: Address,
        ctx: &TxContext<'_>,
    ) -> Self {
        Self {
            id: ctx.fresh_id(),
            balance,
            creator,
        }
    }

    /// Destroy the wrapper and hand back its balance.
    pub fn into_balance(self, _witness: T) -> Balance<T> {
        debug!(
            currency = T::NAME,
            coin = %self.id,
            value = self.balance.value(),
            "Regulated coin unwrapped"
        );
        self.balance
    }

    /// Merge `other` into this coin and destroy `other`. Returns the new
    /// value.
    ///
    /// On overflow neither coin changes and `other` is handed back intact.
    pub fn join(&mut self, _witness: T, other: Self) -> Result<u64, Rejected<Self>> {
        let RegulatedCoin {
            id,
            balance,
            creator,
        } = other;
        let total = self.balance.join(balance).map_err(|rejected| Rejected {
            error: rejected.error,
            value: RegulatedCoin {
                id,
                balance: rejected.value,
                creator,
            },
        })?;
        debug!(
            currency = T::NAME,
            coin = %self.id,
            absorbed = %id,
            value = total,
            "Regulated coins joined"
        );
        Ok(total)
    }

    /// Move `value` out of this coin into a new coin declared as created by
    /// `creator`.
    ///
    /// A `value` of zero is accepted and yields an empty coin; callers that
    /// must forbid empty coins check for it themselves.
    pub fn split(
        &mut self,
        witness: T,
        creator: Address,
        value: u64,
        ctx: &TxContext<'_>,
    ) -> Result<Self, BalanceError> {
        let part = self.balance.split(value)?;
        let coin = Self::from_balance(witness, part, creator, ctx);
        debug!(
            currency = T::NAME,
            source = %self.id,
            coin = %coin.id,
            value,
            "Regulated coin split"
        );
        Ok(coin)
    }
}

impl<T: Witness> Object for RegulatedCoin<T> {
    fn id(&self) -> &ObjectId {
        &self.id
    }
}

impl<T: Witness> fmt::Debug for RegulatedCoin<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegulatedCoin")
            .field("currency", &T::NAME)
            .field("id", &self.id)
            .field("value", &self.balance.value())
            .field("creator", &self.creator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maple_token_platform::{Platform, TreasuryCap};
    use proptest::prelude::*;

    mod rgd {
        pub struct Rgd {
            _private: (),
        }

        impl crate::witness::Witness for Rgd {
            const NAME: &'static str = "RGD";
        }

        pub fn witness() -> Rgd {
            Rgd { _private: () }
        }
    }

    use rgd::{witness, Rgd};

    fn issuer() -> Address {
        Address::derive("issuer")
    }

    fn funded_coin(
        cap: &mut TreasuryCap<Rgd>,
        value: u64,
        ctx: &TxContext<'_>,
    ) -> RegulatedCoin<Rgd> {
        let balance = cap.mint_balance(value).unwrap();
        RegulatedCoin::from_balance(witness(), balance, issuer(), ctx)
    }

    #[test]
    fn public_queries_need_no_witness() {
        let (platform, _clock) = Platform::manual(0);
        let ctx = platform.begin(issuer());
        let mut cap = TreasuryCap::create_currency(witness(), &ctx).unwrap();

        let coin = funded_coin(&mut cap, 10, &ctx);
        assert_eq!(coin.value(), 10);
        assert_eq!(coin.creator(), issuer());
    }

    #[test]
    fn zero_coin() {
        let (platform, _clock) = Platform::manual(0);
        let ctx = platform.begin(issuer());
        let coin = RegulatedCoin::zero(witness(), Address::derive("bank"), &ctx);
        assert_eq!(coin.value(), 0);
        assert_eq!(coin.creator(), Address::derive("bank"));
    }

    #[test]
    fn borrow_mut_moves_value_with_witness() {
        let (platform, _clock) = Platform::manual(0);
        let ctx = platform.begin(issuer());
        let mut cap = TreasuryCap::create_currency(witness(), &ctx).unwrap();

        let mut coin = funded_coin(&mut cap, 100, &ctx);
        let taken = coin.borrow_mut(witness()).split(40).unwrap();
        assert_eq!(taken.value(), 40);
        assert_eq!(coin.borrow(witness()).value(), 60);
        assert_eq!(coin.value(), 60);
    }

    #[test]
    fn into_balance_returns_inner_balance() {
        let (platform, _clock) = Platform::manual(0);
        let ctx = platform.begin(issuer());
        let mut cap = TreasuryCap::create_currency(witness(), &ctx).unwrap();

        let coin = funded_coin(&mut cap, 77, &ctx);
        let balance = coin.into_balance(witness());
        assert_eq!(balance.value(), 77);
    }

    #[test]
    fn join_absorbs_other() {
        let (platform, _clock) = Platform::manual(0);
        let ctx = platform.begin(issuer());
        let mut cap = TreasuryCap::create_currency(witness(), &ctx).unwrap();

        let mut a = funded_coin(&mut cap, 30, &ctx);
        let b = funded_coin(&mut cap, 12, &ctx);
        assert_eq!(a.join(witness(), b).unwrap(), 42);
        assert_eq!(a.value(), 42);
        assert_eq!(a.creator(), issuer());
    }

    #[test]
    fn join_overflow_hands_back_other_coin() {
        // One currency registration per platform: the second supply lives
        // on a separate host so the two balances can sum past u64::MAX.
        let (platform, _clock) = Platform::manual(0);
        let (other, _clock) = Platform::manual(0);
        let ctx = platform.begin(issuer());
        let other_ctx = other.begin(issuer());
        let mut first = TreasuryCap::create_currency(witness(), &ctx).unwrap();
        let mut second = TreasuryCap::create_currency(witness(), &other_ctx).unwrap();

        let mut a = funded_coin(&mut first, u64::MAX, &ctx);
        let b = funded_coin(&mut second, 5, &other_ctx);
        let b_id = *b.id();

        let rejected = a.join(witness(), b).unwrap_err();
        assert!(matches!(rejected.error, BalanceError::Overflow { .. }));
        let b = rejected.into_value();
        assert_eq!(*b.id(), b_id);
        assert_eq!(b.value(), 5);
        assert_eq!(a.value(), u64::MAX);
    }

    #[test]
    fn split_assigns_new_creator_and_id() {
        let (platform, _clock) = Platform::manual(0);
        let ctx = platform.begin(issuer());
        let mut cap = TreasuryCap::create_currency(witness(), &ctx).unwrap();

        let mut c1 = funded_coin(&mut cap, 10, &ctx);
        let holder = Address::derive("holder");
        let c2 = c1.split(witness(), holder, 4, &ctx).unwrap();
        assert_eq!(c1.value(), 6);
        assert_eq!(c2.value(), 4);
        assert_eq!(c2.creator(), holder);
        assert_ne!(c1.id(), c2.id());
    }

    #[test]
    fn split_zero_yields_empty_coin() {
        let (platform, _clock) = Platform::manual(0);
        let ctx = platform.begin(issuer());
        let mut cap = TreasuryCap::create_currency(witness(), &ctx).unwrap();

        let mut c1 = funded_coin(&mut cap, 10, &ctx);
        let c2 = c1
            .split(witness(), Address::derive("creator2"), 0, &ctx)
            .unwrap();
        assert_eq!(c2.value(), 0);
        assert_eq!(c1.value(), 10);
    }

    #[test]
    fn split_beyond_value_fails_without_change() {
        let (platform, _clock) = Platform::manual(0);
        let ctx = platform.begin(issuer());
        let mut cap = TreasuryCap::create_currency(witness(), &ctx).unwrap();

        let mut c1 = funded_coin(&mut cap, 10, &ctx);
        let err = c1.split(witness(), issuer(), 11, &ctx).unwrap_err();
        assert!(matches!(err, BalanceError::InsufficientBalance { .. }));
        assert_eq!(c1.value(), 10);
    }

    proptest! {
        #[test]
        fn from_balance_into_balance_round_trip(value in any::<u64>()) {
            let (platform, _clock) = Platform::manual(0);
            let ctx = platform.begin(issuer());
            let mut cap = TreasuryCap::create_currency(witness(), &ctx).unwrap();

            let original = cap.mint_balance(value).unwrap();
            let expected = original.value();
            let coin = RegulatedCoin::from_balance(witness(), original, issuer(), &ctx);
            let back = coin.into_balance(witness());
            prop_assert_eq!(back.value(), expected);
        }

        #[test]
        fn split_conserves_value(total in any::<u64>(), part in any::<u64>()) {
            let (platform, _clock) = Platform::manual(0);
            let ctx = platform.begin(issuer());
            let mut cap = TreasuryCap::create_currency(witness(), &ctx).unwrap();

            let mut coin = funded_coin(&mut cap, total, &ctx);
            match coin.split(witness(), issuer(), part, &ctx) {
                Ok(piece) => {
                    prop_assert!(part <= total);
                    prop_assert_eq!(piece.value() + coin.value(), total);
                }
                Err(_) => {
                    prop_assert!(part > total);
                    prop_assert_eq!(coin.value(), total);
                }
            }
        }
    }
}
