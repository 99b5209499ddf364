use std::fmt;

use crate::balance::Balance;
use crate::context::TxContext;
use crate::error::{BalanceError, Rejected};
use crate::ids::ObjectId;
use crate::object::Object;

/// A transferable object holding a balance of currency `T`.
pub struct Coin<T> {
    id: ObjectId,
    balance: Balance<T>,
}

impl<T: 'static> Coin<T> {
    pub fn from_balance(balance: Balance<T>, ctx: &TxContext<'_>) -> Self {
        Self {
            id: ctx.fresh_id(),
            balance,
        }
    }

    pub fn zero(ctx: &TxContext<'_>) -> Self {
        Self::from_balance(Balance::zero(), ctx)
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn value(&self) -> u64 {
        self.balance.value()
    }

    pub fn balance(&self) -> &Balance<T> {
        &self.balance
    }

    pub fn balance_mut(&mut self) -> &mut Balance<T> {
        &mut self.balance
    }

    pub fn into_balance(self) -> Balance<T> {
        self.balance
    }

    /// Split `amount` into a new coin.
    pub fn split(&mut self, amount: u64, ctx: &TxContext<'_>) -> Result<Coin<T>, BalanceError> {
        let part = self.balance.split(amount)?;
        Ok(Self::from_balance(part, ctx))
    }

    /// Merge `other` into this coin. On overflow `other` is handed back.
    pub fn join(&mut self, other: Coin<T>) -> Result<u64, Rejected<Coin<T>>> {
        let Coin { id, balance } = other;
        self.balance.join(balance).map_err(|rejected| Rejected {
            error: rejected.error,
            value: Coin {
                id,
                balance: rejected.value,
            },
        })
    }
}

impl<T: 'static> Object for Coin<T> {
    fn id(&self) -> &ObjectId {
        &self.id
    }
}

impl<T> fmt::Debug for Coin<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coin")
            .field("id", &self.id)
            .field("value", &self.balance.value())
            .finish()
    }
}
