use std::fmt;
use std::marker::PhantomData;

use crate::error::{BalanceError, Rejected};

/// A non-negative amount of currency `T`.
///
/// Balances are linear: there is no `Clone`, and the only way to create a
/// non-zero balance is to mint it from a [`TreasuryCap`](crate::TreasuryCap)
/// or split it off an existing balance.
pub struct Balance<T> {
    value: u64,
    _currency: PhantomData<fn() -> T>,
}

impl<T> Balance<T> {
    /// An empty balance.
    pub fn zero() -> Self {
        Self::with_value(0)
    }

    pub(crate) fn with_value(value: u64) -> Self {
        Self {
            value,
            _currency: PhantomData,
        }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Merge `other` into this balance, returning the new value.
    ///
    /// On overflow neither balance changes and `other` is handed back.
    pub fn join(&mut self, other: Balance<T>) -> Result<u64, Rejected<Balance<T>>> {
        match self.value.checked_add(other.value) {
            Some(total) => {
                self.value = total;
                Ok(total)
            }
            None => Err(Rejected::new(
                BalanceError::Overflow {
                    current: self.value,
                    added: other.value,
                },
                other,
            )),
        }
    }

    /// Take `amount` out of this balance.
    pub fn split(&mut self, amount: u64) -> Result<Balance<T>, BalanceError> {
        if amount > self.value {
            return Err(BalanceError::InsufficientBalance {
                requested: amount,
                available: self.value,
            });
        }
        self.value -= amount;
        Ok(Self::with_value(amount))
    }

    /// Take the whole value out, leaving this balance at zero.
    pub fn withdraw_all(&mut self) -> Balance<T> {
        let value = std::mem::take(&mut self.value);
        Self::with_value(value)
    }

    /// Destroy an empty balance.
    pub fn destroy_zero(self) -> Result<(), Rejected<Balance<T>>> {
        if self.value != 0 {
            return Err(Rejected::new(BalanceError::NonZeroBalance(self.value), self));
        }
        Ok(())
    }

    /// Consume the balance, returning its raw value.
    ///
    /// Only the supply primitive may do this; anywhere else it would
    /// silently destroy currency.
    pub(crate) fn into_raw(self) -> u64 {
        self.value
    }
}

impl<T> Default for Balance<T> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T> PartialEq for Balance<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Balance<T> {}

impl<T> fmt::Debug for Balance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Balance")
            .field("currency", &std::any::type_name::<T>())
            .field("value", &self.value)
            .finish()
    }
}
