use std::fmt;

use thiserror::Error;

use crate::ids::{Address, ObjectId};

/// Errors from balance and supply arithmetic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    #[error("balance overflow: {current} + {added} exceeds u64::MAX")]
    Overflow { current: u64, added: u64 },

    #[error("total supply overflow: {supply} + {minted} exceeds u64::MAX")]
    SupplyOverflow { supply: u64, minted: u64 },

    #[error("total supply underflow: burning {burned} from supply {supply}")]
    SupplyUnderflow { supply: u64, burned: u64 },

    #[error("balance is not zero: {0}")]
    NonZeroBalance(u64),
}

/// Errors from the host platform (ownership, shared objects, configuration).
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("object store lock poisoned")]
    LockPoisoned,

    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("object {id} is not owned by {claimed}")]
    NotOwner { id: ObjectId, claimed: Address },

    #[error("object {id} is not a {expected}")]
    TypeMismatch { id: ObjectId, expected: &'static str },

    #[error("object {0} already exists")]
    DuplicateObject(ObjectId),

    #[error("currency {0} is already registered")]
    DuplicateCurrency(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failed operation that hands the consumed value back to the caller.
///
/// Operations that take a value by move (joins, burns, zero-destruction,
/// transfers) return it here on failure so nothing is lost.
pub struct Rejected<V, E = BalanceError> {
    pub error: E,
    pub value: V,
}

impl<V, E> Rejected<V, E> {
    pub fn new(error: E, value: V) -> Self {
        Self { error, value }
    }

    /// Recover the rejected value.
    pub fn into_value(self) -> V {
        self.value
    }
}

impl<V: fmt::Debug, E: fmt::Debug> fmt::Debug for Rejected<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .field("value", &self.value)
            .finish()
    }
}

impl<V, E: fmt::Display> fmt::Display for Rejected<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl<V, E> std::error::Error for Rejected<V, E>
where
    V: fmt::Debug,
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_balance_display() {
        let err = BalanceError::InsufficientBalance {
            requested: 50,
            available: 10,
        };
        let s = err.to_string();
        assert!(s.contains("50"));
        assert!(s.contains("10"));
    }

    #[test]
    fn rejected_displays_inner_error() {
        let rejected = Rejected::new(BalanceError::NonZeroBalance(7), "payload");
        assert_eq!(rejected.to_string(), "balance is not zero: 7");
        assert_eq!(rejected.into_value(), "payload");
    }
}
