use serde::Serialize;
use thiserror::Error;

/// Per-epoch mint quota.
///
/// State is only touched when a mint is attempted. A limiter last used in
/// an older epoch behaves exactly as if it had been reset at the start of
/// every epoch since: the first mint in a new epoch starts from zero.
///
/// `last_epoch` never decreases. A request carrying an epoch older than
/// `last_epoch` is counted against the current window instead of opening a
/// new one.
///
/// `minted_in_epoch <= max_mint_per_epoch` holds whenever `last_epoch` is
/// the current epoch. Stale counters are meaningless until the next use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimiter {
    max_mint_per_epoch: u64,
    last_epoch: u64,
    minted_in_epoch: u64,
}

/// Why a reservation was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("quota exceeded: {minted} minted + {requested} requested > {max}")]
pub struct QuotaError {
    pub requested: u64,
    pub minted: u64,
    pub max: u64,
}

/// A checked, not yet applied, quota update.
///
/// Produced by [`RateLimiter::reserve`]; applying it is the only way quota
/// state changes.
#[must_use = "a reservation does nothing until committed"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    epoch: u64,
    minted_in_epoch: u64,
    resets: bool,
}

impl Reservation {
    /// Whether applying this reservation starts a new epoch window.
    pub fn resets(&self) -> bool {
        self.resets
    }
}

impl RateLimiter {
    pub fn new(max_mint_per_epoch: u64, epoch: u64) -> Self {
        Self {
            max_mint_per_epoch,
            last_epoch: epoch,
            minted_in_epoch: 0,
        }
    }

    pub fn max_mint_per_epoch(&self) -> u64 {
        self.max_mint_per_epoch
    }

    pub fn last_epoch(&self) -> u64 {
        self.last_epoch
    }

    pub fn minted_in_epoch(&self) -> u64 {
        self.minted_in_epoch
    }

    /// Amount counted against the quota if a mint happened at `epoch`.
    ///
    /// Only a later epoch starts from zero; an earlier one sees the current
    /// window.
    pub fn minted_at(&self, epoch: u64) -> u64 {
        if epoch > self.last_epoch {
            0
        } else {
            self.minted_in_epoch
        }
    }

    /// Allowance left at `epoch`.
    pub fn remaining(&self, epoch: u64) -> u64 {
        self.max_mint_per_epoch
            .saturating_sub(self.minted_at(epoch))
    }

    /// Check whether `amount` fits in the quota at `epoch`.
    ///
    /// Pure: the limiter is not modified. An accumulation that would not fit
    /// in a `u64` exceeds every possible quota and is refused as such.
    pub fn reserve(&self, epoch: u64, amount: u64) -> Result<Reservation, QuotaError> {
        let minted = self.minted_at(epoch);
        let refused = QuotaError {
            requested: amount,
            minted,
            max: self.max_mint_per_epoch,
        };
        let next = minted.checked_add(amount).ok_or_else(|| refused.clone())?;
        if next > self.max_mint_per_epoch {
            return Err(refused);
        }
        Ok(Reservation {
            epoch: epoch.max(self.last_epoch),
            minted_in_epoch: next,
            resets: epoch > self.last_epoch,
        })
    }

    pub(crate) fn commit(&mut self, reservation: Reservation) {
        self.last_epoch = self.last_epoch.max(reservation.epoch);
        self.minted_in_epoch = reservation.minted_in_epoch;
    }
}
