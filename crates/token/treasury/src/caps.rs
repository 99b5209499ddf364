//! Capability objects issued by a treasury lock.
//!
//! Neither cap implements `Clone`, `Copy`, `Default` or `Deserialize`, and
//! both constructors are crate-private: the only way to obtain one is from
//! the issuing operation, and the only way to pass one on is to move it.

use std::fmt;
use std::marker::PhantomData;

use maple_token_platform::{Address, Object, ObjectId, TxContext};
use tracing::info;

use crate::error::TreasuryError;
use crate::rate_limit::{RateLimiter, Reservation};

/// Administrative authority over treasury locks of currency `T`.
///
/// Any `LockAdminCap<T>` administers any `TreasuryLock<T>`: the pairing is
/// by currency type, not by lock id.
pub struct LockAdminCap<T> {
    id: ObjectId,
    _currency: PhantomData<fn() -> T>,
}

impl<T: 'static> LockAdminCap<T> {
    pub(crate) fn new(ctx: &TxContext<'_>) -> Self {
        Self {
            id: ctx.fresh_id(),
            _currency: PhantomData,
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    /// Issue a mint cap allowing up to `max_mint_per_epoch` units per epoch.
    ///
    /// The quota window starts at the transaction's epoch with nothing
    /// minted. There is no bound on the quota or on how many caps an admin
    /// issues.
    pub fn create_mint_cap(&self, max_mint_per_epoch: u64, ctx: &TxContext<'_>) -> MintCap<T> {
        let cap = MintCap {
            id: ctx.fresh_id(),
            limiter: RateLimiter::new(max_mint_per_epoch, ctx.epoch()),
            _currency: PhantomData,
        };
        info!(
            currency = std::any::type_name::<T>(),
            admin_cap = %self.id,
            mint_cap = %cap.id,
            max_mint_per_epoch,
            epoch = ctx.epoch(),
            "Mint capability issued"
        );
        cap
    }

    /// Issue a mint cap and transfer it to `recipient`. Returns the cap id.
    pub fn create_and_transfer_mint_cap(
        &self,
        max_mint_per_epoch: u64,
        recipient: Address,
        ctx: &TxContext<'_>,
    ) -> Result<ObjectId, TreasuryError> {
        let cap = self.create_mint_cap(max_mint_per_epoch, ctx);
        let id = cap.id;
        ctx.transfer(cap, recipient)?;
        Ok(id)
    }
}

impl<T: 'static> Object for LockAdminCap<T> {
    fn id(&self) -> &ObjectId {
        &self.id
    }
}

impl<T> fmt::Debug for LockAdminCap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockAdminCap")
            .field("id", &self.id)
            .field("currency", &std::any::type_name::<T>())
            .finish()
    }
}

/// Delegated, quota-limited minting authority for currency `T`.
///
/// Revocable by id through the lock's ban list. Only minting mutates it.
pub struct MintCap<T> {
    id: ObjectId,
    limiter: RateLimiter,
    _currency: PhantomData<fn() -> T>,
}

impl<T: 'static> MintCap<T> {
    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn max_mint_per_epoch(&self) -> u64 {
        self.limiter.max_mint_per_epoch()
    }

    pub fn last_epoch(&self) -> u64 {
        self.limiter.last_epoch()
    }

    pub fn minted_in_epoch(&self) -> u64 {
        self.limiter.minted_in_epoch()
    }

    /// Allowance left if a mint were attempted at `epoch`.
    pub fn remaining(&self, epoch: u64) -> u64 {
        self.limiter.remaining(epoch)
    }

    /// Read-only view of the quota state.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub(crate) fn reserve(&self, epoch: u64, amount: u64) -> Result<Reservation, TreasuryError> {
        self.limiter
            .reserve(epoch, amount)
            .map_err(|refused| TreasuryError::QuotaExceeded {
                cap_id: self.id,
                requested: refused.requested,
                minted: refused.minted,
                max: refused.max,
            })
    }

    pub(crate) fn commit(&mut self, reservation: Reservation) {
        self.limiter.commit(reservation);
    }
}

impl<T: 'static> Object for MintCap<T> {
    fn id(&self) -> &ObjectId {
        &self.id
    }
}

impl<T> fmt::Debug for MintCap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MintCap")
            .field("id", &self.id)
            .field("currency", &std::any::type_name::<T>())
            .field("limiter", &self.limiter)
            .finish()
    }
}
