use maple_token_platform::{Address, Balance, ObjectId, Shared, TxContext};

use crate::caps::{LockAdminCap, MintCap};
use crate::error::TreasuryError;
use crate::lock::TreasuryLock;

/// Operations on a published treasury lock through its shared handle.
///
/// Each call is one critical section on the lock, so concurrent callers
/// see every other call either fully applied or not at all.
pub trait TreasuryLockHandle<T> {
    fn mint_balance(
        &self,
        mint_cap: &mut MintCap<T>,
        amount: u64,
        ctx: &TxContext<'_>,
    ) -> Result<Balance<T>, TreasuryError>;

    fn mint_and_transfer(
        &self,
        mint_cap: &mut MintCap<T>,
        amount: u64,
        recipient: Address,
        ctx: &TxContext<'_>,
    ) -> Result<ObjectId, TreasuryError>;

    fn ban_mint_cap_id(&self, admin_cap: &LockAdminCap<T>, id: ObjectId)
        -> Result<(), TreasuryError>;

    fn unban_mint_cap_id(
        &self,
        admin_cap: &LockAdminCap<T>,
        id: ObjectId,
    ) -> Result<(), TreasuryError>;

    fn is_banned(&self, id: &ObjectId) -> Result<bool, TreasuryError>;

    fn total_supply(&self) -> Result<u64, TreasuryError>;
}

impl<T: 'static> TreasuryLockHandle<T> for Shared<TreasuryLock<T>> {
    fn mint_balance(
        &self,
        mint_cap: &mut MintCap<T>,
        amount: u64,
        ctx: &TxContext<'_>,
    ) -> Result<Balance<T>, TreasuryError> {
        self.try_with_mut(|lock| lock.mint_balance(mint_cap, amount, ctx))
    }

    fn mint_and_transfer(
        &self,
        mint_cap: &mut MintCap<T>,
        amount: u64,
        recipient: Address,
        ctx: &TxContext<'_>,
    ) -> Result<ObjectId, TreasuryError> {
        self.try_with_mut(|lock| lock.mint_and_transfer(mint_cap, amount, recipient, ctx))
    }

    fn ban_mint_cap_id(
        &self,
        admin_cap: &LockAdminCap<T>,
        id: ObjectId,
    ) -> Result<(), TreasuryError> {
        Ok(self.with_mut(|lock| lock.ban_mint_cap_id(admin_cap, id))?)
    }

    fn unban_mint_cap_id(
        &self,
        admin_cap: &LockAdminCap<T>,
        id: ObjectId,
    ) -> Result<(), TreasuryError> {
        Ok(self.with_mut(|lock| lock.unban_mint_cap_id(admin_cap, id))?)
    }

    fn is_banned(&self, id: &ObjectId) -> Result<bool, TreasuryError> {
        Ok(self.with(|lock| lock.is_banned(id))?)
    }

    fn total_supply(&self) -> Result<u64, TreasuryError> {
        Ok(self.with(|lock| lock.total_supply())?)
    }
}
