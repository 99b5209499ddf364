use std::collections::BTreeSet;
use std::fmt;

use maple_token_platform::{
    Address, Balance, Coin, Object, ObjectId, Shared, TreasuryCap, TxContext,
};
use tracing::{debug, info, warn};

use crate::caps::{LockAdminCap, MintCap};
use crate::error::TreasuryError;
use crate::rate_limit::Reservation;

/// Custodian of a currency's unlimited supply capability.
///
/// Published as a shared object: many parties hold handles to the same
/// lock and mint against it. Mint authority is delegated through
/// [`MintCap`]s; administration requires a [`LockAdminCap`].
pub struct TreasuryLock<T> {
    id: ObjectId,
    treasury_cap: TreasuryCap<T>,
    banned: BTreeSet<ObjectId>,
}

impl<T: 'static> TreasuryLock<T> {
    /// Lock `treasury_cap` away in a freshly published shared lock.
    ///
    /// Returns the handle to the published lock and the single admin cap
    /// minted for it. The ban list starts empty.
    pub fn new_lock(
        treasury_cap: TreasuryCap<T>,
        ctx: &TxContext<'_>,
    ) -> Result<(Shared<Self>, LockAdminCap<T>), TreasuryError> {
        let lock = Self {
            id: ctx.fresh_id(),
            treasury_cap,
            banned: BTreeSet::new(),
        };
        let admin_cap = LockAdminCap::new(ctx);
        let lock_id = lock.id;
        let handle = ctx.share(lock)?;

        info!(
            currency = std::any::type_name::<T>(),
            lock = %lock_id,
            admin_cap = %admin_cap.id(),
            creator = %ctx.sender().short_id(),
            "Treasury lock created"
        );
        Ok((handle, admin_cap))
    }

    /// [`new_lock`](Self::new_lock), then give the admin cap to the sender.
    pub fn create(
        treasury_cap: TreasuryCap<T>,
        ctx: &TxContext<'_>,
    ) -> Result<Shared<Self>, TreasuryError> {
        let (handle, admin_cap) = Self::new_lock(treasury_cap, ctx)?;
        ctx.transfer(admin_cap, ctx.sender())?;
        Ok(handle)
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn total_supply(&self) -> u64 {
        self.treasury_cap.total_supply()
    }

    /// Ban a mint cap by id. Idempotent; the id need not exist yet.
    pub fn ban_mint_cap_id(&mut self, admin_cap: &LockAdminCap<T>, id: ObjectId) {
        let newly = self.banned.insert(id);
        info!(
            lock = %self.id,
            admin_cap = %admin_cap.id(),
            mint_cap = %id,
            newly,
            "Mint capability banned"
        );
    }

    /// Lift a ban. Unbanning an id that is not banned does nothing.
    pub fn unban_mint_cap_id(&mut self, admin_cap: &LockAdminCap<T>, id: ObjectId) {
        let was_banned = self.banned.remove(&id);
        info!(
            lock = %self.id,
            admin_cap = %admin_cap.id(),
            mint_cap = %id,
            was_banned,
            "Mint capability unbanned"
        );
    }

    pub fn is_banned(&self, id: &ObjectId) -> bool {
        self.banned.contains(id)
    }

    /// Banned ids in id order.
    pub fn banned_ids(&self) -> impl Iterator<Item = &ObjectId> + '_ {
        self.banned.iter()
    }

    /// Direct, unaccounted access to the supply capability.
    ///
    /// Admin authority is absolute: nothing minted through this reference
    /// counts against any quota.
    pub fn treasury_cap_mut(&mut self, admin_cap: &LockAdminCap<T>) -> &mut TreasuryCap<T> {
        info!(
            lock = %self.id,
            admin_cap = %admin_cap.id(),
            "Treasury capability accessed directly"
        );
        &mut self.treasury_cap
    }

    /// Mint `amount` units under `mint_cap`'s quota.
    ///
    /// 1. A banned cap is refused first, whatever the amount.
    /// 2. If the transaction epoch is later than the cap's last epoch the
    ///    quota window restarts from zero. An older epoch counts against the
    ///    current window.
    /// 3. The amount is all-or-nothing against the remaining allowance.
    /// 4. Supply is minted, then the cap's accounting is updated.
    pub fn mint_balance(
        &mut self,
        mint_cap: &mut MintCap<T>,
        amount: u64,
        ctx: &TxContext<'_>,
    ) -> Result<Balance<T>, TreasuryError> {
        let reservation = self.authorize(mint_cap, amount, ctx)?;
        let balance = self.treasury_cap.mint_balance(amount)?;
        self.settle(mint_cap, reservation, amount, ctx);
        Ok(balance)
    }

    /// Mint under quota, wrap the result in a coin and send it to
    /// `recipient`. Returns the new coin's id.
    ///
    /// If the platform refuses the transfer the minted supply is burned
    /// again and the cap's quota is left as it was.
    pub fn mint_and_transfer(
        &mut self,
        mint_cap: &mut MintCap<T>,
        amount: u64,
        recipient: Address,
        ctx: &TxContext<'_>,
    ) -> Result<ObjectId, TreasuryError> {
        let reservation = self.authorize(mint_cap, amount, ctx)?;
        let balance = self.treasury_cap.mint_balance(amount)?;
        let coin = Coin::from_balance(balance, ctx);
        let coin_id = *coin.id();

        if let Err(refused) = ctx.try_transfer(coin, recipient) {
            warn!(
                lock = %self.id,
                mint_cap = %mint_cap.id(),
                coin = %coin_id,
                amount,
                error = %refused.error,
                "Mint rolled back: transfer refused"
            );
            let coin = refused.value;
            self.treasury_cap
                .burn(coin)
                .map_err(|rejected| TreasuryError::Supply(rejected.error))?;
            return Err(refused.error.into());
        }

        self.settle(mint_cap, reservation, amount, ctx);
        Ok(coin_id)
    }

    /// Ban and quota checks. Nothing is written.
    fn authorize(
        &self,
        mint_cap: &MintCap<T>,
        amount: u64,
        ctx: &TxContext<'_>,
    ) -> Result<Reservation, TreasuryError> {
        let cap_id = *mint_cap.id();
        if self.banned.contains(&cap_id) {
            warn!(
                lock = %self.id,
                mint_cap = %cap_id,
                amount,
                "Mint refused: capability banned"
            );
            return Err(TreasuryError::CapabilityBanned { cap_id });
        }

        let epoch = ctx.epoch();
        mint_cap.reserve(epoch, amount).inspect_err(|_| {
            warn!(
                lock = %self.id,
                mint_cap = %cap_id,
                amount,
                epoch,
                remaining = mint_cap.remaining(epoch),
                "Mint refused: quota exceeded"
            );
        })
    }

    /// Apply a reservation once the minted supply is safely delivered.
    fn settle(
        &self,
        mint_cap: &mut MintCap<T>,
        reservation: Reservation,
        amount: u64,
        ctx: &TxContext<'_>,
    ) {
        let epoch = ctx.epoch();
        if reservation.resets() {
            debug!(
                mint_cap = %mint_cap.id(),
                from_epoch = mint_cap.last_epoch(),
                to_epoch = epoch,
                "Mint quota window reset"
            );
        }
        mint_cap.commit(reservation);

        debug!(
            lock = %self.id,
            mint_cap = %mint_cap.id(),
            amount,
            epoch,
            minted_in_epoch = mint_cap.minted_in_epoch(),
            "Minted under quota"
        );
    }
}

impl<T: 'static> Object for TreasuryLock<T> {
    fn id(&self) -> &ObjectId {
        &self.id
    }
}

impl<T> fmt::Debug for TreasuryLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreasuryLock")
            .field("id", &self.id)
            .field("treasury_cap", &self.treasury_cap)
            .field("banned", &self.banned)
            .finish()
    }
}
