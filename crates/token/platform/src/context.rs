use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::alloc::{IdAllocator, RandomIdAllocator, SequentialIdAllocator};
use crate::config::{EpochClockConfig, IdAllocation, PlatformConfig};
use crate::epoch::{EpochClock, ManualEpochClock, WallClockEpoch};
use crate::error::{PlatformError, Rejected};
use crate::ids::{Address, ObjectId};
use crate::object::{Object, ObjectStore, Shared};

/// The host environment: epoch clock, identity allocator and object table.
pub struct Platform {
    clock: Arc<dyn EpochClock>,
    ids: Arc<dyn IdAllocator>,
    store: ObjectStore,
}

impl Platform {
    pub fn new(clock: Arc<dyn EpochClock>, ids: Arc<dyn IdAllocator>) -> Self {
        Self {
            clock,
            ids,
            store: ObjectStore::new(),
        }
    }

    /// A platform driven by a manual clock, with sequential ids.
    ///
    /// The returned clock handle is the only way to advance epochs.
    pub fn manual(genesis_epoch: u64) -> (Self, Arc<ManualEpochClock>) {
        let clock = Arc::new(ManualEpochClock::new(genesis_epoch));
        let platform = Self::new(clock.clone(), Arc::new(SequentialIdAllocator::default()));
        (platform, clock)
    }

    /// Build a platform from configuration.
    pub fn from_config(config: &PlatformConfig) -> Result<Self, PlatformError> {
        config.validate()?;

        let clock: Arc<dyn EpochClock> = match &config.epoch_clock {
            EpochClockConfig::Manual { genesis_epoch } => {
                Arc::new(ManualEpochClock::new(*genesis_epoch))
            }
            EpochClockConfig::WallClock {
                genesis,
                epoch_length_secs,
            } => Arc::new(WallClockEpoch::new(*genesis, *epoch_length_secs)),
        };
        let ids: Arc<dyn IdAllocator> = match config.id_allocation {
            IdAllocation::Random => Arc::new(RandomIdAllocator),
            IdAllocation::Sequential { start } => Arc::new(SequentialIdAllocator::new(start)),
        };

        info!(
            epoch_clock = ?config.epoch_clock,
            id_allocation = ?config.id_allocation,
            "Platform initialized"
        );
        Ok(Self::new(clock, ids))
    }

    pub fn current_epoch(&self) -> u64 {
        self.clock.current_epoch()
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Start a transaction on behalf of `sender`.
    ///
    /// The epoch is read once here; every operation in the transaction sees
    /// the same value.
    pub fn begin(&self, sender: Address) -> TxContext<'_> {
        TxContext {
            platform: self,
            sender,
            epoch: self.clock.current_epoch(),
        }
    }
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("epoch", &self.clock.current_epoch())
            .finish_non_exhaustive()
    }
}

/// One transaction's view of the platform.
pub struct TxContext<'p> {
    platform: &'p Platform,
    sender: Address,
    epoch: u64,
}

impl<'p> TxContext<'p> {
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// The epoch snapshot taken when the transaction began.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn fresh_id(&self) -> ObjectId {
        self.platform.ids.next_id()
    }

    pub fn store(&self) -> &'p ObjectStore {
        &self.platform.store
    }

    pub fn transfer<O: Object>(&self, object: O, recipient: Address) -> Result<(), PlatformError> {
        self.platform.store.transfer(object, recipient)
    }

    /// Transfer, handing `object` back if the store refuses it.
    pub fn try_transfer<O: Object>(
        &self,
        object: O,
        recipient: Address,
    ) -> Result<(), Rejected<O, PlatformError>> {
        self.platform.store.try_transfer(object, recipient)
    }

    /// Withdraw an object owned by the sender.
    pub fn take<O: Object>(&self, id: &ObjectId) -> Result<O, PlatformError> {
        self.platform.store.take(&self.sender, id)
    }

    pub fn share<O: Object>(&self, object: O) -> Result<Shared<O>, PlatformError> {
        self.platform.store.share(object)
    }
}

impl fmt::Debug for TxContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxContext")
            .field("sender", &self.sender)
            .field("epoch", &self.epoch)
            .finish()
    }
}
