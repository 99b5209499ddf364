use std::sync::atomic::{AtomicU64, Ordering};

use crate::ids::ObjectId;

/// Source of fresh, never-repeating object identities.
pub trait IdAllocator: Send + Sync {
    fn next_id(&self) -> ObjectId;
}

/// Random v4 UUIDs. The production default.
#[derive(Debug, Default)]
pub struct RandomIdAllocator;

impl IdAllocator for RandomIdAllocator {
    fn next_id(&self) -> ObjectId {
        ObjectId(uuid::Uuid::new_v4())
    }
}

/// Monotonic counter ids, for deterministic tests and replays.
#[derive(Debug)]
pub struct SequentialIdAllocator {
    next: AtomicU64,
}

impl SequentialIdAllocator {
    pub fn new(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl Default for SequentialIdAllocator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl IdAllocator for SequentialIdAllocator {
    fn next_id(&self) -> ObjectId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        ObjectId::from_u128(n as u128)
    }
}
