use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

/// The host's logical epoch counter.
///
/// Read-only from the token's point of view and monotonically
/// non-decreasing: two successive reads never go backwards.
pub trait EpochClock: Send + Sync {
    fn current_epoch(&self) -> u64;
}

/// A clock that only moves when told to. Used for tests and demos.
#[derive(Debug, Default)]
pub struct ManualEpochClock {
    epoch: AtomicU64,
}

impl ManualEpochClock {
    pub fn new(genesis_epoch: u64) -> Self {
        Self {
            epoch: AtomicU64::new(genesis_epoch),
        }
    }

    /// Move to the next epoch, returning it.
    pub fn advance(&self) -> u64 {
        self.advance_by(1)
    }

    /// Move forward `epochs` epochs (saturating), returning the new epoch.
    pub fn advance_by(&self, epochs: u64) -> u64 {
        let previous = self
            .epoch
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |e| {
                Some(e.saturating_add(epochs))
            })
            .unwrap_or_else(|e| e);
        previous.saturating_add(epochs)
    }

    /// Jump to `epoch`. Requests to move backwards are ignored.
    pub fn set(&self, epoch: u64) -> u64 {
        self.epoch.fetch_max(epoch, Ordering::SeqCst).max(epoch)
    }
}

impl EpochClock for ManualEpochClock {
    fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }
}

/// Epochs derived from wall-clock time: `(now - genesis) / epoch_length`.
///
/// A backwards wall-clock step never produces a smaller epoch than one
/// already observed.
#[derive(Debug)]
pub struct WallClockEpoch {
    genesis: DateTime<Utc>,
    epoch_length_secs: u64,
    high_water: AtomicU64,
}

impl WallClockEpoch {
    /// `epoch_length_secs` of zero is treated as one second.
    pub fn new(genesis: DateTime<Utc>, epoch_length_secs: u64) -> Self {
        Self {
            genesis,
            epoch_length_secs: epoch_length_secs.max(1),
            high_water: AtomicU64::new(0),
        }
    }

    pub fn epoch_at(&self, at: DateTime<Utc>) -> u64 {
        let elapsed = (at - self.genesis).num_seconds();
        if elapsed <= 0 {
            return 0;
        }
        elapsed as u64 / self.epoch_length_secs
    }
}

impl EpochClock for WallClockEpoch {
    fn current_epoch(&self) -> u64 {
        let observed = self.epoch_at(Utc::now());
        self.high_water.fetch_max(observed, Ordering::SeqCst).max(observed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualEpochClock::new(5);
        assert_eq!(clock.current_epoch(), 5);
        assert_eq!(clock.advance(), 6);
        assert_eq!(clock.advance_by(10), 16);
        assert_eq!(clock.current_epoch(), 16);
    }

    #[test]
    fn manual_clock_never_goes_backwards() {
        let clock = ManualEpochClock::new(10);
        assert_eq!(clock.set(3), 10);
        assert_eq!(clock.current_epoch(), 10);
        assert_eq!(clock.set(12), 12);
    }

    #[test]
    fn manual_clock_saturates() {
        let clock = ManualEpochClock::new(u64::MAX - 1);
        assert_eq!(clock.advance_by(5), u64::MAX);
    }

    #[test]
    fn wall_clock_epochs() {
        let genesis = Utc::now() - Duration::seconds(3_600);
        let clock = WallClockEpoch::new(genesis, 60);
        assert_eq!(clock.epoch_at(genesis), 0);
        assert_eq!(clock.epoch_at(genesis + Duration::seconds(59)), 0);
        assert_eq!(clock.epoch_at(genesis + Duration::seconds(120)), 2);
        assert_eq!(clock.epoch_at(genesis - Duration::seconds(120)), 0);
        assert!(clock.current_epoch() >= 60);
    }
}
