//! # maple-token-platform
//!
//! Host primitives that regulated-token authorities are built on:
//!
//! - **Balance**: non-negative value container per currency (`Balance<T>`)
//! - **Supply**: the unlimited, unforgeable mint primitive (`TreasuryCap<T>`)
//! - **Coin**: the generic transferable coin object (`Coin<T>`)
//! - **Identity**: process-unique object ids and 32-byte addresses
//! - **Ownership**: single-owner transfer and shared-object publication
//! - **Epochs**: the read-only, monotonically non-decreasing logical clock
//!
//! Everything here is deliberately policy-free. Authorization lives in the
//! crates layered on top (`maple-token-regulated`, `maple-token-treasury`).

#![deny(unsafe_code)]

pub mod alloc;
pub mod balance;
pub mod coin;
pub mod config;
pub mod context;
pub mod epoch;
pub mod error;
pub mod ids;
pub mod object;
pub mod supply;

pub use alloc::{IdAllocator, RandomIdAllocator, SequentialIdAllocator};
pub use balance::Balance;
pub use coin::Coin;
pub use config::{EpochClockConfig, IdAllocation, PlatformConfig};
pub use context::{Platform, TxContext};
pub use epoch::{EpochClock, ManualEpochClock, WallClockEpoch};
pub use error::{BalanceError, PlatformError, Rejected};
pub use ids::{Address, ObjectId};
pub use object::{Object, ObjectStore, Shared};
pub use supply::TreasuryCap;
