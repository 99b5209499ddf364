//! # maple-token-treasury
//!
//! Safe delegation of a currency's unlimited supply capability.
//!
//! A [`TreasuryLock`] takes exclusive custody of a `TreasuryCap<T>` and is
//! published as a shared object. Creating it yields exactly one
//! [`LockAdminCap`]; the admin issues any number of [`MintCap`]s, each with
//! its own per-epoch quota tracked by an embedded [`RateLimiter`].
//!
//! ## Guarantees
//!
//! - **No forged authority**: caps have no public constructors and cannot
//!   be cloned; moving one is the only way to hand it over.
//! - **Revocation by identity**: the lock bans *cap ids*, not holders, so a
//!   ban follows the cap wherever it is transferred.
//! - **No quota bypass**: minted amounts are accounted per cap and per
//!   epoch, reset lazily on first use in a new epoch.
//! - **Check-then-act**: every failure leaves lock, cap and supply exactly
//!   as they were.
//!
//! Admin authority itself is absolute: [`TreasuryLock::treasury_cap_mut`]
//! hands the admin the raw supply capability with no accounting.

#![deny(unsafe_code)]

pub mod caps;
pub mod error;
pub mod handle;
pub mod lock;
pub mod rate_limit;

pub use caps::{LockAdminCap, MintCap};
pub use error::TreasuryError;
pub use handle::TreasuryLockHandle;
pub use lock::TreasuryLock;
pub use rate_limit::{QuotaError, RateLimiter, Reservation};
