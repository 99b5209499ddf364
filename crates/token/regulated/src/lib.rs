//! # maple-token-regulated
//!
//! A coin whose balance is hidden behind a type-level proof of
//! authorization. Reading the amount and the declared creator is public;
//! everything else (borrowing the balance, minting a wrapper around one,
//! unwrapping, joining, splitting) requires a value of the currency's
//! witness type `T`, which only the currency-defining module can build.
//!
//! No access-control list is consulted at runtime: the ability to write
//! `T { .. }` *is* the authorization.

#![deny(unsafe_code)]

pub mod coin;
pub mod witness;

pub use coin::RegulatedCoin;
pub use witness::Witness;
