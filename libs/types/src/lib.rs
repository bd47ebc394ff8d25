//! Types library for the AdmodConsumer custody contract
//!
//! Value types shared by the contract, its execution ledger, and the
//! deployment tooling.
//!
//! # Modules
//! - `address`: 20-byte account identifiers
//! - `ids`: Transaction identifiers
//! - `numeric`: Native-currency amounts
//! - `errors`: Parse errors for the types above

pub mod address;
pub mod errors;
pub mod ids;
pub mod numeric;
