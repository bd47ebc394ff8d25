//! AdmodConsumer custody contract
//!
//! Receives ad-mediation payouts from any account and releases them to a
//! beneficiary under owner control. The contract itself only keeps
//! accounting; the `ledger` module executes it, moves native value, and
//! makes every call atomic.
//!
//! # Modules
//! - `abi`: Call and query surface
//! - `consumer`: The `AdmodConsumer` state machine
//! - `errors`: Revert and ledger error types
//! - `events`: Contract events
//! - `ledger`: In-memory execution host
//! - `security`: Owner access control

pub mod abi;
pub mod consumer;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod security;

/// Contract ABI version — frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
