//! Contract-specific error types
//!
//! `ConsumerError` is the revert taxonomy of the contract itself;
//! `LedgerError` wraps it with the failures of the execution host.

use admod_types::address::Address;
use admod_types::numeric::Wei;
use thiserror::Error;

/// Revert reasons raised by the `AdmodConsumer` entry points
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsumerError {
    #[error("Invalid address: the zero address is not allowed")]
    InvalidAddress,

    #[error("Unauthorized: caller {caller} is not the owner")]
    Unauthorized { caller: Address },

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: Wei, available: Wei },

    #[error("Transfer to {recipient} failed: {reason}")]
    TransferFailed { recipient: Address, reason: String },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

impl ConsumerError {
    /// Stable condition tag surfaced to callers and tooling.
    pub fn tag(&self) -> &'static str {
        match self {
            ConsumerError::InvalidAddress => "InvalidAddress",
            ConsumerError::Unauthorized { .. } => "Unauthorized",
            ConsumerError::InsufficientBalance { .. } => "InsufficientBalance",
            ConsumerError::TransferFailed { .. } => "TransferFailed",
            ConsumerError::Overflow => "Overflow",
        }
    }
}

/// Failures of the execution ledger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Contract reverted: {0}")]
    Contract(#[from] ConsumerError),

    #[error("Insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: Address,
        required: Wei,
        available: Wei,
    },

    #[error("Transfer to {recipient} rejected: {reason}")]
    TransferRejected { recipient: Address, reason: String },

    #[error("No contract deployed at {address}")]
    UnknownContract { address: Address },

    #[error("Cannot mint to contract {address}; deposit instead")]
    MintToContract { address: Address },

    #[error("Entry point {method} does not accept value")]
    NonPayable { method: &'static str },

    #[error("Call depth exceeded: limit {limit}")]
    CallDepthExceeded { limit: usize },

    #[error("Arithmetic overflow in ledger balance")]
    Overflow,
}

impl LedgerError {
    /// Condition tag; contract reverts surface the contract's own tag.
    pub fn tag(&self) -> &'static str {
        match self {
            LedgerError::Contract(e) => e.tag(),
            LedgerError::InsufficientFunds { .. } => "InsufficientFunds",
            LedgerError::TransferRejected { .. } => "TransferRejected",
            LedgerError::UnknownContract { .. } => "UnknownContract",
            LedgerError::MintToContract { .. } => "MintToContract",
            LedgerError::NonPayable { .. } => "NonPayable",
            LedgerError::CallDepthExceeded { .. } => "CallDepthExceeded",
            LedgerError::Overflow => "Overflow",
        }
    }

    /// The contract revert, if this failure is one.
    pub fn as_contract(&self) -> Option<&ConsumerError> {
        match self {
            LedgerError::Contract(e) => Some(e),
            _ => None,
        }
    }
}
