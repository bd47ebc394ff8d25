//! Call surface of the contract
//!
//! `Call` names the mutating entry points and `Query` the read accessors.
//! Both serialize with the method name under a `method` tag, e.g.
//! `{"method":"release","amount":"40"}`.

use admod_types::address::Address;
use admod_types::numeric::{wei_str, wei_str_opt, Wei};
use serde::{Deserialize, Serialize};

/// Mutating entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum Call {
    /// Accept the attached value. Same as a plain value transfer.
    Deposit,
    /// Owner-only. Full balance when `amount` is omitted.
    Release {
        #[serde(default, with = "wei_str_opt", skip_serializing_if = "Option::is_none")]
        amount: Option<Wei>,
    },
    /// Owner-only.
    SetBeneficiary { beneficiary: Address },
    /// Owner-only, single step.
    TransferOwnership {
        #[serde(rename = "newOwner")]
        new_owner: Address,
    },
}

impl Call {
    pub fn method(&self) -> &'static str {
        match self {
            Call::Deposit => "deposit",
            Call::Release { .. } => "release",
            Call::SetBeneficiary { .. } => "setBeneficiary",
            Call::TransferOwnership { .. } => "transferOwnership",
        }
    }

    /// Only `deposit` may carry value.
    pub fn is_payable(&self) -> bool {
        matches!(self, Call::Deposit)
    }
}

/// Read accessors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Query {
    Owner,
    Beneficiary,
    Balance,
}

/// Answer to a [`Query`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryResult {
    Address(Address),
    Balance(#[serde(with = "wei_str")] Wei),
}
