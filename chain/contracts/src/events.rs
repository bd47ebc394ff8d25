//! Contract events
//!
//! Events are immutable records emitted by contract operations. The field
//! names are part of the frozen ABI (`CONTRACT_ABI_VERSION`).

use admod_types::address::Address;
use admod_types::ids::TxId;
use admod_types::numeric::{wei_str, Wei};
use serde::{Deserialize, Serialize};

/// Value accepted by the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub sender: Address,
    #[serde(with = "wei_str")]
    pub amount: Wei,
}

/// Held value paid out to the beneficiary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Released {
    pub recipient: Address,
    #[serde(with = "wei_str")]
    pub amount: Wei,
}

/// Beneficiary replaced. `old_beneficiary` is zero when emitted by the constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryChanged {
    pub old_beneficiary: Address,
    pub new_beneficiary: Address,
}

/// Owner replaced. `previous_owner` is zero when emitted by the constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    Deposit(Deposit),
    Released(Released),
    BeneficiaryChanged(BeneficiaryChanged),
    OwnershipTransferred(OwnershipTransferred),
}

impl ContractEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ContractEvent::Deposit(_) => "Deposit",
            ContractEvent::Released(_) => "Released",
            ContractEvent::BeneficiaryChanged(_) => "BeneficiaryChanged",
            ContractEvent::OwnershipTransferred(_) => "OwnershipTransferred",
        }
    }
}

/// An event as recorded in the ledger log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub tx_id: TxId,
    /// Address of the emitting contract
    pub contract: Address,
    pub event: ContractEvent,
}
