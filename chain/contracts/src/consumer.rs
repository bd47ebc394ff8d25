//! AdmodConsumer — custody of ad-mediation payouts
//!
//! Holds native value sent by anyone and releases it to a beneficiary under
//! owner control:
//! - Owner and beneficiary fixed at construction, both non-zero
//! - Deposits from any sender
//! - Owner-only release of the whole balance or a part of it
//! - Owner-only beneficiary replacement and ownership transfer
//!
//! The contract never moves value itself. `release` applies its effects and
//! hands back a [`Payout`] that the executing ledger performs afterwards, so
//! the held balance is always decremented before any external transfer runs.

use admod_types::address::Address;
use admod_types::numeric::{wei_str, Wei};
use serde::{Deserialize, Serialize};

use crate::errors::ConsumerError;
use crate::events::{BeneficiaryChanged, ContractEvent, Deposit, OwnershipTransferred, Released};
use crate::security::{require_non_zero, Ownable};

/// A value transfer the contract has committed to but not yet performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a payout has already been deducted and must be executed"]
pub struct Payout {
    pub recipient: Address,
    pub amount: Wei,
}

/// Contract state.
///
/// Always active: there is no phase field and no terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmodConsumer {
    ownable: Ownable,
    beneficiary: Address,
    /// Held native balance
    #[serde(with = "wei_str")]
    balance: Wei,
    /// Emitted events not yet collected by the ledger
    #[serde(skip)]
    events: Vec<ContractEvent>,
}

impl AdmodConsumer {
    /// Construct the contract.
    ///
    /// Emits `OwnershipTransferred(0, owner)` and `BeneficiaryChanged(0, beneficiary)`.
    pub fn new(owner: Address, beneficiary: Address) -> Result<Self, ConsumerError> {
        let ownable = Ownable::new(owner)?;
        let beneficiary = require_non_zero(beneficiary)?;

        let events = vec![
            ContractEvent::OwnershipTransferred(OwnershipTransferred {
                previous_owner: Address::ZERO,
                new_owner: owner,
            }),
            ContractEvent::BeneficiaryChanged(BeneficiaryChanged {
                old_beneficiary: Address::ZERO,
                new_beneficiary: beneficiary,
            }),
        ];

        Ok(Self {
            ownable,
            beneficiary,
            balance: 0,
            events,
        })
    }

    // ───────────────────────── Readers ─────────────────────────

    pub fn owner(&self) -> Address {
        self.ownable.owner()
    }

    pub fn beneficiary(&self) -> Address {
        self.beneficiary
    }

    pub fn balance(&self) -> Wei {
        self.balance
    }

    // ───────────────────────── Deposit ─────────────────────────

    /// Accept `amount` from `sender`. Open to any account, zero included.
    pub fn deposit(&mut self, sender: Address, amount: Wei) -> Result<(), ConsumerError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(ConsumerError::Overflow)?;

        self.events
            .push(ContractEvent::Deposit(Deposit { sender, amount }));
        Ok(())
    }

    // ───────────────────────── Release ─────────────────────────

    /// Release `amount` (the whole balance when `None`) to the current
    /// beneficiary. Owner-only.
    ///
    /// The balance is already reduced when this returns. The caller must
    /// execute the returned [`Payout`] and roll the contract back if it fails.
    pub fn release(
        &mut self,
        caller: Address,
        amount: Option<Wei>,
    ) -> Result<Payout, ConsumerError> {
        self.ownable.only_owner(caller)?;

        let amount = amount.unwrap_or(self.balance);
        if amount > self.balance {
            return Err(ConsumerError::InsufficientBalance {
                requested: amount,
                available: self.balance,
            });
        }

        self.balance -= amount;

        let recipient = self.beneficiary;
        self.events
            .push(ContractEvent::Released(Released { recipient, amount }));
        Ok(Payout { recipient, amount })
    }

    // ───────────────────────── Administration ─────────────────────────

    /// Replace the beneficiary. Owner-only. The owner's own address and the
    /// current beneficiary are both accepted.
    pub fn set_beneficiary(
        &mut self,
        caller: Address,
        new_beneficiary: Address,
    ) -> Result<(), ConsumerError> {
        self.ownable.only_owner(caller)?;
        let new_beneficiary = require_non_zero(new_beneficiary)?;

        let old_beneficiary = std::mem::replace(&mut self.beneficiary, new_beneficiary);
        self.events
            .push(ContractEvent::BeneficiaryChanged(BeneficiaryChanged {
                old_beneficiary,
                new_beneficiary,
            }));
        Ok(())
    }

    /// Hand ownership to `new_owner` in a single step. Owner-only.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), ConsumerError> {
        let previous_owner = self.ownable.transfer_ownership(caller, new_owner)?;
        self.events
            .push(ContractEvent::OwnershipTransferred(OwnershipTransferred {
                previous_owner,
                new_owner,
            }));
        Ok(())
    }

    // ───────────────────────── Events ─────────────────────────

    /// Events emitted since the last drain.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }
}
