//! Access control for contract entry points
//!
//! A single stored owner compared against the caller on every privileged
//! call. Ownership moves in one step; there is no pending-owner phase.

use admod_types::address::Address;
use serde::{Deserialize, Serialize};

use crate::errors::ConsumerError;

/// Reject the zero address where a real account is required.
pub fn require_non_zero(address: Address) -> Result<Address, ConsumerError> {
    if address.is_zero() {
        return Err(ConsumerError::InvalidAddress);
    }
    Ok(address)
}

/// Single-owner access control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownable {
    owner: Address,
}

impl Ownable {
    /// Create access control with an initial, non-zero owner.
    pub fn new(owner: Address) -> Result<Self, ConsumerError> {
        Ok(Self {
            owner: require_non_zero(owner)?,
        })
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn is_owner(&self, caller: Address) -> bool {
        self.owner == caller
    }

    /// Fail with `Unauthorized` unless `caller` is the current owner.
    pub fn only_owner(&self, caller: Address) -> Result<(), ConsumerError> {
        if !self.is_owner(caller) {
            return Err(ConsumerError::Unauthorized { caller });
        }
        Ok(())
    }

    /// Hand ownership to `new_owner`, returning the previous owner.
    ///
    /// The caller check runs before the address check, so a non-owner always
    /// sees `Unauthorized`.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<Address, ConsumerError> {
        self.only_owner(caller)?;
        let new_owner = require_non_zero(new_owner)?;
        Ok(std::mem::replace(&mut self.owner, new_owner))
    }
}
