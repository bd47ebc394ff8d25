//! Ledger — in-memory execution host for `AdmodConsumer` contracts
//!
//! Holds native balances, deployed contracts, and the event log, and executes
//! every call as one atomic transaction:
//! - State is snapshotted before the call and restored on any error
//! - Value moves only between ledger accounts; contracts never touch balances
//! - A payout returned by `release` is performed after the contract's own
//!   state is updated, so a reentrant call sees the decremented balance
//! - Accounts may register a [`Receiver`] hook that runs on incoming value and
//!   can reject it or re-enter the ledger
//!
//! Invariant: for every deployed contract, `balance_of(contract)` equals the
//! contract's held balance. Value reaches a contract only through `deposit`;
//! anything already sitting at the address when it is deployed is folded in
//! as a deposit from the deployer.

use admod_types::address::Address;
use admod_types::ids::TxId;
use admod_types::numeric::Wei;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info, warn};

use crate::abi::{Call, Query, QueryResult};
use crate::consumer::{AdmodConsumer, Payout};
use crate::errors::{ConsumerError, LedgerError};
use crate::events::{ContractEvent, LogEntry};

/// Maximum nesting of calls and value transfers within one transaction
pub const MAX_CALL_DEPTH: usize = 1024;

/// Code that runs when an account receives value.
///
/// Returning `Err` rejects the transfer; the reason is surfaced to the
/// sender. The hook may re-enter the ledger through `ledger`, including
/// registering or removing hooks; those changes roll back with the
/// transaction. A hook never runs re-entrantly: value sent back to the same
/// account from inside the hook does not trigger it again.
pub trait Receiver {
    fn on_receive(&mut self, ledger: &mut Ledger, from: Address, amount: Wei) -> Result<(), String>;
}

impl<F> Receiver for F
where
    F: FnMut(&mut Ledger, Address, Wei) -> Result<(), String>,
{
    fn on_receive(&mut self, ledger: &mut Ledger, from: Address, amount: Wei) -> Result<(), String> {
        self(ledger, from, amount)
    }
}

/// Outcome of a successful transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_id: TxId,
    pub from: Address,
    /// Called contract, deployed contract, or value recipient
    pub to: Address,
    /// Events emitted by `to` during this call
    pub events: Vec<ContractEvent>,
}

#[derive(Debug, Clone, Default)]
struct WorldState {
    balances: HashMap<Address, Wei>,
    contracts: HashMap<Address, AdmodConsumer>,
    nonces: HashMap<Address, u64>,
}

type Hook = Rc<RefCell<dyn Receiver>>;

struct Snapshot {
    state: WorldState,
    receivers: HashMap<Address, Hook>,
    log_len: usize,
}

/// In-memory ledger executing contract calls atomically.
#[derive(Default)]
pub struct Ledger {
    state: WorldState,
    /// Append-only event log
    logs: Vec<LogEntry>,
    receivers: HashMap<Address, Hook>,
    depth: usize,
    current_tx: Option<TxId>,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("state", &self.state)
            .field("logs", &self.logs.len())
            .field("receivers", &self.receivers.keys().collect::<Vec<_>>())
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    // ───────────────────────── Accounts ─────────────────────────

    /// Credit `amount` to `to` out of thin air. Genesis funding only.
    ///
    /// Contracts cannot be minted to; their balance moves only through `deposit`.
    pub fn mint(&mut self, to: Address, amount: Wei) -> Result<(), LedgerError> {
        if self.is_contract(to) {
            return Err(LedgerError::MintToContract { address: to });
        }
        self.credit(to, amount)?;
        debug!(%to, amount = %amount, "Minted native balance");
        Ok(())
    }

    pub fn balance_of(&self, account: Address) -> Wei {
        self.state.balances.get(&account).copied().unwrap_or(0)
    }

    /// Number of contracts `account` has deployed.
    pub fn nonce_of(&self, account: Address) -> u64 {
        self.state.nonces.get(&account).copied().unwrap_or(0)
    }

    /// Install `receiver` on `account`, replacing any previous hook.
    pub fn register_receiver(&mut self, account: Address, receiver: impl Receiver + 'static) {
        self.receivers
            .insert(account, Rc::new(RefCell::new(receiver)));
    }

    pub fn remove_receiver(&mut self, account: Address) -> bool {
        self.receivers.remove(&account).is_some()
    }

    // ───────────────────────── Deployment ─────────────────────────

    /// Address of the contract `deployer` creates with its `nonce`-th deployment.
    ///
    /// `sha256(deployer || nonce_be)`, trailing 20 bytes.
    pub fn contract_address(deployer: Address, nonce: u64) -> Address {
        let mut hasher = Sha256::new();
        hasher.update(deployer.as_bytes());
        hasher.update(nonce.to_be_bytes());
        let digest: [u8; 32] = hasher.finalize().into();
        Address::from_digest(&digest)
    }

    /// Deploy an `AdmodConsumer(owner, beneficiary)`.
    ///
    /// A failed constructor deploys nothing and leaves the deployer nonce
    /// untouched. The receipt's `to` is the new contract address. Value
    /// already held at that address is credited to the contract as a
    /// deposit from `deployer`.
    pub fn deploy(
        &mut self,
        deployer: Address,
        owner: Address,
        beneficiary: Address,
    ) -> Result<Receipt, LedgerError> {
        let mut consumer = AdmodConsumer::new(owner, beneficiary).map_err(|e| {
            warn!(%deployer, %owner, %beneficiary, error = %e, "Constructor reverted");
            LedgerError::from(e)
        })?;

        let nonce = self.nonce_of(deployer);
        let address = Self::contract_address(deployer, nonce);
        let tx_id = self.current_tx.unwrap_or_default();

        let prefunded = self.balance_of(address);
        if prefunded > 0 {
            consumer.deposit(deployer, prefunded)?;
            debug!(%address, amount = %prefunded, "Folded prefunded value into contract");
        }

        let events = consumer.drain_events();
        self.state.nonces.insert(deployer, nonce + 1);
        self.state.contracts.insert(address, consumer);
        self.state.balances.insert(address, prefunded);
        self.append_logs(tx_id, address, &events);

        info!(%address, %deployer, %owner, %beneficiary, "AdmodConsumer deployed");

        Ok(Receipt {
            tx_id,
            from: deployer,
            to: address,
            events,
        })
    }

    pub fn contract(&self, address: Address) -> Option<&AdmodConsumer> {
        self.state.contracts.get(&address)
    }

    pub fn is_contract(&self, address: Address) -> bool {
        self.state.contracts.contains_key(&address)
    }

    // ───────────────────────── Calls ─────────────────────────

    /// Execute `call` on `contract` as `from`, attaching `value`.
    ///
    /// Any failure, including one inside a nested transfer, rolls back every
    /// change the call made.
    pub fn call(
        &mut self,
        from: Address,
        contract: Address,
        call: Call,
        value: Wei,
    ) -> Result<Receipt, LedgerError> {
        let method = call.method();
        debug!(%from, %contract, method, value = %value, depth = self.depth, "Executing call");

        let (tx_id, events) =
            self.transact(|ledger, tx_id| ledger.execute(tx_id, from, contract, call, value))
                .map_err(|e| {
                    warn!(%from, %contract, method, tag = e.tag(), error = %e, "Call reverted");
                    e
                })?;

        Ok(Receipt {
            tx_id,
            from,
            to: contract,
            events,
        })
    }

    /// Plain value transfer. Sending to a deployed contract is a `deposit`.
    pub fn send_value(
        &mut self,
        from: Address,
        to: Address,
        amount: Wei,
    ) -> Result<Receipt, LedgerError> {
        if self.is_contract(to) {
            return self.call(from, to, Call::Deposit, amount);
        }

        let (tx_id, events) = self.transact(|ledger, _| {
            ledger.move_native(from, to, amount)?;
            ledger.notify_receiver(from, to, amount)?;
            Ok(Vec::new())
        })?;

        debug!(%from, %to, amount = %amount, "Value transferred");
        Ok(Receipt {
            tx_id,
            from,
            to,
            events,
        })
    }

    /// Read an accessor of a deployed contract.
    pub fn query(&self, contract: Address, query: Query) -> Result<QueryResult, LedgerError> {
        let consumer = self
            .contract(contract)
            .ok_or(LedgerError::UnknownContract { address: contract })?;

        Ok(match query {
            Query::Owner => QueryResult::Address(consumer.owner()),
            Query::Beneficiary => QueryResult::Address(consumer.beneficiary()),
            Query::Balance => QueryResult::Balance(consumer.balance()),
        })
    }

    // ───────────────────────── Events ─────────────────────────

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn logs_for(&self, contract: Address) -> impl Iterator<Item = &LogEntry> + '_ {
        self.logs.iter().filter(move |entry| entry.contract == contract)
    }

    // ───────────────────────── Execution ─────────────────────────

    fn execute(
        &mut self,
        tx_id: TxId,
        from: Address,
        contract: Address,
        call: Call,
        value: Wei,
    ) -> Result<Vec<ContractEvent>, LedgerError> {
        self.consumer_mut(contract)?;

        if value > 0 && !call.is_payable() {
            return Err(LedgerError::NonPayable {
                method: call.method(),
            });
        }

        match call {
            Call::Deposit => {
                self.move_native(from, contract, value)?;
                self.consumer_mut(contract)?.deposit(from, value)?;
                Ok(self.collect_events(tx_id, contract))
            }
            Call::Release { amount } => {
                let payout = self.consumer_mut(contract)?.release(from, amount)?;
                let events = self.collect_events(tx_id, contract);
                self.pay(contract, payout)?;
                Ok(events)
            }
            Call::SetBeneficiary { beneficiary } => {
                self.consumer_mut(contract)?
                    .set_beneficiary(from, beneficiary)?;
                Ok(self.collect_events(tx_id, contract))
            }
            Call::TransferOwnership { new_owner } => {
                self.consumer_mut(contract)?
                    .transfer_ownership(from, new_owner)?;
                Ok(self.collect_events(tx_id, contract))
            }
        }
    }

    /// Perform a payout the contract has already accounted for.
    fn pay(&mut self, contract: Address, payout: Payout) -> Result<(), LedgerError> {
        let Payout { recipient, amount } = payout;
        self.send_value(contract, recipient, amount)
            .map(|_| ())
            .map_err(|e| {
                let reason = match e {
                    LedgerError::TransferRejected { reason, .. } => reason,
                    other => other.to_string(),
                };
                ConsumerError::TransferFailed { recipient, reason }.into()
            })
    }

    /// Run `f` as one atomic unit; nested units share the outer `TxId`.
    fn transact<F>(&mut self, f: F) -> Result<(TxId, Vec<ContractEvent>), LedgerError>
    where
        F: FnOnce(&mut Self, TxId) -> Result<Vec<ContractEvent>, LedgerError>,
    {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(LedgerError::CallDepthExceeded {
                limit: MAX_CALL_DEPTH,
            });
        }

        let snapshot = self.snapshot();
        let outer_tx = self.current_tx;
        let tx_id = outer_tx.unwrap_or_default();

        self.current_tx = Some(tx_id);
        self.depth += 1;
        let result = f(self, tx_id);
        self.depth -= 1;
        self.current_tx = outer_tx;

        match result {
            Ok(events) => Ok((tx_id, events)),
            Err(e) => {
                self.restore(snapshot);
                Err(e)
            }
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            receivers: self.receivers.clone(),
            log_len: self.logs.len(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.state = snapshot.state;
        self.receivers = snapshot.receivers;
        self.logs.truncate(snapshot.log_len);
    }

    fn consumer_mut(&mut self, contract: Address) -> Result<&mut AdmodConsumer, LedgerError> {
        self.state
            .contracts
            .get_mut(&contract)
            .ok_or(LedgerError::UnknownContract { address: contract })
    }

    /// Move pending events of `contract` into the log.
    fn collect_events(&mut self, tx_id: TxId, contract: Address) -> Vec<ContractEvent> {
        let events = self
            .state
            .contracts
            .get_mut(&contract)
            .map(AdmodConsumer::drain_events)
            .unwrap_or_default();
        self.append_logs(tx_id, contract, &events);
        events
    }

    fn append_logs(&mut self, tx_id: TxId, contract: Address, events: &[ContractEvent]) {
        self.logs.extend(events.iter().cloned().map(|event| LogEntry {
            tx_id,
            contract,
            event,
        }));
    }

    fn notify_receiver(&mut self, from: Address, to: Address, amount: Wei) -> Result<(), LedgerError> {
        let Some(hook) = self.receivers.get(&to).cloned() else {
            return Ok(());
        };
        // Already running further up the stack.
        let Ok(mut receiver) = hook.try_borrow_mut() else {
            return Ok(());
        };
        let result = receiver.on_receive(self, from, amount);
        drop(receiver);
        result.map_err(|reason| LedgerError::TransferRejected {
            recipient: to,
            reason,
        })
    }

    fn move_native(&mut self, from: Address, to: Address, amount: Wei) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                account: from,
                required: amount,
                available,
            });
        }
        self.state.balances.insert(from, available - amount);
        self.credit(to, amount)
    }

    fn credit(&mut self, to: Address, amount: Wei) -> Result<(), LedgerError> {
        let current = self.state.balances.entry(to).or_insert(0);
        *current = current.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }
}
