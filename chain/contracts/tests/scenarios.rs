//! End-to-end custody scenarios
//!
//! Each test deploys through the ledger, moves real native value, and checks
//! readers, balances, and emitted events.

use admod_contracts::abi::{Call, Query, QueryResult};
use admod_contracts::errors::{ConsumerError, LedgerError};
use admod_contracts::events::{ContractEvent, Deposit, Released};
use admod_contracts::ledger::Ledger;
use admod_types::address::Address;

const DEPLOYER: Address = Address::repeat_byte(0xde);
const A: Address = Address::repeat_byte(0xaa);
const B: Address = Address::repeat_byte(0xbb);
const PAYER: Address = Address::repeat_byte(0xcc);

fn deploy(owner: Address, beneficiary: Address) -> (Ledger, Address) {
    let mut ledger = Ledger::new();
    ledger.mint(PAYER, 10_000).unwrap();
    let contract = ledger.deploy(DEPLOYER, owner, beneficiary).unwrap().to;
    (ledger, contract)
}

fn release(amount: Option<u128>) -> Call {
    Call::Release { amount }
}

fn held(ledger: &Ledger, contract: Address) -> u128 {
    match ledger.query(contract, Query::Balance).unwrap() {
        QueryResult::Balance(b) => b,
        other => panic!("unexpected query result {:?}", other),
    }
}

// ═══════════════════════════════════════════════════════════════════
// Construction
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_construction_readers() {
    let (ledger, contract) = deploy(A, B);
    assert_eq!(
        ledger.query(contract, Query::Owner).unwrap(),
        QueryResult::Address(A)
    );
    assert_eq!(
        ledger.query(contract, Query::Beneficiary).unwrap(),
        QueryResult::Address(B)
    );
    assert_eq!(held(&ledger, contract), 0);
}

#[test]
fn test_construction_zero_beneficiary_deploys_nothing() {
    let mut ledger = Ledger::new();
    let err = ledger.deploy(DEPLOYER, A, Address::ZERO).unwrap_err();
    assert_eq!(err.tag(), "InvalidAddress");
    let would_be = Ledger::contract_address(DEPLOYER, 0);
    assert!(ledger.contract(would_be).is_none());
    assert_eq!(
        ledger.query(would_be, Query::Owner),
        Err(LedgerError::UnknownContract { address: would_be })
    );
}

#[test]
fn test_construction_with_original_script_addresses() {
    let owner: Address = "0x6788b5bf9755b3b100af0f23df4781beff51779a".parse().unwrap();
    let beneficiary: Address = "0x1f36664a18F1B50963CabbA8F9e7D03AD57532dD".parse().unwrap();
    let mut ledger = Ledger::new();
    let receipt = ledger.deploy(DEPLOYER, owner, beneficiary).unwrap();
    let consumer = ledger.contract(receipt.to).unwrap();
    assert_eq!(consumer.owner(), owner);
    assert_eq!(consumer.beneficiary(), beneficiary);
}

// ═══════════════════════════════════════════════════════════════════
// Deposit / release
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_deposit_emits_sender_and_amount() {
    let (mut ledger, contract) = deploy(A, B);
    let receipt = ledger.call(PAYER, contract, Call::Deposit, 75).unwrap();
    assert_eq!(
        receipt.events,
        vec![ContractEvent::Deposit(Deposit {
            sender: PAYER,
            amount: 75
        })]
    );
    assert_eq!(held(&ledger, contract), 75);
}

#[test]
fn test_release_full_sweep() {
    let (mut ledger, contract) = deploy(A, B);
    ledger.send_value(PAYER, contract, 250).unwrap();

    let receipt = ledger.call(A, contract, release(None), 0).unwrap();
    assert_eq!(
        receipt.events,
        vec![ContractEvent::Released(Released {
            recipient: B,
            amount: 250
        })]
    );
    assert_eq!(held(&ledger, contract), 0);
    assert_eq!(ledger.balance_of(B), 250);
}

#[test]
fn test_release_by_non_owner_is_unauthorized() {
    let (mut ledger, contract) = deploy(A, B);
    ledger.send_value(PAYER, contract, 100).unwrap();

    for caller in [B, PAYER] {
        let err = ledger.call(caller, contract, release(None), 0).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Contract(ConsumerError::Unauthorized { caller })
        );
    }
    assert_eq!(held(&ledger, contract), 100);
    assert_eq!(ledger.balance_of(B), 0);
}

#[test]
fn test_release_above_balance() {
    let (mut ledger, contract) = deploy(A, B);
    ledger.send_value(PAYER, contract, 100).unwrap();

    let err = ledger.call(A, contract, release(Some(101)), 0).unwrap_err();
    assert_eq!(err.tag(), "InsufficientBalance");
    assert_eq!(held(&ledger, contract), 100);
}

#[test]
fn test_scenario_partial_then_remaining() {
    // owner=A, beneficiary=B; deposit 100; release 40; release remaining 60
    let (mut ledger, contract) = deploy(A, B);
    ledger.call(PAYER, contract, Call::Deposit, 100).unwrap();

    ledger.call(A, contract, release(Some(40)), 0).unwrap();
    assert_eq!(held(&ledger, contract), 60);
    assert_eq!(ledger.balance_of(B), 40);

    ledger.call(A, contract, release(Some(60)), 0).unwrap();
    assert_eq!(held(&ledger, contract), 0);
    assert_eq!(ledger.balance_of(B), 100);
}

#[test]
fn test_scenario_owner_is_beneficiary() {
    // owner=A, beneficiary=A; deposit 50; release 50 returns funds to A
    let (mut ledger, contract) = deploy(A, A);
    ledger.call(PAYER, contract, Call::Deposit, 50).unwrap();

    let receipt = ledger.call(A, contract, release(Some(50)), 0).unwrap();
    assert_eq!(
        receipt.events,
        vec![ContractEvent::Released(Released {
            recipient: A,
            amount: 50
        })]
    );
    assert_eq!(ledger.balance_of(A), 50);
    assert_eq!(held(&ledger, contract), 0);
}

// ═══════════════════════════════════════════════════════════════════
// Administration
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_set_beneficiary_to_owner() {
    let (mut ledger, contract) = deploy(A, B);
    ledger
        .call(A, contract, Call::SetBeneficiary { beneficiary: A }, 0)
        .unwrap();
    assert_eq!(ledger.contract(contract).unwrap().beneficiary(), A);

    ledger.send_value(PAYER, contract, 30).unwrap();
    ledger.call(A, contract, release(None), 0).unwrap();
    assert_eq!(ledger.balance_of(A), 30);
    assert_eq!(ledger.balance_of(B), 0);
}

#[test]
fn test_set_beneficiary_zero_address() {
    let (mut ledger, contract) = deploy(A, B);
    let err = ledger
        .call(
            A,
            contract,
            Call::SetBeneficiary {
                beneficiary: Address::ZERO,
            },
            0,
        )
        .unwrap_err();
    assert_eq!(err, LedgerError::Contract(ConsumerError::InvalidAddress));
    assert_eq!(ledger.contract(contract).unwrap().beneficiary(), B);
}

#[test]
fn test_transfer_ownership_hands_over_every_privilege() {
    let (mut ledger, contract) = deploy(A, B);
    ledger.send_value(PAYER, contract, 90).unwrap();

    let err = ledger
        .call(B, contract, Call::TransferOwnership { new_owner: B }, 0)
        .unwrap_err();
    assert_eq!(err.tag(), "Unauthorized");

    ledger
        .call(A, contract, Call::TransferOwnership { new_owner: PAYER }, 0)
        .unwrap();

    // Old owner is locked out of every owner-only entry point
    assert!(ledger.call(A, contract, release(None), 0).is_err());
    assert!(ledger
        .call(A, contract, Call::SetBeneficiary { beneficiary: A }, 0)
        .is_err());
    assert!(ledger
        .call(A, contract, Call::TransferOwnership { new_owner: A }, 0)
        .is_err());

    // New owner can act repeatedly
    ledger.call(PAYER, contract, release(Some(30)), 0).unwrap();
    ledger.call(PAYER, contract, release(Some(30)), 0).unwrap();
    ledger
        .call(PAYER, contract, Call::TransferOwnership { new_owner: B }, 0)
        .unwrap();
    ledger.call(B, contract, release(None), 0).unwrap();

    assert_eq!(ledger.balance_of(B), 90);
    assert_eq!(ledger.contract(contract).unwrap().owner(), B);
}

#[test]
fn test_failed_call_leaves_log_untouched() {
    let (mut ledger, contract) = deploy(A, B);
    let before = ledger.logs().len();
    let _ = ledger.call(B, contract, release(None), 0);
    let _ = ledger.call(A, contract, Call::TransferOwnership { new_owner: Address::ZERO }, 0);
    assert_eq!(ledger.logs().len(), before);
}
