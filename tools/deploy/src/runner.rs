//! Runs a deployment plan on a fresh ledger.

use admod_contracts::errors::LedgerError;
use admod_contracts::ledger::{Ledger, Receipt};
use admod_types::address::Address;
use admod_types::numeric::format_ether;
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::DeploymentPlan;

/// Result of one scripted call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum CallOutcome {
    Ok {
        method: &'static str,
        receipt: Receipt,
    },
    Reverted {
        method: &'static str,
        error: &'static str,
        message: String,
    },
}

#[derive(Debug)]
pub struct DeploymentReport {
    pub contract: Address,
    pub deploy_receipt: Receipt,
    pub outcomes: Vec<CallOutcome>,
    pub ledger: Ledger,
}

pub fn run(plan: &DeploymentPlan) -> Result<DeploymentReport> {
    let mut ledger = Ledger::new();

    for funding in &plan.funding {
        ledger
            .mint(funding.address, funding.amount)
            .with_context(|| format!("funding {}", funding.address))?;
    }

    let deploy_receipt = ledger
        .deploy(plan.deployer, plan.owner, plan.beneficiary)
        .context("deploying AdmodConsumer")?;
    let contract = deploy_receipt.to;
    info!(%contract, tx_id = %deploy_receipt.tx_id, "Contract deployed");

    let mut outcomes = Vec::with_capacity(plan.calls.len());
    for (index, scripted) in plan.calls.iter().enumerate() {
        let method = scripted.call.method();
        match ledger.call(scripted.from, contract, scripted.call.clone(), scripted.value) {
            Ok(receipt) => outcomes.push(CallOutcome::Ok { method, receipt }),
            Err(e) => {
                warn!(index, method, tag = e.tag(), "Scripted call reverted");
                if plan.strict {
                    return Err(strict_failure(contract, index, method, e));
                }
                outcomes.push(CallOutcome::Reverted {
                    method,
                    error: e.tag(),
                    message: e.to_string(),
                });
            }
        }
    }

    if let Some(consumer) = ledger.contract(contract) {
        info!(
            %contract,
            owner = %consumer.owner(),
            beneficiary = %consumer.beneficiary(),
            balance = %format_ether(consumer.balance()),
            "Final contract state"
        );
    }

    Ok(DeploymentReport {
        contract,
        deploy_receipt,
        outcomes,
        ledger,
    })
}

fn strict_failure(contract: Address, index: usize, method: &str, e: LedgerError) -> anyhow::Error {
    anyhow::Error::new(e).context(format!(
        "scripted call #{} ({}) reverted on contract {} (deployed)",
        index, method, contract
    ))
}
