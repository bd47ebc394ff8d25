mod cli;
mod config;
mod runner;

use anyhow::Context;
use cli::CommandLine;
use config::{DeployConfig, DeploymentPlan};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), anyhow::Error> {
    let commands = CommandLine::parse_args();
    init_logging();

    let file = commands
        .config
        .as_deref()
        .map(DeployConfig::load)
        .transpose()?;
    let plan = DeploymentPlan::resolve(&commands, file)?;

    tracing::info!(
        deployer = %plan.deployer,
        owner = %plan.owner,
        beneficiary = %plan.beneficiary,
        calls = plan.calls.len(),
        "Deploying AdmodConsumer"
    );

    let report = runner::run(&plan)?;

    tracing::debug!(
        tx_id = %report.deploy_receipt.tx_id,
        events = report.deploy_receipt.events.len(),
        "Deployment receipt"
    );
    tracing::info!(
        beneficiary = %plan.beneficiary,
        received = %report.ledger.balance_of(plan.beneficiary),
        "Beneficiary balance after script"
    );

    println!("Contract deployed to {}", report.contract);
    for outcome in &report.outcomes {
        let line = serde_json::to_string(outcome).context("encoding call outcome")?;
        println!("{}", line);
    }

    Ok(())
}
