//! Deployment config
//!
//! A JSON file describing who deploys, the constructor arguments, genesis
//! funding, and an optional script of calls to replay after deployment.
//! Command-line flags take precedence over file values.

use std::fs;
use std::path::Path;

use admod_contracts::abi::Call;
use admod_types::address::Address;
use admod_types::numeric::{wei_str, Wei};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::CommandLine;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    pub deployer: Option<Address>,
    pub owner: Option<Address>,
    pub beneficiary: Option<Address>,
    #[serde(default)]
    pub funding: Vec<Funding>,
    #[serde(default)]
    pub calls: Vec<ScriptedCall>,
}

/// Genesis balance for one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Funding {
    pub address: Address,
    #[serde(with = "wei_str")]
    pub amount: Wei,
}

/// One call to replay against the deployed contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedCall {
    pub from: Address,
    #[serde(default, with = "wei_str")]
    pub value: Wei,
    pub call: Call,
}

impl DeployConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading deployment config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing deployment config {}", path.display()))
    }
}

/// Fully resolved deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentPlan {
    pub deployer: Address,
    pub owner: Address,
    pub beneficiary: Address,
    pub funding: Vec<Funding>,
    pub calls: Vec<ScriptedCall>,
    pub strict: bool,
}

impl DeploymentPlan {
    /// Merge the command line over an optional config file.
    pub fn resolve(cli: &CommandLine, file: Option<DeployConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let Some(owner) = cli.owner.or(file.owner) else {
            bail!("no owner given: pass --owner, set ADMOD_OWNER, or add \"owner\" to the config");
        };
        let Some(beneficiary) = cli.beneficiary.or(file.beneficiary) else {
            bail!("no beneficiary given: pass --beneficiary, set ADMOD_BENEFICIARY, or add \"beneficiary\" to the config");
        };
        let deployer = cli.deployer.or(file.deployer).unwrap_or(owner);

        Ok(Self {
            deployer,
            owner,
            beneficiary,
            funding: file.funding,
            calls: file.calls,
            strict: cli.strict,
        })
    }
}
