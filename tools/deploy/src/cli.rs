use std::path::PathBuf;

use admod_types::address::Address;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "admod-deploy")]
#[command(about = "Deploy an AdmodConsumer contract and replay scripted calls against it.")]
pub struct CommandLine {
    /// Deployment config (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Contract owner; overrides the config
    #[arg(long, env = "ADMOD_OWNER")]
    pub owner: Option<Address>,

    /// Payout beneficiary; overrides the config
    #[arg(long, env = "ADMOD_BENEFICIARY")]
    pub beneficiary: Option<Address>,

    /// Deploying account; defaults to the owner
    #[arg(long)]
    pub deployer: Option<Address>,

    /// Abort on the first scripted call that reverts
    #[arg(long)]
    pub strict: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
