//! Metaform CLI - renders serverless build meta as infrastructure templates
//!
//! Usage: metaform <COMMAND>
//!
//! Commands:
//!   generate  Render the build meta as Terraform and/or CloudFormation
//!   check     Report which entries each flavor converts

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    metaform::logging::init(cli.verbose);

    match cli.command {
        Commands::Generate(args) => commands::generate::cmd_generate(&args, cli.json),
        Commands::Check { build_meta, flavor } => {
            commands::check::cmd_check(&build_meta, flavor, cli.json)
        }
    }
}
