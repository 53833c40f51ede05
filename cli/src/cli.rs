//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Lease test VMs from a pooling service and hand them back
#[derive(Parser)]
#[command(
    name = "vmlease",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log pool requests and responses to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Lease a VM for every host in an inventory
    Provision(commands::provision::ProvisionArgs),

    /// Hand every leased VM back to the pool
    Cleanup,

    /// Show the VMs currently leased
    Status,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            command,
        } = self;
        let app = AppContext::new(AppFlags {
            no_color,
            quiet,
            json,
        })?;
        match command {
            Command::Provision(args) => commands::provision::run(&app, args).await,
            Command::Cleanup => commands::cleanup::run(&app).await,
            Command::Status => commands::status::run(&app).await,
            Command::Version => commands::version::run(&app),
        }
    }
}
