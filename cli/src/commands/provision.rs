//! `vmlease provision`: lease a VM for every host in an inventory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service::{ConfigOverrides, load_config};
use crate::application::services::session::{current_record, provision_and_record};
use crate::infra::inventory::load_inventory;

/// Arguments for the provision command.
#[derive(Args)]
pub struct ProvisionArgs {
    /// YAML inventory of hosts to lease
    #[arg(long, value_name = "FILE")]
    pub hosts: PathBuf,

    /// Pooling service address (overrides the config file)
    #[arg(long, env = "VMLEASE_POOLING_API")]
    pub pooling_api: Option<String>,

    /// Project tag applied to every VM
    #[arg(long)]
    pub project: Option<String>,

    /// Lease rounds before giving up on unavailable templates
    #[arg(long)]
    pub max_rounds: Option<u32>,
}

/// Run `vmlease provision`.
///
/// # Errors
///
/// Returns an error if configuration or inventory is invalid, VMs from an
/// earlier run are still recorded, or provisioning fails.
pub async fn run(app: &AppContext, args: ProvisionArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        pooling_api: args.pooling_api,
        project: args.project,
        max_rounds: args.max_rounds,
    };
    let config = load_config(&app.config_store, &overrides)?;
    let hosts = load_inventory(&args.hosts)?;

    if current_record(&app.state_mgr)
        .await?
        .is_some_and(|r| r.has_leases())
    {
        anyhow::bail!(
            "VMs from a previous run are still leased. Run `vmlease cleanup` first."
        );
    }

    let client = super::pool_client(config, app.reporter())?;
    let record = provision_and_record(&client, &app.state_mgr, hosts)
        .await
        .with_context(|| {
            if app.state_mgr.path().exists() {
                "provisioning failed; run `vmlease cleanup` to release VMs already leased"
            } else {
                "provisioning failed"
            }
        })?;
    app.renderer().render_record(&record)
}
