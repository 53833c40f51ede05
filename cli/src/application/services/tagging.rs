//! Tagging leased VMs with run and host metadata.

use anyhow::{Context, Result};
use futures_util::future::join_all;
use vmlease_common::TagUpdate;

use crate::application::ports::{HttpMethod, Pause, PoolTransport, ProgressReporter};
use crate::application::services::pool_client::PoolClient;
use crate::domain::{Host, Tags, build_vm_url, merge_tags};

impl<T, R, P> PoolClient<T, R, P>
where
    T: PoolTransport,
    R: ProgressReporter,
    P: Pause,
{
    /// Send merged tags for every leased host (`PUT /vm/<hostname>`).
    ///
    /// A pool answer that is not `ok` only warns: an untagged VM is still a
    /// usable VM.
    ///
    /// # Errors
    ///
    /// Returns the first transport failure.
    pub async fn tag_hosts(&self, hosts: &[Host]) -> Result<()> {
        let leased: Vec<&Host> = hosts.iter().filter(|h| h.is_leased()).collect();
        if leased.is_empty() {
            return Ok(());
        }
        self.reporter.step("tagging VMs");
        let calls = leased.into_iter().filter_map(|host| {
            let hostname = host.vmhostname.as_deref()?;
            let tags = merge_tags(host, &self.config.run);
            Some(async move { self.tag_vm(hostname, tags).await })
        });
        join_all(calls)
            .await
            .into_iter()
            .collect::<Result<Vec<()>>>()
            .map(|_| ())
    }

    async fn tag_vm(&self, hostname: &str, tags: Tags) -> Result<()> {
        let url = build_vm_url(&self.config.pooling_api, hostname)?;
        let body = serde_json::to_value(TagUpdate { tags }).context("serializing tags")?;
        let response = self
            .send(HttpMethod::Put, url, Some(body))
            .await
            .with_context(|| format!("tagging VM {hostname}"))?;
        if !vmlease_common::response_ok(&response) {
            self.reporter
                .warn(&format!("failed to tag host '{hostname}'"));
        }
        Ok(())
    }
}
