//! Teardown: hand every leased VM back to the pool.

use std::time::Instant;

use anyhow::{Context, Result};
use futures_util::future::join_all;

use crate::application::ports::{HttpMethod, Pause, PoolTransport, ProgressReporter};
use crate::application::services::pool_client::PoolClient;
use crate::domain::{Host, LeaseError, TeardownFailure, build_vm_url};

impl<T, R, P> PoolClient<T, R, P>
where
    T: PoolTransport,
    R: ProgressReporter,
    P: Pause,
{
    /// Issue exactly one `DELETE /vm/<hostname>` per leased host.
    ///
    /// Every deletion is attempted even when others fail. Released hosts are
    /// unbound in `hosts`; hosts whose deletion failed keep their VM so a
    /// later cleanup can retry them.
    ///
    /// # Errors
    ///
    /// Returns `TeardownFailed` listing every host that could not be released.
    pub async fn cleanup(&self, hosts: &mut [Host]) -> Result<()> {
        let names: Vec<String> = hosts.iter().filter_map(|h| h.vmhostname.clone()).collect();
        if names.len() != hosts.len() {
            self.reporter.warn(
                "some hosts did not have vmhostname set; VM provisioning was likely not successful",
            );
        }

        let started = Instant::now();
        let deletions = names.iter().map(|name| async move {
            self.reporter
                .step(&format!("handing '{name}' back to the pool for VM destruction"));
            (name, self.release(name).await)
        });
        let results = join_all(deletions).await;

        let mut failures = Vec::new();
        for (name, result) in results {
            match result {
                Ok(()) => {
                    if let Some(host) = hosts
                        .iter_mut()
                        .find(|h| h.vmhostname.as_deref() == Some(name.as_str()))
                    {
                        host.release();
                    }
                }
                Err(e) => failures.push(TeardownFailure {
                    hostname: name.clone(),
                    reason: format!("{e:#}"),
                }),
            }
        }
        self.reporter.success(&format!(
            "spent {:.2} seconds cleaning up",
            started.elapsed().as_secs_f64()
        ));

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LeaseError::TeardownFailed { failures }.into())
        }
    }

    async fn release(&self, hostname: &str) -> Result<()> {
        let url = build_vm_url(&self.config.pooling_api, hostname)?;
        let response = self
            .send(HttpMethod::Delete, url, None)
            .await
            .with_context(|| format!("deleting VM {hostname}"))?;
        if !vmlease_common::response_ok(&response) {
            anyhow::bail!("pool refused to delete VM {hostname}");
        }
        Ok(())
    }
}
