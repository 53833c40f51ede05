//! Provisioning: bounded lease rounds that retry only outstanding templates.

use std::time::Instant;

use anyhow::{Context, Result};
use futures_util::future::join_all;

use crate::application::ports::{HttpMethod, Pause, PoolTransport, ProgressReporter};
use crate::application::services::pool_client::PoolClient;
use crate::domain::{
    Host, LeaseError, LeaseOutcome, LeasedVm, ProvisionRequest, parse_lease_response,
};

impl<T, R, P> PoolClient<T, R, P>
where
    T: PoolTransport,
    R: ProgressReporter,
    P: Pause,
{
    /// Lease a VM for every host that does not have one yet.
    ///
    /// Each round issues one `POST /vm/<template>` per host still waiting for
    /// that template, concurrently, and binds every usable answer to its own
    /// host. Templates that got nothing stay outstanding for the next round;
    /// satisfied ones are never requested again. Hosts that declare a disk
    /// size get it attached and verified as soon as they are bound, and every
    /// leased host is tagged before this returns.
    ///
    /// Hosts bound before an error stay bound in `hosts`, so the caller can
    /// still hand them back.
    ///
    /// # Errors
    ///
    /// - `InvalidAddress` / `InvalidTemplateName` before any request is sent.
    /// - `ProvisioningFailed` naming the templates still outstanding after
    ///   `max_rounds` rounds.
    /// - Transport failures, and disk or tagging failures, as they happen.
    pub async fn provision(&self, hosts: &mut [Host]) -> Result<()> {
        let started = Instant::now();
        let mut request = ProvisionRequest::from_hosts(hosts);
        for template in request.templates() {
            self.template_url(&template)?;
        }

        let rounds = self.config.max_rounds.max(1);
        for round in 1..=rounds {
            if request.is_empty() {
                break;
            }
            self.reporter.step(&format!(
                "requesting {} VM(s) for [{}] (round {round}/{rounds})",
                request.pending_calls(),
                request.templates().join(", ")
            ));

            let results = self.lease_round(&request).await;
            let mut first_error = None;
            let mut fresh = Vec::new();
            for (template, result) in results {
                match result {
                    Ok(LeaseOutcome::Leased(vm)) => match bind_next(hosts, &template, &vm) {
                        Some(index) => fresh.push((index, vm.disk_count)),
                        None => self.reporter.warn(&format!(
                            "pool returned an unrequested VM '{}' for template {template}",
                            vm.hostname
                        )),
                    },
                    Ok(LeaseOutcome::Failed) => {
                        tracing::debug!(%template, round, "template not available this round");
                    }
                    Err(e) => {
                        first_error.get_or_insert(e);
                    }
                }
            }

            for (index, prior_disks) in fresh {
                let host = &hosts[index];
                if let Some(fqdn) = host.fqdn() {
                    self.reporter
                        .success(&format!("using available host '{fqdn}' ({})", host.name));
                }
                if let Some(size_gb) = host.disk_size {
                    self.add_disk(host, size_gb, prior_disks).await?;
                }
            }
            if let Some(e) = first_error {
                return Err(e);
            }

            request.narrow(hosts);
            if !request.is_empty() && round < rounds {
                tracing::debug!(
                    outstanding = ?request.templates(),
                    backoff = ?self.config.round_backoff(),
                    "retrying outstanding templates"
                );
                self.pause.pause(self.config.round_backoff()).await;
            }
        }

        if !request.is_empty() {
            return Err(LeaseError::ProvisioningFailed {
                templates: request.templates(),
            }
            .into());
        }
        self.reporter.success(&format!(
            "spent {:.2} seconds grabbing VMs",
            started.elapsed().as_secs_f64()
        ));

        self.tag_hosts(hosts).await
    }

    /// One lease call per awaiting host, all in flight at once.
    async fn lease_round(&self, request: &ProvisionRequest) -> Vec<(String, Result<LeaseOutcome>)> {
        let calls = request
            .iter()
            .flat_map(|(template, awaiting)| std::iter::repeat_n(template, awaiting))
            .map(|template| async move { (template.to_string(), self.lease_one(template).await) });
        join_all(calls).await
    }

    async fn lease_one(&self, template: &str) -> Result<LeaseOutcome> {
        let url = self.template_url(template)?;
        let response = self
            .send(HttpMethod::Post, url, None)
            .await
            .with_context(|| format!("requesting a VM for template {template}"))?;
        Ok(parse_lease_response(&response, template))
    }
}

/// Bind `vm` to the first pending host waiting for `template`.
fn bind_next(hosts: &mut [Host], template: &str, vm: &LeasedVm) -> Option<usize> {
    let index = hosts
        .iter()
        .position(|h| !h.is_leased() && h.lease_template() == template)?;
    hosts[index].bind(vm.hostname.clone(), vm.domain.clone());
    Some(index)
}
