//! Extra disks: request one, then poll until the pool reports it attached.

use std::time::Instant;

use anyhow::{Context, Result};

use crate::application::ports::{HttpMethod, Pause, PoolTransport, ProgressReporter};
use crate::application::services::pool_client::PoolClient;
use crate::domain::{Host, LeaseError, build_disk_url, disk_added};

impl<T, R, P> PoolClient<T, R, P>
where
    T: PoolTransport,
    R: ProgressReporter,
    P: Pause,
{
    /// Attach a `size_gb` disk to a leased host and wait until the pool lists
    /// it at index `prior_disk_count`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not leased, the size is zero, the pool
    /// refuses the request, or the disk never shows up within
    /// `disk_poll_attempts` checks (`DiskNotAttached`).
    pub async fn add_disk(&self, host: &Host, size_gb: u32, prior_disk_count: usize) -> Result<()> {
        let hostname = host
            .vmhostname
            .as_deref()
            .with_context(|| format!("host '{}' has no leased VM to add a disk to", host.name))?;
        let url = build_disk_url(&self.config.pooling_api, hostname, size_gb)?;

        self.reporter.step(&format!(
            "requesting an additional disk of size {size_gb}GB for {hostname}"
        ));
        let started = Instant::now();
        let response = self
            .send(HttpMethod::Put, url, None)
            .await
            .with_context(|| format!("requesting a disk for {hostname}"))?;
        if !vmlease_common::response_ok(&response) {
            anyhow::bail!("response from {hostname} indicates disk was not added");
        }

        if self.wait_for_disk(hostname, size_gb, prior_disk_count).await? {
            self.reporter.success(&format!(
                "spent {:.2} seconds adding a {size_gb}GB disk to {hostname}",
                started.elapsed().as_secs_f64()
            ));
            Ok(())
        } else {
            Err(LeaseError::DiskNotAttached {
                hostname: hostname.to_string(),
                size_gb,
                attempts: self.config.disk_poll_attempts.max(1),
            }
            .into())
        }
    }

    /// Poll `GET /vm/<hostname>` until the disk is listed, at most
    /// `disk_poll_attempts` times.
    ///
    /// # Errors
    ///
    /// Returns an error if a status request fails.
    pub async fn wait_for_disk(
        &self,
        hostname: &str,
        size_gb: u32,
        prior_disk_count: usize,
    ) -> Result<bool> {
        let attempts = self.config.disk_poll_attempts.max(1);
        for attempt in 1..=attempts {
            let info = self.vm_info(hostname).await?;
            if disk_added(&info, size_gb, prior_disk_count) {
                return Ok(true);
            }
            tracing::debug!(hostname, attempt, attempts, "disk not attached yet");
            if attempt < attempts {
                self.pause.pause(self.config.disk_poll_interval()).await;
            }
        }
        Ok(false)
    }
}
