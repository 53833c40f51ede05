//! `PoolClient`: the consumer side of the pool leasing protocol.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! The provisioning, disk, tagging and teardown use-cases live in sibling
//! modules as further `impl PoolClient` blocks.

use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;
use vmlease_common::HostInfo;

use crate::application::ports::{
    CredentialStore, HttpMethod, Pause, PoolRequest, PoolTransport, ProgressReporter,
};
use crate::domain::{Credentials, LeaseConfig, build_template_url, build_vm_url};

/// Leases VMs from the pool, verifies and tags them, and hands them back.
///
/// Every collaborator is injected: `T` talks HTTP, `R` reports progress and
/// `P` implements the pause between rounds and status polls.
pub struct PoolClient<T, R, P> {
    pub(super) config: LeaseConfig,
    pub(super) credentials: Credentials,
    pub(super) transport: T,
    pub(super) reporter: R,
    pub(super) pause: P,
}

impl<T, R, P> PoolClient<T, R, P>
where
    T: PoolTransport,
    R: ProgressReporter,
    P: Pause,
{
    /// Build a client, loading credentials once.
    ///
    /// Credential problems never fail construction: the client warns through
    /// `reporter` and continues unauthenticated.
    pub fn new(
        config: LeaseConfig,
        credential_store: &impl CredentialStore,
        transport: T,
        reporter: R,
        pause: P,
    ) -> Self {
        let credentials = load_credentials(credential_store, &reporter);
        Self {
            config,
            credentials,
            transport,
            reporter,
            pause,
        }
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub fn config(&self) -> &LeaseConfig {
        &self.config
    }

    /// Lease endpoint for `template` on the configured pool.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress` or `InvalidTemplateName`.
    pub fn template_url(&self, template: &str) -> Result<Url> {
        Ok(build_template_url(&self.config.pooling_api, template)?)
    }

    /// Current pool view of a leased VM (`GET /vm/<hostname>`).
    ///
    /// An answer that is not `ok` or lacks an entry for the hostname yields an
    /// empty record rather than an error, so pollers simply keep waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the request fails.
    pub async fn vm_info(&self, hostname: &str) -> Result<HostInfo> {
        let url = build_vm_url(&self.config.pooling_api, hostname)?;
        let response = self
            .send(HttpMethod::Get, url, None)
            .await
            .with_context(|| format!("querying VM {hostname}"))?;
        if !vmlease_common::response_ok(&response) {
            return Ok(HostInfo::default());
        }
        Ok(response
            .get(hostname)
            .cloned()
            .and_then(|entry| serde_json::from_value(entry).ok())
            .unwrap_or_default())
    }

    /// Send one request, attaching the token when the client has one.
    pub(super) async fn send(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<Value>,
    ) -> Result<Value> {
        let mut request = PoolRequest::new(method, url).with_token(self.credentials.token());
        if let Some(body) = body {
            request = request.with_body(body);
        }
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            authenticated = request.token.is_some(),
            body = ?request.body,
            "pool request"
        );
        let response = self.transport.send(request).await?;
        tracing::debug!(%response, "pool response");
        Ok(response)
    }
}

fn load_credentials(store: &impl CredentialStore, reporter: &impl ProgressReporter) -> Credentials {
    match store.load() {
        Ok(credentials) if !credentials.is_empty() => credentials,
        Ok(_) => {
            reporter.warn(&format!(
                "vmpooler_token not found in credentials file ({}). \
                 Proceeding without authentication",
                store.location()
            ));
            Credentials::default()
        }
        Err(e) => {
            reporter.warn(&format!(
                "Invalid credentials file ({}): {e:#}. Proceeding without authentication",
                store.location()
            ));
            Credentials::default()
        }
    }
}
