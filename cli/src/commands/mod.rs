//! Command implementations

pub mod cleanup;
pub mod provision;
pub mod status;
pub mod version;

use anyhow::Result;

use crate::application::PoolClient;
use crate::application::ports::ProgressReporter;
use crate::domain::LeaseConfig;
use crate::infra::credentials::FogCredentialStore;
use crate::infra::http::ReqwestTransport;
use crate::infra::pause::TokioPause;

/// Production pool client for `config`.
///
/// # Errors
///
/// Returns an error if the credentials path or the HTTP client cannot be set up.
pub(crate) fn pool_client<R: ProgressReporter>(
    config: LeaseConfig,
    reporter: R,
) -> Result<PoolClient<ReqwestTransport, R, TokioPause>> {
    let credentials = FogCredentialStore::new(config.credentials_file.as_deref())?;
    let transport = ReqwestTransport::new(config.request_timeout())?;
    Ok(PoolClient::new(
        config,
        &credentials,
        transport,
        reporter,
        TokioPause,
    ))
}
