//! Application service: lease sessions that outlive one process.
//!
//! `provision` records what it leased; `cleanup` reads that record back,
//! releases the VMs and persists whatever could not be released.

use anyhow::{Context, Result};

use crate::application::ports::{LeaseStateStore, Pause, PoolTransport, ProgressReporter};
use crate::application::services::pool_client::PoolClient;
use crate::domain::{Host, LeaseRecord};

/// Provision `hosts` and persist the resulting lease record.
///
/// The record is saved even when provisioning fails part way, as long as at
/// least one VM was leased, so those VMs can still be cleaned up.
///
/// # Errors
///
/// Returns the provisioning error, or an error if the record cannot be saved.
pub async fn provision_and_record<T, R, P>(
    client: &PoolClient<T, R, P>,
    store: &impl LeaseStateStore,
    mut hosts: Vec<Host>,
) -> Result<LeaseRecord>
where
    T: PoolTransport,
    R: ProgressReporter,
    P: Pause,
{
    let outcome = client.provision(&mut hosts).await;
    let record = LeaseRecord::new(client.config().pooling_api.clone(), hosts);
    if record.has_leases() {
        store
            .save_async(&record)
            .await
            .context("saving lease record")?;
    }
    outcome.map(|()| record)
}

/// Release every VM in `record` and update the stored record.
///
/// The stored record is cleared when nothing is left leased, and rewritten
/// with only the hosts still holding a VM otherwise. Returns how many VMs
/// were released.
///
/// # Errors
///
/// Returns `TeardownFailed` if some VMs could not be released, or an error if
/// the record cannot be updated.
pub async fn release_recorded<T, R, P>(
    client: &PoolClient<T, R, P>,
    store: &impl LeaseStateStore,
    mut record: LeaseRecord,
) -> Result<usize>
where
    T: PoolTransport,
    R: ProgressReporter,
    P: Pause,
{
    let before = record.leased().count();
    let outcome = client.cleanup(&mut record.hosts).await;
    let remaining = record.leased().count();

    if remaining == 0 {
        store.clear_async().await.context("clearing lease record")?;
    } else {
        record.hosts.retain(Host::is_leased);
        store
            .save_async(&record)
            .await
            .context("saving remaining leases")?;
    }
    outcome.map(|()| before - remaining)
}

/// Load the stored lease record, if any.
///
/// # Errors
///
/// Returns an error if the record exists but cannot be read.
pub async fn current_record(store: &impl LeaseStateStore) -> Result<Option<LeaseRecord>> {
    store.load_async().await
}
