//! Extra disks: request, status polling and verification.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use serde_json::json;
use vmlease_cli::application::HttpMethod;
use vmlease_cli::domain::{Host, LeaseError};
use vmlease_common::disk_descriptor;

use crate::helpers::{
    CountingPause, FakePool, Recorder, client, config, lease_ok, ok, vm_with_disks,
};

/// Pool that leases `vm-1` and reports the new disk from the `attach_after`-th
/// status poll on (never when `None`).
fn disk_pool(attach_after: Option<usize>, disk_ok: bool) -> FakePool {
    let polls = std::sync::atomic::AtomicUsize::new(0);
    FakePool::new(move |req, _| {
        let path = req.url.path();
        Ok(match req.method {
            HttpMethod::Post => lease_ok("t", "vm-1"),
            HttpMethod::Put if path.contains("/disk/") => json!({"ok": disk_ok}),
            HttpMethod::Get => {
                let n = polls.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
                if attach_after.is_some_and(|after| n >= after) {
                    vm_with_disks("vm-1", &[disk_descriptor(16).as_str()])
                } else {
                    vm_with_disks("vm-1", &[])
                }
            }
            _ => ok(),
        })
    })
}

#[tokio::test]
async fn disk_is_requested_and_verified() {
    let pool = disk_pool(Some(2), true);
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let mut inventory = vec![Host::new("db", "t").with_disk(16)];

    client.provision(&mut inventory).await.expect("provision");

    assert_eq!(pool.count(HttpMethod::Put, "/vm/vm-1/disk/16"), 1);
    assert_eq!(pool.count(HttpMethod::Get, "/vm/vm-1"), 2);
    assert_eq!(pause.calls(), 1, "one pause between the two polls");
    assert!(
        reporter
            .successes()
            .iter()
            .any(|m| m.contains("16GB disk to vm-1"))
    );
}

#[tokio::test]
async fn disk_that_never_appears_is_an_error() {
    let pool = disk_pool(None, true);
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let mut inventory = vec![Host::new("db", "t").with_disk(16)];

    let err = client.provision(&mut inventory).await.unwrap_err();

    assert_eq!(
        err.downcast_ref::<LeaseError>(),
        Some(&LeaseError::DiskNotAttached {
            hostname: "vm-1".into(),
            size_gb: 16,
            attempts: 3,
        })
    );
    assert_eq!(pool.count(HttpMethod::Get, "/vm/vm-1"), 3);
    assert_eq!(pause.calls(), 2);
    assert!(inventory[0].is_leased(), "the VM stays recorded for cleanup");
}

#[tokio::test]
async fn refused_disk_request_is_an_error() {
    let pool = disk_pool(Some(1), false);
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let mut inventory = vec![Host::new("db", "t").with_disk(16)];

    let err = client.provision(&mut inventory).await.unwrap_err();

    assert!(err.to_string().contains("indicates disk was not added"), "got: {err}");
    assert_eq!(pool.count(HttpMethod::Get, "/vm/vm-1"), 0);
}

#[tokio::test]
async fn older_disk_of_the_same_size_does_not_count() {
    let pool = FakePool::new(|req, _| {
        Ok(match req.method {
            HttpMethod::Get => vm_with_disks("vm-1", &["+16gb"]),
            _ => ok(),
        })
    });
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);

    assert!(!client.wait_for_disk("vm-1", 16, 1).await.unwrap());
    assert!(client.wait_for_disk("vm-1", 16, 0).await.unwrap());
}

#[tokio::test]
async fn unknown_vm_status_keeps_polling() {
    let pool = FakePool::new(|_, _| Ok(json!({"ok": false})));
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);

    assert!(!client.wait_for_disk("vm-1", 8, 0).await.unwrap());
    assert_eq!(pool.requests().len(), 3);
}
