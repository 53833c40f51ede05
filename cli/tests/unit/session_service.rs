//! Lease sessions persisted between `provision` and `cleanup`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use serde_json::json;
use vmlease_cli::application::services::session::{
    current_record, provision_and_record, release_recorded,
};
use vmlease_cli::application::{HttpMethod, LeaseStateStore};
use vmlease_cli::infra::state::StateManager;

use crate::helpers::{
    CountingPause, FakePool, Recorder, client, config, generous_pool, hosts, last_segment,
    lease_ok, ok,
};

fn state() -> (tempfile::TempDir, StateManager) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mgr = StateManager::with_path(dir.path().join("state.json"));
    (dir, mgr)
}

#[tokio::test]
async fn successful_provision_is_recorded() {
    let (_dir, store) = state();
    let pool = generous_pool();
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);

    let record = provision_and_record(&client, &store, hosts(&["t1", "t2"]))
        .await
        .expect("provision");

    let stored = current_record(&store).await.unwrap().expect("record saved");
    assert_eq!(stored, record);
    assert_eq!(stored.pooling_api, "http://pool.test");
    assert_eq!(stored.leased().count(), 2);
}

#[tokio::test]
async fn partial_provision_is_recorded_for_cleanup() {
    let (_dir, store) = state();
    let pool = FakePool::new(|req, seq| {
        Ok(match (req.method, last_segment(req).as_str()) {
            (HttpMethod::Post, "t1") => json!({"ok": false}),
            (HttpMethod::Post, template) => lease_ok(template, &format!("vm-{seq}")),
            _ => ok(),
        })
    });
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);

    let err = provision_and_record(&client, &store, hosts(&["t1", "t2"]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("[t1]"));

    let stored = store.load_async().await.unwrap().expect("record saved");
    assert_eq!(stored.leased().count(), 1);
}

#[tokio::test]
async fn nothing_leased_writes_no_record() {
    let (_dir, store) = state();
    let pool = FakePool::new(|_, _| Ok(json!({"ok": false})));
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);

    assert!(
        provision_and_record(&client, &store, hosts(&["t1"]))
            .await
            .is_err()
    );
    assert!(!store.path().exists());
}

#[tokio::test]
async fn full_release_clears_the_record() {
    let (_dir, store) = state();
    let pool = generous_pool();
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let record = provision_and_record(&client, &store, hosts(&["t1", "t2"]))
        .await
        .expect("provision");

    let released = release_recorded(&client, &store, record).await.expect("cleanup");

    assert_eq!(released, 2);
    assert!(current_record(&store).await.unwrap().is_none());
}

#[tokio::test]
async fn failed_release_keeps_remaining_vms_recorded() {
    let (_dir, store) = state();
    let pool = FakePool::new(|req, seq| {
        Ok(match req.method {
            HttpMethod::Post => {
                let template = last_segment(req);
                lease_ok(&template, &format!("{template}-vm-{seq}"))
            }
            HttpMethod::Delete if last_segment(req).starts_with("t2") => json!({"ok": false}),
            _ => ok(),
        })
    });
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let record = provision_and_record(&client, &store, hosts(&["t1", "t2"]))
        .await
        .expect("provision");

    assert!(release_recorded(&client, &store, record).await.is_err());

    let stored = current_record(&store).await.unwrap().expect("remaining leases");
    let remaining: Vec<_> = stored.leased().map(|h| h.template.clone()).collect();
    assert_eq!(remaining, vec!["t2".to_string()]);
}

#[tokio::test]
async fn retried_release_only_sees_vms_still_held() {
    let (_dir, store) = state();
    let pool = FakePool::new(|req, seq| {
        Ok(match req.method {
            HttpMethod::Post => {
                let template = last_segment(req);
                lease_ok(&template, &format!("{template}-vm-{seq}"))
            }
            HttpMethod::Delete if last_segment(req).starts_with("t2") => json!({"ok": false}),
            _ => ok(),
        })
    });
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let first = client(config(), &pool, &reporter, &pause);
    let record = provision_and_record(&first, &store, hosts(&["t1", "t2"]))
        .await
        .expect("provision");
    assert!(release_recorded(&first, &store, record).await.is_err());

    let stored = current_record(&store).await.unwrap().expect("remaining leases");
    assert_eq!(stored.hosts.len(), 1);

    let retry_pool = generous_pool();
    let retry_reporter = Recorder::default();
    let retry_client = client(config(), &retry_pool, &retry_reporter, &pause);
    let released = release_recorded(&retry_client, &store, stored)
        .await
        .expect("retry");

    assert_eq!(released, 1);
    assert!(retry_reporter.warnings().is_empty(), "{:?}", retry_reporter.warnings());
    assert_eq!(retry_pool.paths(HttpMethod::Delete).len(), 1);
    assert!(current_record(&store).await.unwrap().is_none());
}
