//! Provisioning: lease rounds, retry narrowing and failure reporting.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use serde_json::json;
use vmlease_cli::application::HttpMethod;
use vmlease_cli::domain::{Host, LeaseConfig, LeaseError};

use crate::helpers::{
    CountingPause, FakePool, Recorder, client, config, generous_pool, hosts, last_segment,
    lease_failed, lease_ok, ok,
};

fn lease_error(err: &anyhow::Error) -> &LeaseError {
    err.downcast_ref::<LeaseError>()
        .unwrap_or_else(|| panic!("expected a LeaseError, got: {err:#}"))
}

#[tokio::test]
async fn all_templates_lease_in_one_round() {
    let pool = generous_pool();
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let mut inventory = hosts(&["t1", "t2", "t3"]);

    client.provision(&mut inventory).await.expect("provision");

    assert!(inventory.iter().all(Host::is_leased));
    assert_eq!(pool.paths(HttpMethod::Post).len(), 3);
    assert_eq!(pause.calls(), 0);
    assert_eq!(inventory[0].domain.as_deref(), Some("pool.test"));
    assert!(
        reporter
            .successes()
            .iter()
            .any(|m| m.starts_with("spent ") && m.ends_with(" seconds grabbing VMs"))
    );
}

#[tokio::test]
async fn only_outstanding_templates_are_retried() {
    let pool = FakePool::new(|req, seq| {
        Ok(match (req.method, last_segment(req).as_str()) {
            (HttpMethod::Post, "t1") => lease_failed(),
            (HttpMethod::Post, template) => lease_ok(template, &format!("vm-{seq}")),
            _ => ok(),
        })
    });
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let mut inventory = hosts(&["t1", "t2", "t3"]);

    let err = client.provision(&mut inventory).await.unwrap_err();

    assert_eq!(
        lease_error(&err),
        &LeaseError::ProvisioningFailed {
            templates: vec!["t1".into()]
        }
    );
    assert_eq!(
        err.to_string(),
        "requested VM templates [t1] not available"
    );
    assert_eq!(pool.count(HttpMethod::Post, "/vm/t1"), 3);
    assert_eq!(pool.count(HttpMethod::Post, "/vm/t2"), 1);
    assert_eq!(pool.count(HttpMethod::Post, "/vm/t3"), 1);
    assert_eq!(pause.calls(), 2);
    assert!(!inventory[0].is_leased());
    assert!(inventory[1].is_leased() && inventory[2].is_leased());
}

#[tokio::test]
async fn second_round_requests_only_the_failed_template() {
    let pool = FakePool::new(|req, seq| {
        Ok(match (req.method, last_segment(req).as_str()) {
            (HttpMethod::Post, "t1") if seq < 3 => lease_failed(),
            (HttpMethod::Post, template) => lease_ok(template, &format!("vm-{seq}")),
            _ => ok(),
        })
    });
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let mut inventory = hosts(&["t1", "t2", "t3"]);

    client.provision(&mut inventory).await.expect("provision");

    let posts = pool.paths(HttpMethod::Post);
    assert_eq!(posts.len(), 4);
    assert_eq!(posts[3], "/vm/t1");
    assert_eq!(pause.calls(), 1);
    assert!(inventory.iter().all(Host::is_leased));
}

#[tokio::test]
async fn every_failed_template_is_named_in_sorted_order() {
    let pool = FakePool::new(|_, _| Ok(lease_failed()));
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let cfg = LeaseConfig {
        max_rounds: 1,
        ..config()
    };
    let client = client(cfg, &pool, &reporter, &pause);
    let mut inventory = hosts(&["t3", "t1", "t2"]);

    let err = client.provision(&mut inventory).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "requested VM templates [t1, t2, t3] not available"
    );
    assert_eq!(pause.calls(), 0);
    assert!(pool.paths(HttpMethod::Put).is_empty(), "nothing to tag");
}

#[tokio::test]
async fn hosts_sharing_a_template_get_their_own_vms() {
    let pool = generous_pool();
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let mut inventory = vec![Host::new("a", "centos-7"), Host::new("b", "centos-7")];

    client.provision(&mut inventory).await.expect("provision");

    assert_eq!(pool.count(HttpMethod::Post, "/vm/centos-7"), 2);
    let names: Vec<_> = inventory.iter().filter_map(|h| h.vmhostname.clone()).collect();
    assert_eq!(names.len(), 2);
    assert_ne!(names[0], names[1]);
}

#[tokio::test]
async fn shared_template_retries_only_for_the_host_still_waiting() {
    let pool = FakePool::new(|req, seq| {
        Ok(match req.method {
            HttpMethod::Post if seq == 1 => lease_failed(),
            HttpMethod::Post => lease_ok("t", &format!("vm-{seq}")),
            _ => ok(),
        })
    });
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let mut inventory = vec![Host::new("a", "t"), Host::new("b", "t")];

    client.provision(&mut inventory).await.expect("provision");

    assert_eq!(pool.count(HttpMethod::Post, "/vm/t"), 3);
    assert!(inventory.iter().all(Host::is_leased));
}

#[tokio::test]
async fn template_folder_is_not_sent_to_the_pool() {
    let pool = generous_pool();
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let mut inventory = vec![Host::new("a", "vsphere/templates/centos-7")];

    client.provision(&mut inventory).await.expect("provision");

    assert_eq!(pool.paths(HttpMethod::Post), vec!["/vm/centos-7".to_string()]);
}

#[tokio::test]
async fn invalid_template_fails_before_any_request() {
    let pool = generous_pool();
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let mut inventory = hosts(&["good", "bad name"]);

    let err = client.provision(&mut inventory).await.unwrap_err();

    assert!(matches!(
        lease_error(&err),
        LeaseError::InvalidTemplateName { .. }
    ));
    assert!(pool.requests().is_empty());
}

#[tokio::test]
async fn invalid_address_fails_before_any_request() {
    let pool = generous_pool();
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let cfg = LeaseConfig {
        pooling_api: "pooling###   ".into(),
        ..config()
    };
    let client = client(cfg, &pool, &reporter, &pause);
    let mut inventory = hosts(&["t1"]);

    let err = client.provision(&mut inventory).await.unwrap_err();

    assert!(matches!(lease_error(&err), LeaseError::InvalidAddress { .. }));
    assert!(pool.requests().is_empty());
}

#[tokio::test]
async fn transport_failure_keeps_hosts_bound_earlier_in_the_round() {
    let pool = FakePool::new(|req, seq| match last_segment(req).as_str() {
        "t2" => anyhow::bail!("connection refused"),
        template => Ok(lease_ok(template, &format!("vm-{seq}"))),
    });
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let mut inventory = hosts(&["t1", "t2"]);

    let err = client.provision(&mut inventory).await.unwrap_err();

    assert!(format!("{err:#}").contains("connection refused"));
    assert!(inventory[0].is_leased(), "t1 lease must be kept for cleanup");
    assert!(!inventory[1].is_leased());
    assert_eq!(pause.calls(), 0, "no retry after a transport failure");
}

#[tokio::test]
async fn ok_as_string_and_hostname_arrays_are_accepted() {
    let pool = FakePool::new(|req, _| {
        Ok(match req.method {
            HttpMethod::Post => json!({
                "ok": "true",
                "t": {"hostname": ["first", "second"], "domain": "inner.test"}
            }),
            _ => ok(),
        })
    });
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let mut inventory = hosts(&["t"]);

    client.provision(&mut inventory).await.expect("provision");

    assert_eq!(inventory[0].fqdn().as_deref(), Some("first.inner.test"));
}

#[tokio::test]
async fn every_request_carries_the_token() {
    let pool = generous_pool();
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let mut inventory = hosts(&["t1", "t2"]);

    client.provision(&mut inventory).await.expect("provision");

    let requests = pool.requests();
    assert!(!requests.is_empty());
    assert!(requests.iter().all(|r| r.token.as_deref() == Some("secret")));
}

#[tokio::test]
async fn already_leased_hosts_are_not_requested_again() {
    let pool = generous_pool();
    let (reporter, pause) = (Recorder::default(), CountingPause::default());
    let client = client(config(), &pool, &reporter, &pause);
    let mut inventory = hosts(&["t1", "t2"]);
    inventory[0].bind("existing", None);

    client.provision(&mut inventory).await.expect("provision");

    assert_eq!(pool.paths(HttpMethod::Post), vec!["/vm/t2".to_string()]);
    assert_eq!(inventory[0].vmhostname.as_deref(), Some("existing"));
}
