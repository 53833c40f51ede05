//! Credential loading through the `CredentialStore` port.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use anyhow::Result;
use mockall::mock;
use vmlease_cli::application::{CredentialStore, PoolClient, ProgressReporter};
use vmlease_cli::domain::Credentials;

use crate::helpers::{CountingPause, config, generous_pool, hosts};

mock! {
    pub Creds {}
    impl CredentialStore for Creds {
        fn load(&self) -> Result<Credentials>;
        fn location(&self) -> String;
    }
}

mock! {
    pub Reporter {}
    impl ProgressReporter for Reporter {
        fn step(&self, message: &str);
        fn success(&self, message: &str);
        fn warn(&self, message: &str);
    }
}

fn quiet_reporter() -> MockReporter {
    let mut reporter = MockReporter::new();
    reporter.expect_step().returning(|_| ());
    reporter.expect_success().returning(|_| ());
    reporter
}

#[tokio::test]
async fn missing_token_warns_once_and_sends_no_header() {
    let mut creds = MockCreds::new();
    creds.expect_load().times(1).returning(|| Ok(Credentials::default()));
    creds
        .expect_location()
        .return_const("/home/ci/.fog".to_string());
    let mut reporter = quiet_reporter();
    reporter
        .expect_warn()
        .withf(|m| {
            m.starts_with("vmpooler_token not found in credentials file (/home/ci/.fog).")
                && m.ends_with("Proceeding without authentication")
        })
        .times(1)
        .return_const(());

    let pool = generous_pool();
    let pause = CountingPause::default();
    let client = PoolClient::new(config(), &creds, &pool, reporter, &pause);
    let mut inventory = hosts(&["t1"]);
    client.provision(&mut inventory).await.expect("provision");

    assert!(pool.requests().iter().all(|r| r.token.is_none()));
}

#[test]
fn unreadable_credentials_warn_with_the_cause() {
    let mut creds = MockCreds::new();
    creds
        .expect_load()
        .returning(|| Err(anyhow::anyhow!("invalid YAML: mapping values are not allowed")));
    creds
        .expect_location()
        .return_const("/home/ci/.fog".to_string());
    let mut reporter = MockReporter::new();
    reporter
        .expect_warn()
        .withf(|m| {
            m.starts_with("Invalid credentials file (/home/ci/.fog): invalid YAML")
                && m.ends_with("Proceeding without authentication")
        })
        .times(1)
        .return_const(());

    let pool = generous_pool();
    let pause = CountingPause::default();
    let client = PoolClient::new(config(), &creds, &pool, reporter, &pause);

    assert!(client.credentials().is_empty());
}

#[test]
fn token_is_loaded_silently() {
    let mut creds = MockCreds::new();
    creds
        .expect_load()
        .returning(|| Ok(Credentials::with_token("abc123")));
    let mut reporter = MockReporter::new();
    reporter.expect_warn().never();

    let pool = generous_pool();
    let pause = CountingPause::default();
    let client = PoolClient::new(config(), &creds, &pool, reporter, &pause);

    assert_eq!(client.credentials().token(), Some("abc123"));
    assert!(!format!("{:?}", client.credentials()).contains("abc123"));
}
