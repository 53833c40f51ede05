//! Application layer: port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain`, never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod ports;
pub mod services;

pub use ports::{
    AUTH_TOKEN_HEADER, ConfigStore, CredentialStore, HttpMethod, LeaseStateStore, Pause,
    PoolRequest, PoolTransport, ProgressReporter,
};
pub use services::pool_client::PoolClient;
