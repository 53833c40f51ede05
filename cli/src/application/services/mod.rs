//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod cleanup;
pub mod config_service;
pub mod disk;
pub mod pool_client;
pub mod provision;
pub mod session;
pub mod tagging;
