//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: HTTP transport, credential,
//! config and state files, inventory loading and the diagnostic log.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod config;
pub mod credentials;
pub mod http;
pub mod inventory;
pub mod logging;
pub mod pause;
pub mod state;
