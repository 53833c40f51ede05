//! Domain layer: pure leasing logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod credentials;
pub mod disk;
pub mod error;
pub mod host;
pub mod inventory;
pub mod lease;
pub mod tags;
pub mod url;

pub use config::{LeaseConfig, RunOptions};
pub use credentials::Credentials;
pub use disk::disk_added;
pub use error::{ConfigError, InventoryError, LeaseError, TeardownFailure};
pub use host::{Host, LeaseState, Tags};
pub use inventory::{Inventory, LeaseRecord};
pub use lease::{LeaseOutcome, LeasedVm, ProvisionRequest, parse_lease_response};
pub use tags::merge_tags;
pub use url::{build_disk_url, build_template_url, build_vm_url};
