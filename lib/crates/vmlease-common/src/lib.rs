//! Wire types shared by everything that talks to the VM pooling service.

pub mod disk;
pub mod envelope;
pub mod types;

pub use disk::{disk_descriptor, parse_disk_descriptor};
pub use envelope::{response_ok, top_level_domain};
pub use types::*;
