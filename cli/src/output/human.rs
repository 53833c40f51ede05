//! Human-readable terminal renderer.

use chrono::{DateTime, Utc};

use crate::domain::{Host, LeaseRecord};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("vmlease {version}");
    }

    /// Render the hosts leased by `provision`.
    pub fn render_record(&self, record: &LeaseRecord) {
        println!();
        self.ctx.header("Leased VMs:");
        for host in record.leased() {
            self.ctx.kv(&format!("{}:", host.name), &host_line(host));
        }
    }

    /// Render the stored lease state.
    pub fn render_status(&self, record: Option<&LeaseRecord>) {
        let Some(record) = record.filter(|r| r.has_leases()) else {
            self.ctx.info("No VMs are leased.");
            return;
        };
        self.ctx.kv("Pool:", &record.pooling_api);
        self.ctx
            .kv("Leased:", &format_age(record.created_at, Utc::now()));
        println!();
        self.ctx.header("VMs:");
        for host in record.leased() {
            self.ctx.kv(&format!("{}:", host.name), &host_line(host));
        }
        let pending = record.hosts.iter().filter(|h| !h.is_leased()).count();
        if pending > 0 {
            println!();
            self.ctx
                .warn(&format!("{pending} host(s) in this record have no VM"));
        }
    }

    /// Render the cleanup summary.
    pub fn render_released(&self, released: usize) {
        if released == 0 {
            self.ctx.info("No VMs to release.");
        } else {
            self.ctx
                .success(&format!("Released {released} VM(s) back to the pool"));
        }
    }
}

/// `<fqdn> (<template>)`, or the template alone for a host with no VM.
#[must_use]
pub fn host_line(host: &Host) -> String {
    match host.fqdn() {
        Some(fqdn) => format!("{fqdn} ({})", host.template),
        None => format!("- ({})", host.template),
    }
}

/// Format how long ago a lease was taken, e.g. `"2h 5m ago"`.
#[must_use]
pub fn format_age(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - since).num_minutes().max(0);
    let hours = minutes / 60;
    let minutes = minutes % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m ago")
    } else {
        format!("{minutes}m ago")
    }
}
