//! `vmlease status`: show the VMs recorded by the last `provision`.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::session::current_record;

/// Run `vmlease status`. Reads local state only; the pool is not contacted.
///
/// # Errors
///
/// Returns an error if the lease record exists but cannot be read.
pub async fn run(app: &AppContext) -> Result<()> {
    let record = current_record(&app.state_mgr).await?;
    app.renderer().render_status(record.as_ref())
}
