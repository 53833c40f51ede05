//! `vmlease cleanup`: hand every recorded VM back to the pool.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::config_service::{ConfigOverrides, load_config};
use crate::application::services::session::{current_record, release_recorded};

/// Run `vmlease cleanup`.
///
/// VMs are returned to the pool they were leased from, whatever the config
/// file says now.
///
/// # Errors
///
/// Returns an error if the lease record cannot be read or some VMs could not
/// be released.
pub async fn run(app: &AppContext) -> Result<()> {
    let Some(record) = current_record(&app.state_mgr).await? else {
        return app.renderer().render_released(0);
    };

    let overrides = ConfigOverrides {
        pooling_api: Some(record.pooling_api.clone()),
        ..ConfigOverrides::default()
    };
    let config = load_config(&app.config_store, &overrides)?;
    let client = super::pool_client(config, app.reporter())?;
    let released = release_recorded(&client, &app.state_mgr, record).await?;
    app.renderer().render_released(released)
}
