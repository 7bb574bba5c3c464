//! Applying plans against the console

use super::duplicates::PlannedRemoval;
use super::types::PlannedUpdate;
use crate::console::ConsoleApi;
use crate::error::Result;
use tracing::info;

/// Send every planned update, in order; the first failure aborts the rest
///
/// Returns the number of devices updated. With `dry_run` nothing is sent.
pub async fn apply_updates(
    api: &ConsoleApi,
    updates: &[PlannedUpdate],
    dry_run: bool,
) -> Result<usize> {
    for planned in updates {
        if dry_run {
            info!("[dry run] would update device {}", planned.display_name);
            continue;
        }
        info!("Updating device {}", planned.display_name);
        api.update_device(planned.device_id, &planned.update).await?;
    }

    Ok(if dry_run { 0 } else { updates.len() })
}

/// Delete every planned device, in order; the first failure aborts the rest
pub async fn apply_removals(
    api: &ConsoleApi,
    removals: &[PlannedRemoval],
    dry_run: bool,
) -> Result<usize> {
    for removal in removals {
        if dry_run {
            info!(
                "[dry run] would remove device {} (id {})",
                removal.display_name, removal.device_id
            );
            continue;
        }
        info!(
            "Removing device {} (id {}) from the console",
            removal.display_name, removal.device_id
        );
        let envelope = api.delete_device(removal.device_id).await?;
        info!("Delete returned {}", envelope.status);
    }

    Ok(if dry_run { 0 } else { removals.len() })
}
