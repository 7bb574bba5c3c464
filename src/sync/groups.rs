//! Server group assignment from a CSV

use super::types::{PlannedUpdate, SyncPlan, SyncWarning};
use crate::console::{Device, DeviceUpdate, ServerGroup};
use crate::decode::CsvRecord;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Header names of the CSV columns holding device and group names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupColumns {
    pub device: String,
    pub group: String,
}

impl Default for GroupColumns {
    fn default() -> Self {
        Self {
            device: "Server".to_string(),
            group: "Current Schedule (IST)".to_string(),
        }
    }
}

/// One CSV row: put this device in this group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAssignment {
    pub line: usize,
    pub device_name: String,
    pub group_name: String,
}

/// Read assignments from keyed CSV records
///
/// Fails when the header lacks either configured column.
pub fn group_assignments(
    header: &[String],
    records: &[CsvRecord],
    columns: &GroupColumns,
    source: &str,
) -> Result<Vec<GroupAssignment>> {
    for column in [&columns.device, &columns.group] {
        if !header.iter().any(|h| h == column) {
            return Err(Error::csv(source, format!("missing column '{column}'")));
        }
    }

    Ok(records
        .iter()
        .map(|record| GroupAssignment {
            line: record.line,
            device_name: record.get(&columns.device).unwrap_or_default().to_string(),
            group_name: record.get(&columns.group).unwrap_or_default().to_string(),
        })
        .collect())
}

/// Decide which devices move to which group
///
/// Device names match `display_name` exactly. Every device sharing the name
/// is updated.
pub fn plan_group_updates(
    assignments: &[GroupAssignment],
    devices: &[Device],
    groups: &[ServerGroup],
) -> SyncPlan {
    let group_index: HashMap<&str, i64> = groups
        .iter()
        .filter_map(|g| match g.name.as_deref() {
            Some(name) if !name.is_empty() => Some((name, g.id)),
            _ => None,
        })
        .collect();

    let mut plan = SyncPlan::default();

    for assignment in assignments {
        let mut found = false;

        for device in devices
            .iter()
            .filter(|d| d.display_name == assignment.device_name)
        {
            found = true;
            match group_index.get(assignment.group_name.as_str()) {
                Some(&group_id) => plan.updates.push(PlannedUpdate {
                    device_id: device.id,
                    display_name: device.display_name.clone(),
                    update: DeviceUpdate::group(group_id),
                }),
                None => plan.warnings.push(SyncWarning::UnknownGroup {
                    device: device.display_name.clone(),
                    group: assignment.group_name.clone(),
                }),
            }
        }

        if !found {
            plan.warnings.push(SyncWarning::DeviceNotFound {
                name: assignment.device_name.clone(),
            });
        }
    }

    plan
}
