//! Owner tag sync from a headerless CSV

use super::types::{PlannedUpdate, SyncPlan, SyncWarning};
use crate::console::{Device, DeviceUpdate};
use crate::decode::CsvRow;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Where to find the hostname and owner, and how owner tags are spelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerTagOptions {
    pub hostname_column: usize,
    pub owner_column: usize,
    pub tag_prefix: String,
}

impl Default for OwnerTagOptions {
    fn default() -> Self {
        Self {
            hostname_column: 0,
            owner_column: 1,
            tag_prefix: "Owner-".to_string(),
        }
    }
}

impl OwnerTagOptions {
    /// Fields a valid row must have
    pub fn expected_fields(&self) -> usize {
        self.hostname_column.max(self.owner_column) + 1
    }
}

/// One CSV row: this host belongs to this owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerAssignment {
    pub line: usize,
    pub hostname: String,
    pub owner: String,
    pub owner_tag: String,
}

/// Read owner assignments from positional rows
///
/// Rows with the wrong field count are skipped with a warning. Fails when no
/// valid row is left, or when a hostname appears twice (ignoring case).
pub fn owner_assignments(
    rows: &[CsvRow],
    options: &OwnerTagOptions,
    source: &str,
) -> Result<(Vec<OwnerAssignment>, Vec<SyncWarning>)> {
    let expected = options.expected_fields();
    let mut warnings = Vec::new();
    let mut assignments = Vec::new();

    for row in rows {
        if row.fields.len() != expected {
            warnings.push(SyncWarning::MalformedRow {
                line: row.line,
                expected,
                fields: row.fields.clone(),
            });
            continue;
        }

        let owner = row.fields[options.owner_column].clone();
        assignments.push(OwnerAssignment {
            line: row.line,
            hostname: row.fields[options.hostname_column].clone(),
            owner_tag: format!("{}{}", options.tag_prefix, owner),
            owner,
        });
    }

    if assignments.is_empty() {
        return Err(Error::csv(source, "no valid rows found"));
    }

    let mut seen = HashSet::new();
    for assignment in &assignments {
        if !seen.insert(assignment.hostname.to_lowercase()) {
            return Err(Error::DuplicateHostname {
                name: assignment.hostname.clone(),
            });
        }
    }

    Ok((assignments, warnings))
}

/// Decide which devices need their owner tag replaced
///
/// Hostnames match `display_name` ignoring case. Tags without the prefix are
/// kept; other prefixed tags are dropped. A device that already carries the
/// exact owner tag is left alone.
pub fn plan_tag_updates(
    assignments: &[OwnerAssignment],
    devices: &[Device],
    tag_prefix: &str,
) -> SyncPlan {
    let lowered: Vec<String> = devices
        .iter()
        .map(|d| d.display_name.to_lowercase())
        .collect();

    let mut plan = SyncPlan::default();

    for assignment in assignments {
        let hostname = assignment.hostname.to_lowercase();
        let mut found = false;

        for device in devices
            .iter()
            .zip(&lowered)
            .filter(|(_, name)| **name == hostname)
            .map(|(device, _)| device)
        {
            found = true;

            if device.tags.iter().any(|t| *t == assignment.owner_tag) {
                continue;
            }

            let mut tags: Vec<String> = device
                .tags
                .iter()
                .filter(|t| !t.starts_with(tag_prefix))
                .cloned()
                .collect();
            tags.push(assignment.owner_tag.clone());

            plan.updates.push(PlannedUpdate {
                device_id: device.id,
                display_name: device.display_name.clone(),
                update: DeviceUpdate::tags(tags, device.server_group_id),
            });
        }

        if !found {
            plan.warnings.push(SyncWarning::DeviceNotFound {
                name: assignment.hostname.clone(),
            });
        }
    }

    plan
}
