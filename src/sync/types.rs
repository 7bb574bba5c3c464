//! Plan types shared by the planners

use crate::console::DeviceUpdate;
use std::fmt;

/// A device update decided by a planner
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedUpdate {
    pub device_id: i64,
    pub display_name: String,
    pub update: DeviceUpdate,
}

/// Something a planner skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncWarning {
    /// A CSV row names a device the console does not have
    DeviceNotFound { name: String },
    /// A CSV row names a group the console does not have
    UnknownGroup { device: String, group: String },
    /// A CSV row has the wrong number of fields
    MalformedRow {
        line: usize,
        expected: usize,
        fields: Vec<String>,
    },
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncWarning::DeviceNotFound { name } => {
                write!(f, "device from CSV {name} not found in the console, skipping device")
            }
            SyncWarning::UnknownGroup { device, group } => {
                write!(f, "group {group} not found in existing group list, skipping device {device}")
            }
            SyncWarning::MalformedRow {
                line,
                expected,
                fields,
            } => {
                let relation = if fields.len() > *expected {
                    "more"
                } else {
                    "fewer"
                };
                write!(
                    f,
                    "row {line} has {relation} than {expected} fields, skipping row: {fields:?}"
                )
            }
        }
    }
}

/// Updates to apply plus the warnings collected while planning
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    pub updates: Vec<PlannedUpdate>,
    pub warnings: Vec<SyncWarning>,
}

impl SyncPlan {
    /// Nothing to update
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}
