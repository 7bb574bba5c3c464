//! Removal of disconnected duplicate devices

use crate::console::Device;
use crate::error::{Error, Result};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::collections::HashMap;

/// A device chosen for deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRemoval {
    pub device_id: i64,
    pub display_name: String,
    pub name: Option<String>,
    pub disconnected_at: DateTime<Utc>,
}

/// Parse a console disconnect timestamp
///
/// Any UTC offset or `Z` suffix is ignored and the wall time is read as UTC.
/// Fractional seconds are accepted.
pub fn parse_disconnect_time(raw: &str) -> Result<DateTime<Utc>> {
    let invalid = |message: &str| Error::decode("last_disconnect_time", format!("'{raw}': {message}"));

    let (date, time) = raw
        .trim()
        .split_once('T')
        .ok_or_else(|| invalid("missing 'T' separator"))?;
    let time = time.split(['+', '-', 'Z']).next().unwrap_or(time);
    let stamp = format!("{date}T{time}");

    NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| invalid(&e.to_string()))
}

/// Pick duplicates that have been disconnected for longer than `min_disconnected`
///
/// A duplicate is a device whose `display_name` is shared with at least one
/// other device. Connected devices (no disconnect time) are never picked.
/// A window reaching before the earliest representable time is rejected.
pub fn plan_duplicate_removals(
    devices: &[Device],
    now: DateTime<Utc>,
    min_disconnected: Duration,
) -> Result<Vec<PlannedRemoval>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for device in devices {
        *counts.entry(device.display_name.as_str()).or_default() += 1;
    }

    let cutoff = now.checked_sub_signed(min_disconnected).ok_or_else(|| {
        Error::invalid_value(
            "disconnected_minutes",
            format!("{} minutes is out of range", min_disconnected.num_minutes()),
        )
    })?;
    let mut removals = Vec::new();

    for device in devices {
        let Some(raw) = device.last_disconnect_time.as_deref() else {
            continue;
        };
        if counts.get(device.display_name.as_str()).copied().unwrap_or(0) < 2 {
            continue;
        }

        let disconnected_at = parse_disconnect_time(raw)?;
        if disconnected_at < cutoff {
            removals.push(PlannedRemoval {
                device_id: device.id,
                display_name: device.display_name.clone(),
                name: device.name.clone(),
                disconnected_at,
            });
        }
    }

    Ok(removals)
}
