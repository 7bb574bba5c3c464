//! Sync module
//!
//! Record matching for the sync commands. Planners are pure: they take the
//! CSV input and the current console inventory and return the updates or
//! removals to perform, plus warnings for rows they had to skip. Applying a
//! plan is a separate, sequential step that stops at the first failure.

mod apply;
mod duplicates;
mod groups;
mod tags;
mod types;

pub use apply::{apply_removals, apply_updates};
pub use duplicates::{parse_disconnect_time, plan_duplicate_removals, PlannedRemoval};
pub use groups::{group_assignments, plan_group_updates, GroupAssignment, GroupColumns};
pub use tags::{owner_assignments, plan_tag_updates, OwnerAssignment, OwnerTagOptions};
pub use types::{PlannedUpdate, SyncPlan, SyncWarning};
