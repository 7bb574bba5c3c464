//! Console API module
//!
//! Typed wrappers over the console endpoints the sync commands use. Every
//! call is scoped to the credential's organization through the `o` query
//! parameter and goes through the shared `HttpClient`; list endpoints are
//! fetched with the pager.

mod api;
mod types;

pub use api::{ConsoleApi, DEFAULT_BASE_URL};
pub use types::{Device, DeviceFilter, DeviceUpdate, ServerGroup};
