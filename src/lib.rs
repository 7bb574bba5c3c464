// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # fleetsync
//!
//! Keeps a device management console in step with spreadsheet inventories.
//!
//! ## Features
//!
//! - **Authenticated client**: bearer token plus organization scoping on every call
//! - **Bounded retries**: transient statuses (429, 5xx gateway errors) are retried
//! - **Page aggregation**: `limit`/`page` listings are fetched to the end
//! - **Sync planners**: server groups and owner tags from CSV, duplicate cleanup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fleetsync::auth::Credential;
//! use fleetsync::console::{ConsoleApi, DeviceFilter};
//! use fleetsync::http::{HttpClient, HttpClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> fleetsync::Result<()> {
//!     let credential = Credential::new("1234", "api-key")?;
//!     let client = HttpClient::new(HttpClientConfig::default(), credential)?;
//!     let api = ConsoleApi::new(client);
//!
//!     for device in api.list_devices(&DeviceFilter::default()).await? {
//!         println!("{}", device.display_name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  cli: list-devices  sync-groups  sync-tags  remove-dups  │
//! └──────────────────────────────────────────────────────────┘
//!           │                    │
//! ┌─────────┴────────┐  ┌────────┴─────────┐  ┌─────────────┐
//! │ sync (planners)  │  │ decode (CSV)     │  │ config      │
//! └─────────┬────────┘  └──────────────────┘  └─────────────┘
//!           │
//! ┌─────────┴───────────────────────────────────────────────┐
//! │ console → pagination → http (retry, rate limit) → auth  │
//! └─────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credentials and request signing
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Page aggregation for listing endpoints
pub mod pagination;

/// CSV input
pub mod decode;

/// Console endpoints and resource types
pub mod console;

/// Sync planners and plan execution
pub mod sync;

/// Settings file
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
