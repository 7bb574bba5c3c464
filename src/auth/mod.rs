//! Authentication module
//!
//! The console authenticates every request with a bearer token scoped to a
//! single organization. The `Credential` is built once at startup and handed
//! to the HTTP client; it is never mutated afterwards.

mod credential;

pub use credential::{Credential, ORG_QUERY_PARAM};
