//! Pagination module
//!
//! Page/limit pagination over list endpoints that return a raw JSON array
//! per page.
//!
//! # Overview
//!
//! `HttpClient::execute_paged` sends `page` and `limit` query parameters,
//! starting at page 0 with a limit of 500, and keeps requesting the next
//! page until one comes back with fewer than `limit` items. Every page is
//! fetched through the regular request executor, so each one gets its own
//! retry budget.

mod pager;
mod types;

pub use types::{PageState, PageStep, DEFAULT_PAGE_LIMIT, LIMIT_PARAM, PAGE_PARAM};

#[cfg(test)]
mod tests;
