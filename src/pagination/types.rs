//! Pagination state
//!
//! Tracks the page index, the limit and the records gathered so far, and
//! decides after every page whether to stop.

use crate::error::{Error, Result};
use crate::types::{JsonValue, StringMap};
use serde_json::Value;

/// Items requested per page when the caller does not set `limit`
pub const DEFAULT_PAGE_LIMIT: u32 = 500;

/// Query parameter carrying the page size
pub const LIMIT_PARAM: &str = "limit";

/// Query parameter carrying the zero-based page index
pub const PAGE_PARAM: &str = "page";

/// What to do after absorbing a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    /// The first page had no data at all
    NoData,
    /// The page held fewer than `limit` items; the result is complete
    LastPage,
    /// The page was full; request the next one
    MorePages,
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    /// Page size
    limit: usize,
    /// Current page index
    page: u32,
    /// Records gathered so far, in server order
    records: Vec<JsonValue>,
    /// Pages absorbed so far
    pages_fetched: u32,
}

impl PageState {
    /// Read `limit` and `page` from the query, filling in the defaults
    pub fn from_query(query: &mut StringMap) -> Result<Self> {
        let limit = query
            .entry(LIMIT_PARAM.to_string())
            .or_insert_with(|| DEFAULT_PAGE_LIMIT.to_string());
        let limit: usize = limit
            .parse()
            .map_err(|_| Error::invalid_value(LIMIT_PARAM, format!("'{limit}' is not a number")))?;
        if limit == 0 {
            return Err(Error::invalid_value(LIMIT_PARAM, "must be greater than zero"));
        }

        let page = query
            .entry(PAGE_PARAM.to_string())
            .or_insert_with(|| "0".to_string());
        let page: u32 = page
            .parse()
            .map_err(|_| Error::invalid_value(PAGE_PARAM, format!("'{page}' is not a number")))?;

        Ok(Self {
            limit,
            page,
            records: Vec::new(),
            pages_fetched: 0,
        })
    }

    /// Page size
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Current page index
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Records gathered so far
    pub fn records(&self) -> &[JsonValue] {
        &self.records
    }

    /// Pages absorbed so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Fold one page into the state and decide what comes next
    ///
    /// `null`, `[]`, `{}` and an empty body all count as an empty page. An
    /// empty first page means there is nothing to list; a later one just
    /// ends the sequence.
    pub fn absorb(&mut self, data: Option<JsonValue>, status: u16) -> Result<PageStep> {
        let first = self.pages_fetched == 0;
        self.pages_fetched += 1;

        let items = match data {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(Value::Object(map)) if map.is_empty() => Vec::new(),
            Some(other) => {
                return Err(Error::unexpected_response(
                    status,
                    format!("expected a JSON array page, got {}", kind(&other)),
                ))
            }
        };

        if first && items.is_empty() {
            return Ok(PageStep::NoData);
        }

        let count = items.len();
        self.records.extend(items);

        if count < self.limit {
            Ok(PageStep::LastPage)
        } else {
            Ok(PageStep::MorePages)
        }
    }

    /// Move to the next page and write its index back into the query
    pub fn advance(&mut self, query: &mut StringMap) {
        self.page += 1;
        query.insert(PAGE_PARAM.to_string(), self.page.to_string());
    }

    /// Take the gathered records
    pub fn into_records(self) -> Vec<JsonValue> {
        self.records
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
