//! Paged requests

use super::types::{PageState, PageStep};
use crate::error::Result;
use crate::http::{Envelope, HttpClient, RequestConfig};
use crate::types::Method;
use serde_json::Value;
use tracing::debug;

impl HttpClient {
    /// Fetch every page of a list endpoint
    ///
    /// Returns the status of the last page with all items concatenated, or
    /// with `data = None` when the first page was already empty.
    pub async fn execute_paged(
        &self,
        method: Method,
        url: &str,
        request: RequestConfig,
    ) -> Result<Envelope> {
        let mut request = request;
        let mut state = PageState::from_query(&mut request.query)?;

        loop {
            let envelope = self.execute(method, url, &request).await?;
            let status = envelope.status;

            match state.absorb(envelope.data, status)? {
                PageStep::NoData => {
                    debug!("{} {} returned no data", method, url);
                    return Ok(Envelope::new(status, None));
                }
                PageStep::LastPage => {
                    debug!(
                        "{} {} finished after {} page(s), {} item(s)",
                        method,
                        url,
                        state.pages_fetched(),
                        state.records().len()
                    );
                    return Ok(Envelope::new(
                        status,
                        Some(Value::Array(state.into_records())),
                    ));
                }
                PageStep::MorePages => {
                    state.advance(&mut request.query);
                    debug!("{} {} fetching page {}", method, url, state.page());
                }
            }
        }
    }
}
