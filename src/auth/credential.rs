//! Organization credential

use crate::error::{Error, Result};
use reqwest::RequestBuilder;

/// Query parameter that scopes console requests to an organization
pub const ORG_QUERY_PARAM: &str = "o";

/// Organization identifier plus bearer token
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    org_id: String,
    token: String,
}

impl Credential {
    /// Create a credential, rejecting blank values
    pub fn new(org_id: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let org_id = org_id.into();
        let token = token.into();

        if org_id.trim().is_empty() {
            return Err(Error::invalid_value("org_id", "must not be empty"));
        }
        if token.trim().is_empty() {
            return Err(Error::invalid_value("api_key", "must not be empty"));
        }

        Ok(Self { org_id, token })
    }

    /// Organization identifier
    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    /// Bearer token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// `Authorization` header value
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Apply the bearer token to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.token)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("org_id", &self.org_id)
            .field("token", &"<redacted>")
            .finish()
    }
}
