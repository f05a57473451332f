//! API credentials and the headers they produce.

use crate::error::{DdnsError, Result};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Secondary authentication header used by email-scoped accounts.
/// Lowercase, as `HeaderName::from_static` requires.
pub const AUTH_EMAIL_HEADER: &str = "x-auth-email";

/// Provider credentials, fixed for the lifetime of the process.
#[derive(Clone)]
pub struct Credentials {
    api_token: String,
    email: Option<String>,
}

impl Credentials {
    /// Token-only credentials.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            email: None,
        }
    }

    /// Attach an account email, sent as `X-Auth-Email` on every request.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Build the headers every provider request must carry.
    ///
    /// The bearer value is marked sensitive so it never shows up in
    /// debug output of the request.
    pub fn headers(&self) -> Result<HeaderMap> {
        if self.api_token.trim().is_empty() {
            return Err(DdnsError::Config("API token is empty".to_string()));
        }

        let mut headers = HeaderMap::new();

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_token))?;
        bearer.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, bearer);

        if let Some(email) = &self.email {
            headers.insert(
                HeaderName::from_static(AUTH_EMAIL_HEADER),
                HeaderValue::from_str(email)?,
            );
        }

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<REDACTED>")
            .field("email", &self.email)
            .finish()
    }
}
