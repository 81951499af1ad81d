//! Delivery channels and the HTTP transport they send through.

pub mod hipchat;

use thiserror::Error;
use tracing::debug;

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Errors raised by a [`Transport`].
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Could not reach the server; worth retrying
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Any other failure while sending or reading the request
    #[error("Request failed: {0}")]
    Request(String),
}

impl TransportError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Classify a failure to send a request. Anything but a request that
    /// could not be built is a connection failure, including servers that
    /// hang up before sending a status line.
    fn from_send(e: &reqwest::Error) -> Self {
        if e.is_builder() {
            Self::Request(e.to_string())
        } else {
            Self::Connection(e.to_string())
        }
    }
}

/// Synchronous HTTP GET with query parameters.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, params: &[(String, String)]) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] backed by a blocking `reqwest` client.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, params: &[(String, String)]) -> Result<RawResponse, TransportError> {
        debug!(url, param_count = params.len(), "Sending GET request");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .map_err(|e| TransportError::from_send(&e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_connection_errors_retry() {
        assert!(TransportError::Connection("refused".into()).is_retryable());
        assert!(!TransportError::Request("bad body".into()).is_retryable());
    }
}
