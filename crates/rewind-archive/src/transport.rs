use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Get,
    Head,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// HTTP seam used by the lister and the availability checker.
pub trait ArchiveTransport {
    fn fetch_text(&self, url: &str) -> Result<HttpResponse, TransportError>;

    /// Issues a request and reports only the status code; the body is discarded unread.
    fn probe(&self, url: &str, method: ProbeMethod) -> Result<u16, TransportError>;
}

impl<T: ArchiveTransport + ?Sized> ArchiveTransport for &T {
    fn fetch_text(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).fetch_text(url)
    }

    fn probe(&self, url: &str, method: ProbeMethod) -> Result<u16, TransportError> {
        (**self).probe(url, method)
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rewind/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| TransportError::new(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }
}

impl ArchiveTransport for HttpTransport {
    fn fetch_text(&self, url: &str) -> Result<HttpResponse, TransportError> {
        tracing::debug!(url, "GET directory index");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| TransportError::new(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| TransportError::new(format!("failed to read response: {err}")))?;
        Ok(HttpResponse { status, body })
    }

    fn probe(&self, url: &str, method: ProbeMethod) -> Result<u16, TransportError> {
        tracing::debug!(url, ?method, "probe");
        let request = match method {
            ProbeMethod::Get => self.client.get(url),
            ProbeMethod::Head => self.client.head(url),
        };
        let response = request
            .send()
            .map_err(|err| TransportError::new(err.to_string()))?;
        Ok(response.status().as_u16())
    }
}
