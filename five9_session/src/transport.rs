//! HTTP delivery of SOAP requests.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use crate::credentials::Credentials;
use crate::errors::SessionError;

#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Sends requests on behalf of a session.
///
/// Implementations authenticate with HTTP basic auth using the given
/// credentials. A non-success status is not an error at this level; the
/// body may hold a SOAP fault.
pub trait Transport {
    fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &str,
        credentials: &Credentials,
    ) -> Result<TransportResponse, SessionError>;

    fn get(&self, url: &str, credentials: &Credentials) -> Result<TransportResponse, SessionError>;
}

/// Blocking HTTP transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new() -> Result<Self, SessionError> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, SessionError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &str,
        credentials: &Credentials,
    ) -> Result<TransportResponse, SessionError> {
        let mut request = self
            .client
            .post(url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .body(body.to_string());
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send()?;
        let status = response.status().as_u16();
        debug!("POST {} -> {}", url, status);
        Ok(TransportResponse {
            status,
            body: response.text()?,
        })
    }

    fn get(&self, url: &str, credentials: &Credentials) -> Result<TransportResponse, SessionError> {
        let response = self
            .client
            .get(url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()?;
        let status = response.status().as_u16();
        debug!("GET {} -> {}", url, status);
        Ok(TransportResponse {
            status,
            body: response.text()?,
        })
    }
}
