//! HTTP transport used by the PDD client and the external IP resolver
//!
//! Uses reqwest with rustls for HTTP requests. The trait exists so both
//! callers can be driven by in-memory fakes in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::constants::USER_AGENT;
use crate::error::{Error, Result};

/// Minimal request surface needed by yadns
///
/// Both calls return the raw response body; JSON decoding and envelope
/// checks belong to the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issues a GET request with the given extra headers
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String>;

    /// Issues a POST with an `application/x-www-form-urlencoded` body
    async fn post_form(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        form: &[(String, String)],
    ) -> Result<String>;
}

//==============================================================================
// Reqwest transport
//==============================================================================

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::network(format!("build reqwest client: {}", e)))?;

        Ok(Self { client })
    }

    async fn read_body(resp: reqwest::Response) -> Result<String> {
        check_status(resp.status())?;
        Ok(resp.text().await?)
    }
}

/// Maps HTTP statuses that carry no usable body to transport errors
///
/// Other 4xx answers are passed through: PDD reports its own failures in
/// the envelope, whatever the status line says.
fn check_status(status: StatusCode) -> Result<()> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::network("Rate limited"));
    }
    if status.is_server_error() {
        return Err(Error::network(format!("Server error: {}", status.as_u16())));
    }
    if status == StatusCode::NOT_FOUND {
        return Err(Error::network("Endpoint not found (404)"));
    }
    Ok(())
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
        debug!("GET {}", url);
        let mut req = self.client.get(url);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let resp = req.send().await?;
        Self::read_body(resp).await
    }

    async fn post_form(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        form: &[(String, String)],
    ) -> Result<String> {
        debug!("POST {}", url);
        let mut req = self.client.post(url).form(form);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let resp = req.send().await?;
        Self::read_body(resp).await
    }
}
