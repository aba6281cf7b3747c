//! External IPv4 discovery through public IP-echo services
//!
//! Sources are tried in order and the first answer that passes
//! [`is_valid_ipv4`] wins. A failing source is only logged; the next one is
//! tried.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::constants::EXTERNAL_IP_SOURCES;
use crate::error::{Error, Result};
use crate::transport::HttpTransport;
use crate::validation::is_valid_ipv4;

/// One IP-echo endpoint and the JSON key its answer is stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpSource {
    pub url: String,
    pub key: String,
}

impl IpSource {
    pub fn new(url: &str, key: &str) -> Self {
        Self {
            url: url.to_string(),
            key: key.to_string(),
        }
    }
}

/// The built-in source list, in priority order
pub fn default_sources() -> Vec<IpSource> {
    EXTERNAL_IP_SOURCES
        .iter()
        .map(|(url, key)| IpSource::new(url, key))
        .collect()
}

pub struct ExternalIpResolver {
    sources: Vec<IpSource>,
    transport: Arc<dyn HttpTransport>,
}

impl ExternalIpResolver {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_sources(transport, default_sources())
    }

    pub fn with_sources(transport: Arc<dyn HttpTransport>, sources: Vec<IpSource>) -> Self {
        Self { sources, transport }
    }

    /// Returns the current public IPv4 address, or `None` if no source produced one
    pub async fn resolve(&self) -> Option<String> {
        for source in &self.sources {
            match self.query(source).await {
                Ok(ip) => {
                    debug!("External IP {} from {}", ip, source.url);
                    return Some(ip);
                }
                Err(e) => warn!("IP source {} failed: {}", source.url, e),
            }
        }
        warn!("No IP source returned a valid IPv4 address");
        None
    }

    async fn query(&self, source: &IpSource) -> Result<String> {
        let body = self.transport.get(&source.url, &[]).await?;
        let json: serde_json::Value = serde_json::from_str(&body)?;
        let ip = json
            .get(&source.key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::ip_source(format!("no string field '{}'", source.key)))?;

        if !is_valid_ipv4(ip) {
            return Err(Error::ip_source(format!("not an IPv4 address: {:?}", ip)));
        }
        Ok(ip.to_string())
    }
}
