//! Public IP discovery
//!
//! Fetches this host's public address from plain-text echo services, one
//! per address family, so an `A` run never reports an IPv6 address and vice
//! versa.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::constants::HETZNAME_USER_AGENT;
use crate::error::{Result, TransportError};
use crate::types::RecordType;
use crate::validation::is_publishable_ip;

/// Source of the address a record should point at
#[async_trait]
pub trait PublicIpProvider: Send + Sync {
    async fn current(&self, record_type: RecordType) -> Result<IpAddr>;
}

/// Address given explicitly on the command line
#[derive(Debug, Clone, Copy)]
pub struct FixedIp(pub IpAddr);

#[async_trait]
impl PublicIpProvider for FixedIp {
    async fn current(&self, _record_type: RecordType) -> Result<IpAddr> {
        Ok(self.0)
    }
}

/// HTTP echo-service discovery
pub struct HttpIpProvider {
    ipv4_url: String,
    ipv6_url: String,
    client: reqwest::Client,
}

impl HttpIpProvider {
    pub fn new(ipv4_url: &str, ipv6_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(HETZNAME_USER_AGENT)
            .build()
            .map_err(|source| TransportError::Network {
                path: ipv4_url.to_string(),
                source,
            })?;

        Ok(Self {
            ipv4_url: ipv4_url.to_string(),
            ipv6_url: ipv6_url.to_string(),
            client,
        })
    }

    fn url_for(&self, record_type: RecordType) -> &str {
        match record_type {
            RecordType::A => &self.ipv4_url,
            RecordType::AAAA => &self.ipv6_url,
        }
    }
}

#[async_trait]
impl PublicIpProvider for HttpIpProvider {
    async fn current(&self, record_type: RecordType) -> Result<IpAddr> {
        let url = self.url_for(record_type);
        debug!("GET {}", url);

        let network = |source: reqwest::Error| TransportError::Network {
            path: url.to_string(),
            source,
        };
        let resp = self.client.get(url).send().await.map_err(network)?;
        let status = resp.status();
        let text = resp.text().await.map_err(network)?;

        if !status.is_success() {
            return Err(TransportError::Http {
                path: url.to_string(),
                status: status.as_u16(),
                message: text.trim().to_string(),
            }
            .into());
        }

        let ip = parse_ip_response(url, &text, record_type)?;
        debug!("Public {} address: {}", record_type, ip);
        Ok(ip)
    }
}

/// Interprets an echo-service body as an address for `record_type`
fn parse_ip_response(url: &str, text: &str, record_type: RecordType) -> Result<IpAddr> {
    let text = text.trim();
    let ip: IpAddr = text
        .parse()
        .map_err(|_| TransportError::parse(url, format!("'{}' is not an IP address", text)))?;

    if !record_type.accepts(&ip) {
        return Err(TransportError::parse(
            url,
            format!("expected an address for a {} record, got {}", record_type, ip),
        )
        .into());
    }
    if !is_publishable_ip(&ip) {
        return Err(TransportError::parse(url, format!("{} is not a public address", ip)).into());
    }
    Ok(ip)
}
