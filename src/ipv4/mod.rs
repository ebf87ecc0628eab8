//! Public-IP resolver collaborator: the thing container/router labels mean
//! when they ask for "my public address" rather than a literal content
//! value. Every resolver variant is just a different way of answering
//! "what is this host's IPv4/IPv6 address right now".
//!
//! Adapted from the teacher's `ipv4source` module: same `Ipv4Source`-style
//! one-method trait and `FixedSource`/`HostnameSource` pair, generalized to
//! a dual v4/v6 trait and extended with an HTTP echo-service resolver (the
//! way most reconcilers discover their own public address when nothing in
//! the environment already states it) using `reqwest`, already part of the
//! stack for the REST-based provider adapters.

use std::fmt::Display;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use dnsclient::{sync::DNSClient, UpstreamServer};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolveError {
    msg: String,
}
impl Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.msg)
    }
}
impl std::error::Error for ResolveError {}
impl From<String> for ResolveError {
    fn from(s: String) -> Self {
        ResolveError { msg: s }
    }
}

/// Resolves this host's current public address. Implementations may cache
/// internally; callers needing a fresh lookup call the method again.
#[async_trait::async_trait]
pub trait PublicIpResolver: Send + Sync {
    async fn resolve_v4(&self) -> Result<Ipv4Addr, ResolveError>;
    async fn resolve_v6(&self) -> Result<Ipv6Addr, ResolveError>;
}

/// Always returns the same configured addresses. Used in tests and for
/// deployments where the public address never changes (a static WAN IP).
#[derive(Debug, Clone, Copy)]
pub struct FixedResolver {
    v4: Option<Ipv4Addr>,
    v6: Option<Ipv6Addr>,
}
impl FixedResolver {
    pub fn new(v4: Option<Ipv4Addr>, v6: Option<Ipv6Addr>) -> Self {
        Self { v4, v6 }
    }
}
#[async_trait::async_trait]
impl PublicIpResolver for FixedResolver {
    async fn resolve_v4(&self) -> Result<Ipv4Addr, ResolveError> {
        self.v4
            .ok_or_else(|| ResolveError::from("no fixed IPv4 address configured".to_string()))
    }
    async fn resolve_v6(&self) -> Result<Ipv6Addr, ResolveError> {
        self.v6
            .ok_or_else(|| ResolveError::from("no fixed IPv6 address configured".to_string()))
    }
}

/// Resolves an A/AAAA record for `hostname` against explicit resolvers and
/// treats the first answer as this host's address - useful behind split-horizon
/// DNS setups where a dynamic-DNS hostname already tracks the WAN address.
///
/// Returns the first record found; round-robin DNS answers are therefore not
/// disambiguated (same caveat the teacher's `HostnameSource` documents).
pub struct HostnameResolver {
    hostname: String,
    servers: Vec<SocketAddr>,
}
impl HostnameResolver {
    pub fn new(hostname: String, servers: Vec<SocketAddr>) -> Self {
        Self { hostname, servers }
    }

    fn client(&self) -> DNSClient {
        DNSClient::new(self.servers.iter().copied().map(UpstreamServer::new).collect())
    }
}
#[async_trait::async_trait]
impl PublicIpResolver for HostnameResolver {
    async fn resolve_v4(&self) -> Result<Ipv4Addr, ResolveError> {
        let hostname = self.hostname.clone();
        let client = self.client();
        tokio::task::spawn_blocking(move || match client.query_a(&hostname) {
            Ok(addrs) => addrs
                .into_iter()
                .next()
                .ok_or_else(|| ResolveError::from(format!("no A record found for {hostname}"))),
            Err(e) => Err(ResolveError::from(e.to_string())),
        })
        .await
        .map_err(|e| ResolveError::from(e.to_string()))?
    }

    async fn resolve_v6(&self) -> Result<Ipv6Addr, ResolveError> {
        let hostname = self.hostname.clone();
        let client = self.client();
        tokio::task::spawn_blocking(move || match client.query_aaaa(&hostname) {
            Ok(addrs) => addrs
                .into_iter()
                .next()
                .ok_or_else(|| ResolveError::from(format!("no AAAA record found for {hostname}"))),
            Err(e) => Err(ResolveError::from(e.to_string())),
        })
        .await
        .map_err(|e| ResolveError::from(e.to_string()))?
    }
}

/// Asks a public echo service (e.g. `https://api.ipify.org`) what address it
/// saw the request arrive from. The default URLs answer plain text with just
/// the address, which is what most such services return.
pub struct HttpResolver {
    http: reqwest::Client,
    v4_url: String,
    v6_url: String,
}
impl HttpResolver {
    pub fn new(v4_url: impl Into<String>, v6_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            v4_url: v4_url.into(),
            v6_url: v6_url.into(),
        }
    }
}
#[async_trait::async_trait]
impl PublicIpResolver for HttpResolver {
    async fn resolve_v4(&self) -> Result<Ipv4Addr, ResolveError> {
        let body = self
            .http
            .get(&self.v4_url)
            .send()
            .await
            .map_err(|e| ResolveError::from(e.to_string()))?
            .text()
            .await
            .map_err(|e| ResolveError::from(e.to_string()))?;
        body.trim()
            .parse()
            .map_err(|e| ResolveError::from(format!("invalid IPv4 response `{}`: {e}", body.trim())))
    }

    async fn resolve_v6(&self) -> Result<Ipv6Addr, ResolveError> {
        let body = self
            .http
            .get(&self.v6_url)
            .send()
            .await
            .map_err(|e| ResolveError::from(e.to_string()))?
            .text()
            .await
            .map_err(|e| ResolveError::from(e.to_string()))?;
        body.trim()
            .parse()
            .map_err(|e| ResolveError::from(format!("invalid IPv6 response `{}`: {e}", body.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_resolver_returns_configured_v4() {
        let resolver = FixedResolver::new(Some(Ipv4Addr::new(203, 0, 113, 10)), None);
        assert_eq!(resolver.resolve_v4().await.unwrap(), Ipv4Addr::new(203, 0, 113, 10));
    }

    #[tokio::test]
    async fn fixed_resolver_errors_when_v6_unset() {
        let resolver = FixedResolver::new(Some(Ipv4Addr::new(203, 0, 113, 10)), None);
        assert!(resolver.resolve_v6().await.is_err());
    }
}
