//! Cloudflare Tunnel ingress-rule adapter: reconciled separately from DNS
//! records (see the tunnel reconciler), since a tunnel's ingress list is one
//! ordered document per tunnel rather than a set of independently
//! addressable records.
//!
//! The `cloudflare` crate's typed `endpoints` module has no tunnel
//! configuration support, so this adapter talks to the REST API directly
//! with `reqwest`, the same way the DigitalOcean/UniFi/Pi-hole adapters do.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::provider::ProviderError;

const API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// One entry in a tunnel's ordered ingress rule list. The final rule in a
/// valid configuration always has `hostname: None` (the catch-all).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    pub hostname: Option<String>,
    pub service: String,
    pub path: Option<String>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TunnelProvider: Send + Sync {
    async fn get_ingress(&self, tunnel_id: &str) -> Result<Vec<IngressRule>, ProviderError>;
    async fn set_ingress(&self, tunnel_id: &str, rules: Vec<IngressRule>) -> Result<(), ProviderError>;
}

pub struct CloudflareTunnelProvider {
    http: reqwest::Client,
    api_token: String,
    account_id: String,
}

impl CloudflareTunnelProvider {
    pub fn try_new(api_token: String, account_id: String) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::Internal(e.to_string()))?;
        Ok(Self {
            http,
            api_token,
            account_id,
        })
    }

    fn configuration_url(&self, tunnel_id: &str) -> String {
        format!(
            "{API_BASE}/accounts/{}/cfd_tunnel/{tunnel_id}/configurations",
            self.account_id
        )
    }
}

#[derive(Deserialize)]
struct ConfigEnvelope {
    result: ConfigResult,
    success: bool,
    errors: Vec<ApiError>,
}
#[derive(Deserialize)]
struct ConfigResult {
    config: TunnelConfig,
}
#[derive(Serialize, Deserialize)]
struct TunnelConfig {
    ingress: Vec<IngressRule>,
}
#[derive(Deserialize)]
struct ApiError {
    code: u32,
    message: String,
}

fn taxonomy_from_status_and_errors(status: reqwest::StatusCode, errors: &[ApiError]) -> ProviderError {
    let msg = errors
        .iter()
        .map(|e| format!("[{}] {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    match status.as_u16() {
        401 | 403 => ProviderError::Auth(msg),
        429 => ProviderError::Quota(msg),
        404 => ProviderError::NotFound(msg),
        500..=599 => ProviderError::TransientIo(msg),
        _ => ProviderError::Internal(msg),
    }
}

#[async_trait]
impl TunnelProvider for CloudflareTunnelProvider {
    async fn get_ingress(&self, tunnel_id: &str) -> Result<Vec<IngressRule>, ProviderError> {
        let resp = self
            .http
            .get(self.configuration_url(tunnel_id))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| ProviderError::TransientIo(e.to_string()))?;
        let status = resp.status();
        let envelope: ConfigEnvelope = resp
            .json()
            .await
            .map_err(|e| ProviderError::Internal(e.to_string()))?;
        if !envelope.success {
            return Err(taxonomy_from_status_and_errors(status, &envelope.errors));
        }
        Ok(envelope.result.config.ingress)
    }

    async fn set_ingress(&self, tunnel_id: &str, rules: Vec<IngressRule>) -> Result<(), ProviderError> {
        let body = serde_json::json!({ "config": { "ingress": rules } });
        let resp = self
            .http
            .put(self.configuration_url(tunnel_id))
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::TransientIo(e.to_string()))?;
        let status = resp.status();
        let envelope: ConfigEnvelope = resp
            .json()
            .await
            .map_err(|e| ProviderError::Internal(e.to_string()))?;
        if !envelope.success {
            return Err(taxonomy_from_status_and_errors(status, &envelope.errors));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingress_rules_carry_optional_catch_all_hostname() {
        let catch_all = IngressRule {
            hostname: None,
            service: "http_status:404".into(),
            path: None,
        };
        assert!(catch_all.hostname.is_none());
    }

    #[test]
    fn taxonomy_maps_auth_and_quota_status_codes() {
        let auth = taxonomy_from_status_and_errors(reqwest::StatusCode::FORBIDDEN, &[]);
        assert!(matches!(auth, ProviderError::Auth(_)));
        let quota = taxonomy_from_status_and_errors(reqwest::StatusCode::TOO_MANY_REQUESTS, &[]);
        assert!(matches!(quota, ProviderError::Quota(_)));
    }
}
