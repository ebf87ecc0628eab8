//! UniFi Network controller DNS adapter: cookie-session auth, no update
//! primitive (delete-then-create with a settle delay and a duplicate
//! sweep), `A|AAAA|CNAME|MX|NS|SRV|TXT` only, no `proxied` support.
//!
//! Grounded on the REST-session pattern of the other HTTP adapters in this
//! module tree (`reqwest` with a shared client holding the session
//! cookie-jar); the delete-then-create-with-settle-delay behavior follows
//! the tunable documented as an open question.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::provider::{EnsureOutcome, Provider, ProviderError, ProviderInfo, RecordChange};
use crate::types::{canonicalize_name, DesiredRecord, DnsRecord, RecordId, RecordType};

/// Minimum delay between the delete and the create half of an "update",
/// per the tunable documented as an open question: implementations default
/// to >=100ms and verify via a duplicate sweep rather than trusting the
/// delay alone.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(150);

pub struct UnifiProvider {
    http: reqwest::Client,
    base_url: String,
    site: String,
    settle_delay: Duration,
}

impl UnifiProvider {
    pub fn new(base_url: String, site: String, settle_delay: Duration) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(false)
            .build()
            .map_err(|e| ProviderError::Internal(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            site,
            settle_delay,
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), ProviderError> {
        let resp = self
            .http
            .post(format!("{}/api/login", self.base_url))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|e| ProviderError::TransientIo(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ProviderError::Auth(format!("login failed: {}", resp.status())));
        }
        Ok(())
    }

    fn records_url(&self) -> String {
        format!("{}/v2/api/site/{}/static-dns", self.base_url, self.site)
    }

    async fn list(&self) -> Result<Vec<UnifiRecord>, ProviderError> {
        let resp = self
            .http
            .get(self.records_url())
            .send()
            .await
            .map_err(|e| ProviderError::TransientIo(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_to_error(status));
        }
        resp.json()
            .await
            .map_err(|e| ProviderError::Internal(e.to_string()))
    }
}

fn status_to_error(status: reqwest::StatusCode) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::Auth(status.to_string()),
        429 => ProviderError::Quota(status.to_string()),
        404 => ProviderError::NotFound(status.to_string()),
        500..=599 => ProviderError::TransientIo(status.to_string()),
        _ => ProviderError::Internal(status.to_string()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UnifiRecord {
    #[serde(rename = "_id")]
    id: Option<String>,
    key: String,
    record_type: String,
    value: String,
    ttl: Option<u32>,
    enabled: Option<bool>,
}

fn to_unifi_type(t: RecordType) -> Result<&'static str, ProviderError> {
    Ok(match t {
        RecordType::A => "A",
        RecordType::Aaaa => "AAAA",
        RecordType::Cname => "CNAME",
        RecordType::Mx => "MX",
        RecordType::Ns => "NS",
        RecordType::Srv => "SRV",
        RecordType::Txt => "TXT",
        other => return Err(ProviderError::UnsupportedType(other)),
    })
}

fn from_unifi_type(t: &str) -> RecordType {
    match t {
        "A" => RecordType::A,
        "AAAA" => RecordType::Aaaa,
        "CNAME" => RecordType::Cname,
        "MX" => RecordType::Mx,
        "NS" => RecordType::Ns,
        "SRV" => RecordType::Srv,
        _ => RecordType::Txt,
    }
}

#[async_trait]
impl Provider for UnifiProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "unifi",
            stable_ids: true,
            proxied: false,
            ttl_min: 0,
            ttl_max: 86400,
            supported_types: &[
                RecordType::A,
                RecordType::Aaaa,
                RecordType::Cname,
                RecordType::Mx,
                RecordType::Ns,
                RecordType::Srv,
                RecordType::Txt,
            ],
            native_batch: false,
            supports_ownership_marker: false,
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.list().await.map(|_| ())
    }

    async fn refresh_record_cache(&self) -> Result<Vec<DnsRecord>, ProviderError> {
        let records = self.list().await?;
        Ok(records
            .into_iter()
            .map(|r| DnsRecord {
                record_type: from_unifi_type(&r.record_type),
                name: canonicalize_name(&r.key),
                content: r.value,
                ttl: r.ttl.unwrap_or(0),
                proxied: None,
                aux: Default::default(),
                external_id: r.id.map(RecordId::External),
            })
            .collect())
    }

    async fn create_record(&self, input: DesiredRecord) -> Result<DnsRecord, ProviderError> {
        let record = input.record;
        let unifi_type = to_unifi_type(record.record_type)?;
        let body = UnifiRecord {
            id: None,
            key: record.name.clone(),
            record_type: unifi_type.to_string(),
            value: record.content.clone(),
            ttl: Some(record.ttl),
            enabled: Some(true),
        };
        let resp = self
            .http
            .post(self.records_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::TransientIo(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_to_error(status));
        }
        let created: UnifiRecord = resp
            .json()
            .await
            .map_err(|e| ProviderError::Internal(e.to_string()))?;
        Ok(DnsRecord {
            external_id: created.id.map(RecordId::External),
            ..record
        })
    }

    /// UniFi has no update primitive: delete then create, with a settle
    /// delay so the controller's own propagation doesn't produce a
    /// duplicate, followed by a sweep that removes any duplicate it does.
    async fn update_record(
        &self,
        id: &RecordId,
        input: DesiredRecord,
    ) -> Result<DnsRecord, ProviderError> {
        self.delete_record(id).await?;
        tokio::time::sleep(self.settle_delay).await;
        let created = self.create_record(input.clone()).await?;

        let existing = self.list().await?;
        let name = canonicalize_name(&input.record.name);
        let dupes: Vec<&UnifiRecord> = existing
            .iter()
            .filter(|r| canonicalize_name(&r.key) == name && from_unifi_type(&r.record_type) == input.record.record_type)
            .collect();
        if dupes.len() > 1 {
            for extra in dupes.iter().skip(1) {
                if let Some(extra_id) = &extra.id {
                    let _ = self.delete_record(&RecordId::External(extra_id.clone())).await;
                }
            }
        }
        Ok(created)
    }

    async fn delete_record(&self, id: &RecordId) -> Result<bool, ProviderError> {
        let url = format!("{}/{}", self.records_url(), id.as_str());
        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| ProviderError::TransientIo(e.to_string()))?;
        let status = resp.status();
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            return Ok(true);
        }
        Err(status_to_error(status))
    }

    async fn batch_ensure_records(&self, changes: Vec<RecordChange>) -> Vec<EnsureOutcome> {
        crate::provider::ensure_records_one_by_one(self, changes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caa_is_unsupported() {
        assert!(matches!(to_unifi_type(RecordType::Caa), Err(ProviderError::UnsupportedType(_))));
    }

    #[test]
    fn default_settle_delay_meets_minimum_tunable() {
        assert!(DEFAULT_SETTLE_DELAY >= Duration::from_millis(100));
    }

    #[test]
    fn type_roundtrips_through_unifi_wire_strings() {
        for t in [RecordType::A, RecordType::Aaaa, RecordType::Cname, RecordType::Mx, RecordType::Ns, RecordType::Srv, RecordType::Txt] {
            let wire = to_unifi_type(t).unwrap();
            assert_eq!(from_unifi_type(wire), t);
        }
    }
}
