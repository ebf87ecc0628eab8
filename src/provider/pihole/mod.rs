//! Pi-hole local DNS adapter: `A|AAAA|CNAME` only, no stable ids (Pi-hole's
//! custom DNS list is just `name content` pairs), no `proxied` support, no
//! native TTL (Pi-hole's local DNS entries don't carry one; the engine's
//! configured default is reported back unchanged).
//!
//! Grounded on the REST-session shape shared with the UniFi/DigitalOcean
//! adapters; ids are synthesized per the capability table via
//! `RecordId::synthesize_name_type_content`, since Pi-hole's API identifies
//! an entry by its `(domain, ip)` pair rather than an opaque id.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::provider::{EnsureOutcome, Provider, ProviderError, ProviderInfo, RecordChange};
use crate::types::{canonicalize_name, DesiredRecord, DnsRecord, RecordId, RecordType};

pub struct PiholeProvider {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
    default_ttl: u32,
}

impl PiholeProvider {
    pub fn new(base_url: String, api_token: String, default_ttl: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_token,
            default_ttl,
        }
    }

    fn endpoint(&self, kind: &str) -> String {
        format!("{}/api/config/dns/{}", self.base_url, kind)
    }

    fn kind_for(record_type: RecordType) -> Result<&'static str, ProviderError> {
        match record_type {
            RecordType::A | RecordType::Aaaa => Ok("hosts"),
            RecordType::Cname => Ok("cnameRecords"),
            other => Err(ProviderError::UnsupportedType(other)),
        }
    }

    async fn list(&self, kind: &str) -> Result<Vec<String>, ProviderError> {
        #[derive(Deserialize)]
        struct Envelope {
            config: std::collections::HashMap<String, serde_json::Value>,
        }
        let resp = self
            .http
            .get(self.endpoint(kind))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| ProviderError::TransientIo(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_to_error(status));
        }
        let envelope: Envelope = resp
            .json()
            .await
            .map_err(|e| ProviderError::Internal(e.to_string()))?;
        let entries = envelope
            .config
            .get(kind)
            .and_then(|v| v.as_array())
            .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default();
        Ok(entries)
    }

    async fn put(&self, kind: &str, entries: Vec<String>) -> Result<(), ProviderError> {
        let body = serde_json::json!({ "config": { kind: entries } });
        let resp = self
            .http
            .patch(format!("{}/api/config", self.base_url))
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::TransientIo(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(status_to_error(status))
        }
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

/// `"content name"` for host entries (Pi-hole's own order) or
/// `"alias,target"` for CNAME entries.
fn parse_entry(kind: &str, entry: &str) -> Option<(RecordType, String, String)> {
    if kind == "hosts" {
        let mut parts = entry.splitn(2, ' ');
        let content = parts.next()?.to_string();
        let name = parts.next()?.to_string();
        let rt = if content.contains(':') { RecordType::Aaaa } else { RecordType::A };
        Some((rt, name, content))
    } else {
        let mut parts = entry.splitn(2, ',');
        let name = parts.next()?.to_string();
        let content = parts.next()?.to_string();
        Some((RecordType::Cname, name, content))
    }
}

fn format_entry(record_type: RecordType, name: &str, content: &str) -> String {
    match record_type {
        RecordType::Cname => format!("{name},{content}"),
        _ => format!("{content} {name}"),
    }
}

#[async_trait]
impl Provider for PiholeProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "pihole",
            stable_ids: false,
            proxied: false,
            ttl_min: 0,
            ttl_max: 0,
            supported_types: &[RecordType::A, RecordType::Aaaa, RecordType::Cname],
            native_batch: false,
            supports_ownership_marker: false,
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.list("hosts").await.map(|_| ())
    }

    async fn refresh_record_cache(&self) -> Result<Vec<DnsRecord>, ProviderError> {
        let mut records = Vec::new();
        for kind in ["hosts", "cnameRecords"] {
            for entry in self.list(kind).await? {
                if let Some((rt, name, content)) = parse_entry(kind, &entry) {
                    let name = canonicalize_name(&name);
                    records.push(DnsRecord {
                        record_type: rt,
                        external_id: Some(RecordId::synthesize_name_type_content(&name, rt, &content)),
                        name,
                        content,
                        ttl: self.default_ttl,
                        proxied: None,
                        aux: Default::default(),
                    });
                }
            }
        }
        Ok(records)
    }

    async fn create_record(&self, input: DesiredRecord) -> Result<DnsRecord, ProviderError> {
        let record = input.record;
        let kind = Self::kind_for(record.record_type)?;
        let mut entries = self.list(kind).await?;
        entries.push(format_entry(record.record_type, &record.name, &record.content));
        self.put(kind, entries).await?;
        let id = RecordId::synthesize_name_type_content(&record.name, record.record_type, &record.content);
        Ok(DnsRecord {
            external_id: Some(id),
            ttl: self.default_ttl,
            ..record
        })
    }

    /// Pi-hole's custom DNS list has no update primitive either: remove the
    /// old entry (if still present) and append the new one.
    async fn update_record(
        &self,
        id: &RecordId,
        input: DesiredRecord,
    ) -> Result<DnsRecord, ProviderError> {
        self.delete_record(id).await?;
        self.create_record(input).await
    }

    async fn delete_record(&self, id: &RecordId) -> Result<bool, ProviderError> {
        for kind in ["hosts", "cnameRecords"] {
            let entries = self.list(kind).await?;
            let filtered: Vec<String> = entries
                .iter()
                .filter(|e| {
                    parse_entry(kind, e)
                        .map(|(rt, name, content)| {
                            RecordId::synthesize_name_type_content(&canonicalize_name(&name), rt, &content) != *id
                        })
                        .unwrap_or(true)
                })
                .cloned()
                .collect();
            if filtered.len() != entries.len() {
                self.put(kind, filtered).await?;
                return Ok(true);
            }
        }
        Ok(true)
    }

    async fn batch_ensure_records(&self, changes: Vec<RecordChange>) -> Vec<EnsureOutcome> {
        crate::provider::ensure_records_one_by_one(self, changes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_entry_roundtrips() {
        let entry = format_entry(RecordType::A, "app.example.com", "203.0.113.10");
        assert_eq!(entry, "203.0.113.10 app.example.com");
        let (rt, name, content) = parse_entry("hosts", &entry).unwrap();
        assert_eq!(rt, RecordType::A);
        assert_eq!(name, "app.example.com");
        assert_eq!(content, "203.0.113.10");
    }

    #[test]
    fn aaaa_detected_from_colon_in_content() {
        let entry = "2001:db8::1 app.example.com";
        let (rt, _, _) = parse_entry("hosts", entry).unwrap();
        assert_eq!(rt, RecordType::Aaaa);
    }

    #[test]
    fn cname_entry_roundtrips() {
        let entry = format_entry(RecordType::Cname, "alias.example.com", "target.example.com");
        assert_eq!(entry, "alias.example.com,target.example.com");
        let (rt, name, content) = parse_entry("cnameRecords", &entry).unwrap();
        assert_eq!(rt, RecordType::Cname);
        assert_eq!(name, "alias.example.com");
        assert_eq!(content, "target.example.com");
    }

    #[test]
    fn mx_is_unsupported() {
        assert!(matches!(PiholeProvider::kind_for(RecordType::Mx), Err(ProviderError::UnsupportedType(_))));
    }
}
