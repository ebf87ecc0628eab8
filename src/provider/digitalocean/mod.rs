//! DigitalOcean DNS adapter: stable numeric record ids, `A|AAAA|CNAME|NS|
//! MX|TXT|SRV` only, no `proxied` support.
//!
//! Grounded on the `stalwartlabs-dns-update` DigitalOcean provider (REST
//! CRUD against `api.digitalocean.com/v2/domains/<domain>/records`, a
//! `#[serde(tag = "type")]` record-data enum, record-id lookup by listing
//! and filtering on name) using `reqwest` rather than that crate's internal
//! HTTP client, and restructured around this engine's `Provider` trait
//! instead of per-call free functions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::provider::{EnsureOutcome, Provider, ProviderError, ProviderInfo, RecordChange};
use crate::types::{canonicalize_name, DesiredRecord, DnsRecord, RecordId, RecordType};

const API_BASE: &str = "https://api.digitalocean.com/v2";

pub struct DigitalOceanProvider {
    http: reqwest::Client,
    api_token: String,
    domain: String,
}

impl DigitalOceanProvider {
    pub fn new(api_token: String, domain: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_token,
            domain,
        }
    }

    fn subdomain<'a>(&self, fqdn: &'a str) -> &'a str {
        let fqdn = fqdn.trim_end_matches('.');
        fqdn.strip_suffix(&self.domain)
            .map(|s| s.trim_end_matches('.'))
            .filter(|s| !s.is_empty())
            .unwrap_or(fqdn)
    }

    async fn list_records(&self) -> Result<Vec<DomainRecord>, ProviderError> {
        let url = format!("{API_BASE}/domains/{}/records?per_page=200", self.domain);
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| ProviderError::TransientIo(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_to_error(status, &resp.text().await.unwrap_or_default()));
        }
        let body: ListDomainRecords = resp
            .json()
            .await
            .map_err(|e| ProviderError::Internal(e.to_string()))?;
        Ok(body.domain_records)
    }
}

#[derive(Deserialize)]
struct ListDomainRecords {
    domain_records: Vec<DomainRecord>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
struct DomainRecord {
    id: i64,
    ttl: u32,
    name: String,
    #[serde(flatten)]
    data: RecordData,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(tag = "type")]
#[allow(clippy::upper_case_acronyms)]
enum RecordData {
    A { data: String },
    AAAA { data: String },
    CNAME { data: String },
    NS { data: String },
    MX { data: String, priority: u16 },
    TXT { data: String },
    SRV { data: String, priority: u16, weight: u16, port: u16 },
}

impl RecordData {
    fn record_type(&self) -> RecordType {
        match self {
            RecordData::A { .. } => RecordType::A,
            RecordData::AAAA { .. } => RecordType::Aaaa,
            RecordData::CNAME { .. } => RecordType::Cname,
            RecordData::NS { .. } => RecordType::Ns,
            RecordData::MX { .. } => RecordType::Mx,
            RecordData::TXT { .. } => RecordType::Txt,
            RecordData::SRV { .. } => RecordType::Srv,
        }
    }

    fn content(&self) -> &str {
        match self {
            RecordData::A { data }
            | RecordData::AAAA { data }
            | RecordData::CNAME { data }
            | RecordData::NS { data }
            | RecordData::MX { data, .. }
            | RecordData::TXT { data }
            | RecordData::SRV { data, .. } => data,
        }
    }
}

fn from_desired(d: &DnsRecord) -> Result<RecordData, ProviderError> {
    Ok(match d.record_type {
        RecordType::A => RecordData::A { data: d.content.clone() },
        RecordType::Aaaa => RecordData::AAAA { data: d.content.clone() },
        RecordType::Cname => RecordData::CNAME { data: d.content.clone() },
        RecordType::Ns => RecordData::NS { data: d.content.clone() },
        RecordType::Mx => RecordData::MX {
            data: d.content.clone(),
            priority: d.aux.priority.unwrap_or(10),
        },
        RecordType::Txt => RecordData::TXT { data: d.content.clone() },
        RecordType::Srv => RecordData::SRV {
            data: d.content.clone(),
            priority: d.aux.priority.unwrap_or(10),
            weight: d.aux.weight.unwrap_or(1),
            port: d.aux.port.unwrap_or(0),
        },
        other => return Err(ProviderError::UnsupportedType(other)),
    })
}

fn status_to_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let msg = format!("[{status}] {body}");
    match status.as_u16() {
        401 | 403 => ProviderError::Auth(msg),
        429 => ProviderError::Quota(msg),
        404 => ProviderError::NotFound(msg),
        422 => ProviderError::Validation(msg),
        500..=599 => ProviderError::TransientIo(msg),
        _ => ProviderError::Internal(msg),
    }
}

#[async_trait]
impl Provider for DigitalOceanProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "digitalocean",
            stable_ids: true,
            proxied: false,
            ttl_min: 30,
            ttl_max: 2592000,
            supported_types: &[
                RecordType::A,
                RecordType::Aaaa,
                RecordType::Cname,
                RecordType::Ns,
                RecordType::Mx,
                RecordType::Txt,
                RecordType::Srv,
            ],
            native_batch: false,
            supports_ownership_marker: false,
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.list_records().await.map(|_| ())
    }

    async fn refresh_record_cache(&self) -> Result<Vec<DnsRecord>, ProviderError> {
        let records = self.list_records().await?;
        Ok(records
            .into_iter()
            .map(|r| DnsRecord {
                record_type: r.data.record_type(),
                name: format!("{}.{}", r.name, self.domain),
                content: r.data.content().to_string(),
                ttl: r.ttl,
                proxied: None,
                aux: Default::default(),
                external_id: Some(RecordId::External(r.id.to_string())),
            })
            .collect())
    }

    async fn create_record(&self, input: DesiredRecord) -> Result<DnsRecord, ProviderError> {
        let record = input.record;
        let data = from_desired(&record)?;
        let subdomain = self.subdomain(&record.name).to_string();
        let url = format!("{API_BASE}/domains/{}/records", self.domain);
        let body = serde_json::json!({ "type": record.record_type.to_string(), "name": subdomain, "ttl": record.ttl, "data": data_value(&data) });
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::TransientIo(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_to_error(status, &resp.text().await.unwrap_or_default()));
        }
        #[derive(Deserialize)]
        struct CreateResult {
            domain_record: DomainRecord,
        }
        let created: CreateResult = resp
            .json()
            .await
            .map_err(|e| ProviderError::Internal(e.to_string()))?;
        Ok(DnsRecord {
            record_type: created.domain_record.data.record_type(),
            name: format!("{}.{}", created.domain_record.name, self.domain),
            content: created.domain_record.data.content().to_string(),
            ttl: created.domain_record.ttl,
            proxied: None,
            aux: record.aux,
            external_id: Some(RecordId::External(created.domain_record.id.to_string())),
        })
    }

    async fn update_record(
        &self,
        id: &RecordId,
        input: DesiredRecord,
    ) -> Result<DnsRecord, ProviderError> {
        let record = input.record;
        let data = from_desired(&record)?;
        let subdomain = self.subdomain(&record.name).to_string();
        let url = format!("{API_BASE}/domains/{}/records/{}", self.domain, id.as_str());
        let body = serde_json::json!({ "name": subdomain, "ttl": record.ttl, "data": data_value(&data) });
        let resp = self
            .http
            .put(url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::TransientIo(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_to_error(status, &resp.text().await.unwrap_or_default()));
        }
        Ok(record)
    }

    async fn delete_record(&self, id: &RecordId) -> Result<bool, ProviderError> {
        let url = format!("{API_BASE}/domains/{}/records/{}", self.domain, id.as_str());
        let resp = self
            .http
            .delete(url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| ProviderError::TransientIo(e.to_string()))?;
        let status = resp.status();
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            return Ok(true);
        }
        Err(status_to_error(status, &resp.text().await.unwrap_or_default()))
    }

    async fn batch_ensure_records(&self, changes: Vec<RecordChange>) -> Vec<EnsureOutcome> {
        crate::provider::ensure_records_one_by_one(self, changes).await
    }
}

fn data_value(data: &RecordData) -> serde_json::Value {
    match serde_json::to_value(data) {
        Ok(serde_json::Value::Object(mut m)) => {
            m.remove("type");
            serde_json::Value::Object(m)
        }
        _ => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdomain_strips_domain_suffix() {
        let provider = DigitalOceanProvider::new("token".into(), "example.com".into());
        assert_eq!(provider.subdomain("app.example.com"), "app");
    }

    #[test]
    fn subdomain_of_apex_is_at_sign_equivalent_bare_name() {
        let provider = DigitalOceanProvider::new("token".into(), "example.com".into());
        assert_eq!(provider.subdomain("example.com"), "example.com");
    }

    #[test]
    fn caa_is_rejected_as_unsupported() {
        let rec = DnsRecord {
            record_type: RecordType::Caa,
            name: "example.com".into(),
            content: "0 issue \"letsencrypt.org\"".into(),
            ttl: 300,
            proxied: None,
            aux: Default::default(),
            external_id: None,
        };
        assert!(matches!(from_desired(&rec), Err(ProviderError::UnsupportedType(_))));
    }

    #[test]
    fn name_canonicalization_is_consistent_with_engine_rules() {
        assert_eq!(canonicalize_name("App.Example.com."), "app.example.com");
    }
}
