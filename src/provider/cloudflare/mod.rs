//! Cloudflare DNS adapter: stable external ids, proxied records, TTL
//! suspended while proxied, and an ownership-marker comment on every
//! engine-created record.
//!
//! Adapted from the teacher's Cloudflare provider wiring in
//! `bin/clouddns-nat-helper.rs` (`spawn_blocking` around the synchronous
//! `cloudflare` crate client, since that crate has no async API).

pub mod tunnel;
mod util;
mod wrapper;

use async_trait::async_trait;

use crate::provider::{EnsureOutcome, Provider, ProviderError, ProviderInfo, RecordChange};
use crate::types::{DesiredRecord, DnsRecord, RecordId, RecordType};
use wrapper::CloudflareWrapper;

/// Comment placed on every record this engine creates, so a human staring at
/// the Cloudflare dashboard can tell it's managed here. Mirrors the
/// TXT-registry marker idea from the single-provider predecessor of this
/// engine, moved onto the native `comment` field Cloudflare now offers.
pub const OWNERSHIP_MARKER: &str = "managed-by: dns-reconciler";

pub struct CloudflareProvider {
    wrapper: tokio::sync::Mutex<CloudflareWrapper>,
    proxied_default: bool,
}

impl CloudflareProvider {
    pub fn try_new(api_token: String, proxied_default: bool) -> Result<Self, ProviderError> {
        let wrapper = CloudflareWrapper::try_new(&api_token)?;
        Ok(Self {
            wrapper: tokio::sync::Mutex::new(wrapper),
            proxied_default,
        })
    }
}

#[async_trait]
impl Provider for CloudflareProvider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "cloudflare",
            stable_ids: true,
            proxied: true,
            ttl_min: 60,
            ttl_max: 86400,
            supported_types: &[
                RecordType::A,
                RecordType::Aaaa,
                RecordType::Cname,
                RecordType::Mx,
                RecordType::Ns,
                RecordType::Txt,
                RecordType::Srv,
            ],
            native_batch: false,
            supports_ownership_marker: true,
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let wrapper = self.wrapper.lock().await;
        tokio::task::block_in_place(|| wrapper.list_zones())
            .map(|_| ())
            .map_err(ProviderError::from)
    }

    async fn refresh_record_cache(&self) -> Result<Vec<DnsRecord>, ProviderError> {
        let mut wrapper = self.wrapper.lock().await;
        tokio::task::block_in_place(|| wrapper.refresh_cache())?;
        let records = wrapper
            .cached_records()
            .iter()
            .filter_map(|r| util::try_record_from_api(r).ok())
            .collect();
        Ok(records)
    }

    async fn create_record(&self, input: DesiredRecord) -> Result<DnsRecord, ProviderError> {
        let wrapper = self.wrapper.lock().await;
        let record = with_default_proxied(input.record, self.proxied_default);
        let zone = tokio::task::block_in_place(|| wrapper.find_zone_for_name(&record.name))
            .ok_or_else(|| ProviderError::OutOfZone(record.name.clone()))?;
        let zone_id = zone.id.clone();
        let content = util::to_api_content(&record)?;
        let api_record = tokio::task::block_in_place(|| {
            wrapper.create_record(&zone_id, &record.name, record.ttl, record.proxied, content)
        })
        .map_err(ProviderError::from)?
        .result;
        util::try_record_from_api(&api_record).map_err(ProviderError::Internal)
    }

    async fn update_record(
        &self,
        id: &RecordId,
        input: DesiredRecord,
    ) -> Result<DnsRecord, ProviderError> {
        let wrapper = self.wrapper.lock().await;
        let record = with_default_proxied(input.record, self.proxied_default);
        let zone = tokio::task::block_in_place(|| wrapper.find_zone_for_name(&record.name))
            .ok_or_else(|| ProviderError::OutOfZone(record.name.clone()))?;
        let zone_id = zone.id.clone();
        let content = util::to_api_content(&record)?;
        let api_record = tokio::task::block_in_place(|| {
            wrapper.update_record(
                &zone_id,
                id.as_str(),
                &record.name,
                record.ttl,
                record.proxied,
                content,
            )
        })
        .map_err(ProviderError::from)?
        .result;
        util::try_record_from_api(&api_record).map_err(ProviderError::Internal)
    }

    async fn delete_record(&self, id: &RecordId) -> Result<bool, ProviderError> {
        let wrapper = self.wrapper.lock().await;
        let record = tokio::task::block_in_place(|| {
            wrapper
                .cached_records()
                .iter()
                .find(|r| r.id == id.as_str())
                .cloned()
        });
        let Some(record) = record else {
            return Ok(true);
        };
        let zone = tokio::task::block_in_place(|| wrapper.find_zone_for_name(&record.name))
            .ok_or_else(|| ProviderError::OutOfZone(record.name.clone()))?;
        let zone_id = zone.id.clone();
        match tokio::task::block_in_place(|| wrapper.delete_record(&zone_id, id.as_str())) {
            Ok(_) => Ok(true),
            Err(e) => {
                let err = ProviderError::from(e);
                if matches!(err, ProviderError::NotFound(_)) {
                    Ok(true)
                } else {
                    Err(err)
                }
            }
        }
    }

    async fn batch_ensure_records(&self, changes: Vec<RecordChange>) -> Vec<EnsureOutcome> {
        crate::provider::ensure_records_one_by_one(self, changes).await
    }
}

fn with_default_proxied(mut record: DnsRecord, proxied_default: bool) -> DnsRecord {
    if record.proxied.is_none() && matches!(record.record_type, RecordType::A | RecordType::Aaaa) {
        record.proxied = Some(proxied_default);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordAux;

    #[test]
    fn default_proxied_only_applies_to_a_and_aaaa() {
        let cname = DnsRecord {
            record_type: RecordType::Cname,
            name: "alias.example.com".into(),
            content: "target.example.com".into(),
            ttl: 300,
            proxied: None,
            aux: RecordAux::default(),
            external_id: None,
        };
        let out = with_default_proxied(cname, true);
        assert_eq!(out.proxied, None);
    }

    #[test]
    fn default_proxied_fills_in_unset_a_record() {
        let a = DnsRecord {
            record_type: RecordType::A,
            name: "app.example.com".into(),
            content: "203.0.113.10".into(),
            ttl: 300,
            proxied: None,
            aux: RecordAux::default(),
            external_id: None,
        };
        let out = with_default_proxied(a, true);
        assert_eq!(out.proxied, Some(true));
    }
}
