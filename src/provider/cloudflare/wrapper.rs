#![cfg_attr(test, allow(dead_code))]
//! Thin wrapper around the blocking `cloudflare` client: pagination, zone
//! lookup by suffix, and a `FinderCache` that avoids a full zone+record list
//! scan for every single record lookup.
//!
//! Adapted from the teacher's `CloudflareWrapper` almost unchanged in shape;
//! extended with `update_record` (the teacher's NAT-helper use case never
//! updated an existing record's content, only created/deleted) and loosened
//! `find_record_endpoint` to match by name+type rather than name+content so
//! the reconciler can locate an existing record to update.

use cloudflare::{
    endpoints::{self},
    framework::{
        auth::Credentials,
        response::{ApiFailure, ApiResponse},
        Environment, HttpApiClient, HttpApiClientConfig,
    },
};

use crate::provider::ProviderError;
use crate::provider::cloudflare::util::record_type_of;
use crate::types::RecordType;

const CLOUDFLARE_ZONE_PAGE_SIZE: u8 = 50;
const CLOUDFLARE_RECORD_PAGE_SIZE: u16 = 5000;

pub struct CloudflareWrapper {
    client: HttpApiClient,
    cache: FinderCache,
}

impl CloudflareWrapper {
    fn paged_request<R>(
        &self,
        page_size: usize,
        request: &mut dyn FnMut(u32) -> ApiResponse<Vec<R>>,
    ) -> ApiResponse<Vec<R>> {
        let mut page_counter = 1;
        let mut response = request(page_counter)?;
        let mut current_size = response.result.len();

        while current_size >= page_size {
            page_counter += 1;
            match request(page_counter) {
                Ok(r) => {
                    current_size = r.result.len();
                    let mut previous_results = response.result;
                    response = r;
                    response.result.append(&mut previous_results);
                }
                Err(e) => match e {
                    ApiFailure::Error(code, _) => match code {
                        http::StatusCode::NOT_FOUND => return Ok(response),
                        _ => return Err(e),
                    },
                    ApiFailure::Invalid(e) => return Err(e.into()),
                },
            };
        }
        Ok(response)
    }

    pub fn list_zones(&self) -> ApiResponse<Vec<endpoints::zone::Zone>> {
        self.paged_request(
            CLOUDFLARE_ZONE_PAGE_SIZE.into(),
            &mut |page_counter: u32| {
                self.client.request(&endpoints::zone::ListZones {
                    params: endpoints::zone::ListZonesParams {
                        page: Some(page_counter),
                        per_page: Some(CLOUDFLARE_ZONE_PAGE_SIZE.into()),
                        ..Default::default()
                    },
                })
            },
        )
    }

    pub fn list_records(&self, zone_id: &str) -> ApiResponse<Vec<endpoints::dns::DnsRecord>> {
        self.paged_request(
            CLOUDFLARE_RECORD_PAGE_SIZE.into(),
            &mut |page_counter: u32| {
                self.client.request(&endpoints::dns::ListDnsRecords {
                    zone_identifier: zone_id,
                    params: endpoints::dns::ListDnsRecordsParams {
                        page: Some(page_counter),
                        per_page: Some(CLOUDFLARE_RECORD_PAGE_SIZE.into()),
                        ..Default::default()
                    },
                })
            },
        )
    }

    pub fn create_record(
        &self,
        zone_id: &str,
        name: &str,
        ttl: u32,
        proxied: Option<bool>,
        content: endpoints::dns::DnsContent,
    ) -> ApiResponse<endpoints::dns::DnsRecord> {
        self.client.request(&endpoints::dns::CreateDnsRecord {
            zone_identifier: zone_id,
            params: endpoints::dns::CreateDnsRecordParams {
                priority: None,
                ttl: Some(ttl),
                proxied,
                name,
                content,
            },
        })
    }

    pub fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        name: &str,
        ttl: u32,
        proxied: Option<bool>,
        content: endpoints::dns::DnsContent,
    ) -> ApiResponse<endpoints::dns::DnsRecord> {
        self.client.request(&endpoints::dns::UpdateDnsRecord {
            zone_identifier: zone_id,
            identifier: record_id,
            params: endpoints::dns::UpdateDnsRecordParams {
                ttl: Some(ttl),
                proxied,
                name,
                content,
            },
        })
    }

    pub fn delete_record(
        &self,
        zone_id: &str,
        record_id: &str,
    ) -> ApiResponse<endpoints::dns::DeleteDnsRecordResponse> {
        self.client.request(&endpoints::dns::DeleteDnsRecord {
            zone_identifier: zone_id,
            identifier: record_id,
        })
    }

    pub fn try_new(api_token: &str) -> Result<CloudflareWrapper, ProviderError> {
        let api = HttpApiClient::new(
            Credentials::UserAuthToken {
                token: api_token.into(),
            },
            HttpApiClientConfig::default(),
            Environment::Production,
        );

        match api {
            Ok(api) => {
                let mut wrapper = CloudflareWrapper {
                    client: api,
                    cache: FinderCache {
                        zones: Vec::new(),
                        records: Vec::new(),
                    },
                };
                let cache = FinderCache::try_new(&wrapper)?;
                wrapper.cache = cache;
                Ok(wrapper)
            }
            Err(e) => Err(ProviderError::Internal(e.to_string())),
        }
    }

    pub fn refresh_cache(&mut self) -> Result<(), ProviderError> {
        self.cache = FinderCache::try_new(self)?;
        Ok(())
    }

    pub fn find_zone_for_name(&self, fqdn: &str) -> Option<&endpoints::zone::Zone> {
        let fqdn = crate::types::canonicalize_name(fqdn);
        let mut zones = self
            .cache
            .zones
            .iter()
            .filter(|z| fqdn == z.name || fqdn.ends_with(&format!(".{}", z.name)))
            .collect::<Vec<_>>();
        zones.sort_by_key(|z| z.name.len());
        zones.pop()
    }

    pub fn cached_records(&self) -> &[endpoints::dns::DnsRecord] {
        &self.cache.records
    }

    pub fn find_record_by_name_type<'a>(
        &'a self,
        name: &str,
        ty: RecordType,
    ) -> Option<&'a endpoints::dns::DnsRecord> {
        let name = crate::types::canonicalize_name(name);
        self.cache
            .records
            .iter()
            .find(|r| crate::types::canonicalize_name(&r.name) == name && record_type_of(&r.content) == ty)
    }
}

/// Avoids a full zone+record list scan for every single record lookup;
/// populated once on construction and refreshed on demand.
struct FinderCache {
    zones: Vec<endpoints::zone::Zone>,
    records: Vec<endpoints::dns::DnsRecord>,
}
impl FinderCache {
    fn try_new(wrapper: &CloudflareWrapper) -> Result<FinderCache, ProviderError> {
        let zones = wrapper.list_zones()?.result;

        let records = zones
            .iter()
            .map(|z| wrapper.list_records(&z.id))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flat_map(|f| f.result)
            .collect::<Vec<endpoints::dns::DnsRecord>>();
        Ok(FinderCache { zones, records })
    }
}
