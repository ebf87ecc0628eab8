//! Per-provider, per-zone snapshot of DNS records with a freshness policy.
//!
//! Grounded on the teacher's `CloudflareWrapper`/`FinderCache` pattern
//! (`provider/cloudflare/wrapper.rs`): a flat `Vec<DnsRecord>` rebuilt from
//! the provider, plus fast lookup by identity. The cache itself performs no
//! I/O; [`RecordCache::refresh`] is driven by the reconciler via whatever
//! closure fetches the provider's current records.

use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::types::{canonicalize_name, DnsRecord, RecordId, RecordType};

/// Per-provider, per-zone record snapshot.
pub struct RecordCache {
    zone: String,
    records: Vec<DnsRecord>,
    last_updated: Option<Instant>,
    freshness_horizon: Duration,
}

impl RecordCache {
    pub fn new(zone: impl Into<String>, freshness_horizon: Duration) -> Self {
        Self {
            zone: zone.into(),
            records: Vec::new(),
            last_updated: None,
            freshness_horizon,
        }
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn is_stale(&self) -> bool {
        match self.last_updated {
            None => true,
            Some(t) => t.elapsed() > self.freshness_horizon,
        }
    }

    /// Returns the current snapshot, invoking `fetch` first if the cache is
    /// stale or `force_refresh` is set. `fetch` performs the actual provider
    /// call and returns the authoritative record list.
    pub fn get_or_refresh<E>(
        &mut self,
        force_refresh: bool,
        fetch: impl FnOnce() -> Result<Vec<DnsRecord>, E>,
    ) -> Result<&[DnsRecord], E> {
        if force_refresh || self.is_stale() {
            self.refresh(fetch)?;
        }
        Ok(&self.records)
    }

    pub fn refresh<E>(&mut self, fetch: impl FnOnce() -> Result<Vec<DnsRecord>, E>) -> Result<(), E> {
        debug!("refreshing record cache for zone {}", self.zone);
        let records = fetch()?;
        trace!("zone {} now has {} cached records", self.zone, records.len());
        self.records = records;
        self.last_updated = Some(Instant::now());
        Ok(())
    }

    pub fn records(&self) -> &[DnsRecord] {
        &self.records
    }

    /// First record matching `(type, name)`, case-insensitive on name.
    pub fn find(&self, record_type: RecordType, name: &str) -> Option<&DnsRecord> {
        let name = canonicalize_name(name);
        self.records
            .iter()
            .find(|r| r.record_type == record_type && canonicalize_name(&r.name) == name)
    }

    pub fn find_by_id(&self, id: &RecordId) -> Option<&DnsRecord> {
        self.records.iter().find(|r| r.stable_id() == *id)
    }

    /// Insert-or-replace keyed by `externalId` when present, otherwise by
    /// `(type, name, content)`. Called right after a create/update so the
    /// cache reflects the mutation before the call returns to the caller.
    pub fn upsert(&mut self, record: DnsRecord) {
        let id = record.stable_id();
        if let Some(existing) = self.records.iter_mut().find(|r| r.stable_id() == id) {
            *existing = record;
        } else {
            self.records.push(record);
        }
    }

    /// Remove by the same key used for [`RecordCache::upsert`].
    pub fn remove(&mut self, id: &RecordId) {
        self.records.retain(|r| r.stable_id() != *id);
    }

    pub fn invalidate(&mut self) {
        self.last_updated = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordAux;

    fn rec(name: &str, content: &str) -> DnsRecord {
        DnsRecord {
            record_type: RecordType::A,
            name: name.to_string(),
            content: content.to_string(),
            ttl: 300,
            proxied: None,
            aux: RecordAux::default(),
            external_id: None,
        }
    }

    #[test]
    fn cache_starts_stale_and_refreshes_on_first_read() {
        let mut cache = RecordCache::new("example.com", Duration::from_secs(60));
        assert!(cache.is_stale());
        let records = cache
            .get_or_refresh(false, || Ok::<_, ()>(vec![rec("a.example.com", "1.1.1.1")]))
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(!cache.is_stale());
    }

    #[test]
    fn does_not_refresh_again_within_freshness_horizon() {
        let mut cache = RecordCache::new("example.com", Duration::from_secs(60));
        let mut calls = 0;
        cache
            .get_or_refresh(false, || {
                calls += 1;
                Ok::<_, ()>(vec![])
            })
            .unwrap();
        cache
            .get_or_refresh(false, || {
                calls += 1;
                Ok::<_, ()>(vec![])
            })
            .unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn force_refresh_bypasses_freshness_horizon() {
        let mut cache = RecordCache::new("example.com", Duration::from_secs(60));
        let mut calls = 0;
        cache.get_or_refresh(false, || { calls += 1; Ok::<_, ()>(vec![]) }).unwrap();
        cache.get_or_refresh(true, || { calls += 1; Ok::<_, ()>(vec![]) }).unwrap();
        assert_eq!(calls, 2);
    }

    #[test]
    fn find_is_case_insensitive_on_name() {
        let mut cache = RecordCache::new("example.com", Duration::from_secs(60));
        cache.upsert(rec("App.Example.com", "1.1.1.1"));
        assert!(cache.find(RecordType::A, "app.example.com").is_some());
    }

    #[test]
    fn upsert_replaces_same_identity_instead_of_duplicating() {
        let mut cache = RecordCache::new("example.com", Duration::from_secs(60));
        cache.upsert(rec("app.example.com", "1.1.1.1"));
        cache.upsert(rec("app.example.com", "1.1.1.1"));
        assert_eq!(cache.records().len(), 1);
    }

    #[test]
    fn remove_drops_matching_record() {
        let mut cache = RecordCache::new("example.com", Duration::from_secs(60));
        let r = rec("app.example.com", "1.1.1.1");
        let id = r.stable_id();
        cache.upsert(r);
        cache.remove(&id);
        assert!(cache.records().is_empty());
    }
}
