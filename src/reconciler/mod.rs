//! Merges desired state from the label/router parser with cached provider
//! state, computes the three-way create/update/noop diff, dispatches the
//! batch, and updates the ownership ledger - then runs orphan cleanup.
//!
//! Adapted from the teacher's `plan.rs` (the same create/delete action split
//! and the same "generate, then apply" two-phase shape), generalized from a
//! single A-record NAT target to the full desired-record set this crate
//! derives from labels, routers and the managed-hostname policy list.

pub mod tunnel;

use std::collections::HashSet;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::Mutex as AsyncMutex;

use crate::cache::RecordCache;
use crate::error::{ErrorKind, Taxonomy};
use crate::ipv4::PublicIpResolver;
use crate::ledger::{Ledger, OwnershipKey};
use crate::parser::{dedupe_by_identity, ParserDefaults};
use crate::policy::PolicyStore;
use crate::provider::{EnsureOutcome, Provider, ProviderError, RecordChange};
use crate::types::{canonicalize_name, DesiredRecord, RecordType};

const NEEDS_IP_TOKEN: &str = "<public-ip>";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: u32,
    pub updated: u32,
    pub unchanged: u32,
    pub deleted: u32,
    pub errors: Vec<String>,
}

/// Drives one provider's `reconcileOnce` cycle. One instance is constructed
/// per configured provider and run from its own long-lived task; the
/// internal mutex is the "reconcile mutex" the concurrency model requires
/// to keep cycles for one provider strictly serial.
pub struct Reconciler {
    provider: Arc<dyn Provider>,
    provider_name: String,
    cache: AsyncMutex<RecordCache>,
    ledger: Arc<dyn Ledger>,
    policy: Arc<PolicyStore>,
    ip_resolver: Arc<dyn PublicIpResolver>,
    cleanup_orphaned: bool,
}

impl Reconciler {
    pub fn new(
        provider_name: impl Into<String>,
        provider: Arc<dyn Provider>,
        zone: impl Into<String>,
        freshness_horizon: std::time::Duration,
        ledger: Arc<dyn Ledger>,
        policy: Arc<PolicyStore>,
        ip_resolver: Arc<dyn PublicIpResolver>,
        cleanup_orphaned: bool,
    ) -> Self {
        Self {
            provider,
            provider_name: provider_name.into(),
            cache: AsyncMutex::new(RecordCache::new(zone, freshness_horizon)),
            ledger,
            policy,
            ip_resolver,
            cleanup_orphaned,
        }
    }

    /// Runs one full reconciliation cycle against `snapshot` - the union of
    /// every [`DesiredRecord`] derived this tick from labels, routers and
    /// the managed-hostname policy list.
    pub async fn reconcile_once(&self, snapshot: Vec<DesiredRecord>) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        // Step 1: desired set construction + public-IP resolution.
        let mut desired = dedupe_by_identity(snapshot);
        desired.extend(self.policy.get_managed_hostnames());
        desired = dedupe_by_identity(desired);
        let desired = self.resolve_ip_lookups(desired, &mut report).await;

        let info = self.provider.info();
        let desired: Vec<DesiredRecord> = desired
            .into_iter()
            .filter(|d| {
                if !info.supports(d.record.record_type) {
                    report.errors.push(format!(
                        "{}: provider does not support record type {}",
                        d.record.name, d.record.record_type
                    ));
                    false
                } else {
                    true
                }
            })
            .collect();

        // Step 2: cache warm-up.
        let mut cache = self.cache.lock().await;
        if let Err(e) = self.refresh_cache(&mut cache, false).await {
            report.errors.push(format!("cache refresh failed: {e}"));
            if e.kind() == ErrorKind::Auth {
                error!("provider {} marked degraded: {e}", self.provider_name);
                return report;
            }
        }

        // Step 3: three-way classification.
        let mut changes = Vec::new();
        let mut noop_keys = Vec::new();
        for d in &desired {
            match cache.find(d.record.record_type, &d.record.name) {
                None => changes.push(RecordChange::Create(d.clone())),
                Some(existing) if existing.equals_desired(&d.record, info.proxied) => {
                    noop_keys.push((existing.stable_id(), d.clone()));
                }
                Some(existing) => {
                    changes.push(RecordChange::Update(existing.stable_id(), d.clone()));
                }
            }
        }
        report.unchanged = noop_keys.len() as u32;

        // Step 4: batch dispatch, with the Route53-style fallback to
        // per-record mode on anything other than RecordExists/Auth/Quota.
        let outcomes = match self.dispatch(changes, &mut cache).await {
            Ok(outcomes) => outcomes,
            Err(fatal) => {
                error!("{} reconcile cycle aborted: {fatal}", self.provider_name);
                report.errors.push(fatal);
                return report;
            }
        };

        // Step 5: post-success ownership update.
        for outcome in &outcomes {
            match outcome {
                EnsureOutcome::Created(r) => {
                    report.created += 1;
                    cache.upsert(r.clone());
                    self.track_owned(r.record_type, &r.name, &r.content);
                }
                EnsureOutcome::Updated(r) => {
                    report.updated += 1;
                    cache.upsert(r.clone());
                    self.track_owned(r.record_type, &r.name, &r.content);
                }
                EnsureOutcome::Noop(r) => {
                    report.unchanged += 1;
                    self.track_owned(r.record_type, &r.name, &r.content);
                }
                EnsureOutcome::Failed(e) => {
                    report.errors.push(e.to_string());
                }
            }
        }
        for (_, d) in &noop_keys {
            self.adopt_if_matching(d);
        }

        // Step 6: orphan cleanup.
        if self.cleanup_orphaned {
            let desired_hostnames: HashSet<String> = desired
                .iter()
                .map(|d| canonicalize_name(&d.record.name))
                .collect();
            let orphans: Vec<_> = cache
                .records()
                .iter()
                .filter(|r| {
                    let key = OwnershipKey {
                        record_type: r.record_type,
                        name: canonicalize_name(&r.name),
                        content: r.content.clone(),
                    };
                    self.ledger.is_owned(&key)
                        && !desired_hostnames.contains(&canonicalize_name(&r.name))
                        && !self.policy.should_preserve_hostname(&r.name)
                })
                .cloned()
                .collect();

            for orphan in orphans {
                let id = orphan.stable_id();
                match self.provider.delete_record(&id).await {
                    Ok(_) => {
                        report.deleted += 1;
                        cache.remove(&id);
                        let key = OwnershipKey {
                            record_type: orphan.record_type,
                            name: canonicalize_name(&orphan.name),
                            content: orphan.content.clone(),
                        };
                        if let Err(e) = self.ledger.untrack(&key) {
                            warn!("failed to untrack orphan {}: {e}", orphan.name);
                        }
                    }
                    Err(e) => report.errors.push(format!("orphan delete {}: {e}", orphan.name)),
                }
            }
        }

        info!(
            "{} reconcile cycle: created={} updated={} unchanged={} deleted={} errors={}",
            self.provider_name, report.created, report.updated, report.unchanged, report.deleted, report.errors.len()
        );
        report
    }

    async fn resolve_ip_lookups(
        &self,
        records: Vec<DesiredRecord>,
        report: &mut ReconcileReport,
    ) -> Vec<DesiredRecord> {
        let mut resolved_v4 = None;
        let mut resolved_v6 = None;
        let mut out = Vec::with_capacity(records.len());

        for mut d in records {
            if !d.needs_ip_lookup && d.record.content != NEEDS_IP_TOKEN {
                out.push(d);
                continue;
            }
            let needs_v6 = d.record.record_type == RecordType::Aaaa;
            let addr = if needs_v6 {
                if resolved_v6.is_none() {
                    resolved_v6 = Some(self.ip_resolver.resolve_v6().await.map(|a| a.to_string()));
                }
                resolved_v6.clone().unwrap()
            } else {
                if resolved_v4.is_none() {
                    resolved_v4 = Some(self.ip_resolver.resolve_v4().await.map(|a| a.to_string()));
                }
                resolved_v4.clone().unwrap()
            };
            match addr {
                Ok(content) => {
                    d.record.content = content;
                    d.needs_ip_lookup = false;
                    out.push(d);
                }
                Err(e) => report.errors.push(format!("{}: public IP lookup failed: {e}", d.record.name)),
            }
        }
        out
    }

    async fn refresh_cache(&self, cache: &mut RecordCache, force: bool) -> Result<(), ProviderError> {
        if force || cache.is_stale() {
            let records = self.provider.refresh_record_cache().await?;
            cache.refresh(|| Ok::<_, ProviderError>(records))?;
        }
        Ok(())
    }

    /// Dispatches `changes` to the provider, chunked into native batches of
    /// at most [`MAX_BATCH`] when the provider supports them. `AUTH`/`QUOTA`
    /// on any row aborts the whole cycle (`Err`); `RECORD_EXISTS` rows are
    /// reclassified as noop after a forced cache refresh; anything else
    /// falls back to per-record mode for the offending chunk.
    async fn dispatch(
        &self,
        changes: Vec<RecordChange>,
        cache: &mut RecordCache,
    ) -> Result<Vec<EnsureOutcome>, String> {
        if changes.is_empty() {
            return Ok(Vec::new());
        }
        let info = self.provider.info();
        if !info.native_batch {
            return Ok(self.provider.batch_ensure_records(changes).await);
        }

        const MAX_BATCH: usize = 100;
        let mut outcomes = Vec::with_capacity(changes.len());
        for chunk in changes.chunks(MAX_BATCH) {
            let chunk_outcomes = self.provider.batch_ensure_records(chunk.to_vec()).await;

            if let Some(e) = chunk_outcomes.iter().find_map(|o| match o {
                EnsureOutcome::Failed(e) if matches!(e.kind(), ErrorKind::Auth | ErrorKind::Quota) => Some(e),
                _ => None,
            }) {
                return Err(format!("{} provider reported a fatal error: {e}", self.provider_name));
            }

            let needs_fallback = chunk_outcomes.iter().any(|o| {
                matches!(
                    o,
                    EnsureOutcome::Failed(e) if e.kind() != ErrorKind::RecordExists
                )
            });
            if needs_fallback {
                warn!("batch dispatch fell back to per-record mode for {} provider", self.provider_name);
                let retried = crate::provider::ensure_records_one_by_one(self.provider.as_ref(), chunk.to_vec()).await;
                outcomes.extend(retried);
                continue;
            }

            let has_record_exists = chunk_outcomes
                .iter()
                .any(|o| matches!(o, EnsureOutcome::Failed(e) if e.kind() == ErrorKind::RecordExists));
            if has_record_exists {
                if let Err(e) = self.refresh_cache(cache, true).await {
                    warn!("cache refresh after RECORD_EXISTS failed: {e}");
                }
            }
            for (change, outcome) in chunk.iter().zip(chunk_outcomes) {
                match outcome {
                    EnsureOutcome::Failed(e) if e.kind() == ErrorKind::RecordExists => {
                        outcomes.push(EnsureOutcome::Noop(change.desired().record.clone()));
                    }
                    other => outcomes.push(other),
                }
            }
        }
        Ok(outcomes)
    }

    fn track_owned(&self, record_type: RecordType, name: &str, content: &str) {
        let key = OwnershipKey {
            record_type,
            name: canonicalize_name(name),
            content: content.to_string(),
        };
        if let Err(e) = self.ledger.track(&key, true) {
            warn!("failed to record ownership for {name}: {e}");
        }
    }

    fn adopt_if_matching(&self, desired: &DesiredRecord) {
        let key = OwnershipKey {
            record_type: desired.record.record_type,
            name: canonicalize_name(&desired.record.name),
            content: desired.record.content.clone(),
        };
        if !self.ledger.is_owned(&key) {
            if let Err(e) = self.ledger.adopt(&key) {
                warn!("failed to adopt pre-existing record {}: {e}", desired.record.name);
            }
        }
    }
}

#[allow(dead_code)]
pub fn default_parser_defaults() -> ParserDefaults {
    ParserDefaults::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MockLedger;
    use crate::policy::PolicyStore;
    use crate::provider::{MockProvider, ProviderInfo};
    use crate::types::{DnsRecord, RecordAux, Source};
    use std::net::{Ipv4Addr, Ipv6Addr};
    use std::time::Duration;
    use tempfile::tempdir;

    fn info() -> ProviderInfo {
        ProviderInfo {
            name: "mock",
            stable_ids: true,
            proxied: false,
            ttl_min: 1,
            ttl_max: 86400,
            supported_types: &[RecordType::A, RecordType::Aaaa, RecordType::Cname],
            native_batch: false,
            supports_ownership_marker: false,
        }
    }

    fn desired(name: &str, content: &str) -> DesiredRecord {
        DesiredRecord {
            record: DnsRecord {
                record_type: RecordType::A,
                name: name.to_string(),
                content: content.to_string(),
                ttl: 300,
                proxied: None,
                aux: RecordAux::default(),
                external_id: None,
            },
            source: Source::Container,
            source_id: "c1".to_string(),
            needs_ip_lookup: false,
        }
    }

    struct StubIpResolver;
    #[async_trait::async_trait]
    impl PublicIpResolver for StubIpResolver {
        async fn resolve_v4(&self) -> Result<Ipv4Addr, crate::ipv4::ResolveError> {
            Ok(Ipv4Addr::new(203, 0, 113, 10))
        }
        async fn resolve_v6(&self) -> Result<Ipv6Addr, crate::ipv4::ResolveError> {
            Ok(Ipv6Addr::LOCALHOST)
        }
    }

    #[tokio::test]
    async fn new_hostname_is_created_and_tracked() {
        let mut mock = MockProvider::new();
        mock.expect_info().returning(info);
        mock.expect_refresh_record_cache().returning(|| Ok(vec![]));
        mock.expect_create_record().returning(|d| Ok(d.record));
        mock.expect_batch_ensure_records().returning(|changes| {
            changes
                .into_iter()
                .map(|c| match c {
                    RecordChange::Create(d) => EnsureOutcome::Created(d.record),
                    RecordChange::Update(_, d) => EnsureOutcome::Updated(d.record),
                })
                .collect()
        });

        let mut ledger = MockLedger::new();
        ledger.expect_track().returning(|_, _| Ok(()));
        ledger.expect_is_owned().returning(|_| false);

        let dir = tempdir().unwrap();
        let policy = Arc::new(PolicyStore::load(dir.path()).unwrap());

        let reconciler = Reconciler::new(
            "mock",
            Arc::new(mock),
            "example.com",
            Duration::from_secs(60),
            Arc::new(ledger),
            policy,
            Arc::new(StubIpResolver),
            false,
        );

        let report = reconciler.reconcile_once(vec![desired("app.example.com", "203.0.113.10")]).await;
        assert_eq!(report.created, 1);
        assert_eq!(report.updated, 0);
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn needs_ip_lookup_record_is_resolved_before_classification() {
        let mut mock = MockProvider::new();
        mock.expect_info().returning(info);
        mock.expect_refresh_record_cache().returning(|| Ok(vec![]));
        mock.expect_batch_ensure_records().returning(|changes| {
            changes
                .into_iter()
                .map(|c| match c {
                    RecordChange::Create(d) => {
                        assert_eq!(d.record.content, "203.0.113.10");
                        EnsureOutcome::Created(d.record)
                    }
                    RecordChange::Update(_, d) => EnsureOutcome::Updated(d.record),
                })
                .collect()
        });

        let mut ledger = MockLedger::new();
        ledger.expect_track().returning(|_, _| Ok(()));

        let dir = tempdir().unwrap();
        let policy = Arc::new(PolicyStore::load(dir.path()).unwrap());

        let reconciler = Reconciler::new(
            "mock",
            Arc::new(mock),
            "example.com",
            Duration::from_secs(60),
            Arc::new(ledger),
            policy,
            Arc::new(StubIpResolver),
            false,
        );

        let mut d = desired("app.example.com", NEEDS_IP_TOKEN);
        d.needs_ip_lookup = true;
        let report = reconciler.reconcile_once(vec![d]).await;
        assert_eq!(report.created, 1);
    }

    #[tokio::test]
    async fn orphaned_owned_record_outside_desired_set_is_deleted() {
        let mut mock = MockProvider::new();
        mock.expect_info().returning(info);
        mock.expect_refresh_record_cache().returning(|| {
            Ok(vec![DnsRecord {
                record_type: RecordType::A,
                name: "stale.example.com".into(),
                content: "203.0.113.99".into(),
                ttl: 300,
                proxied: None,
                aux: RecordAux::default(),
                external_id: None,
            }])
        });
        mock.expect_batch_ensure_records().returning(|_| Vec::new());
        mock.expect_delete_record().returning(|_| Ok(true));

        let mut ledger = MockLedger::new();
        ledger.expect_is_owned().returning(|_| true);
        ledger.expect_untrack().returning(|_| Ok(()));

        let dir = tempdir().unwrap();
        let policy = Arc::new(PolicyStore::load(dir.path()).unwrap());

        let reconciler = Reconciler::new(
            "mock",
            Arc::new(mock),
            "example.com",
            Duration::from_secs(60),
            Arc::new(ledger),
            policy,
            Arc::new(StubIpResolver),
            true,
        );

        let report = reconciler.reconcile_once(vec![]).await;
        assert_eq!(report.deleted, 1);
    }

    #[tokio::test]
    async fn preserved_orphan_is_not_deleted() {
        let mut mock = MockProvider::new();
        mock.expect_info().returning(info);
        mock.expect_refresh_record_cache().returning(|| {
            Ok(vec![DnsRecord {
                record_type: RecordType::A,
                name: "keep.example.com".into(),
                content: "203.0.113.99".into(),
                ttl: 300,
                proxied: None,
                aux: RecordAux::default(),
                external_id: None,
            }])
        });
        mock.expect_batch_ensure_records().returning(|_| Vec::new());

        let mut ledger = MockLedger::new();
        ledger.expect_is_owned().returning(|_| true);

        let dir = tempdir().unwrap();
        let policy = Arc::new(PolicyStore::load(dir.path()).unwrap());
        policy.add_preserved_hostname("keep.example.com").unwrap();

        let reconciler = Reconciler::new(
            "mock",
            Arc::new(mock),
            "example.com",
            Duration::from_secs(60),
            Arc::new(ledger),
            policy,
            Arc::new(StubIpResolver),
            true,
        );

        let report = reconciler.reconcile_once(vec![]).await;
        assert_eq!(report.deleted, 0);
    }
}
