//! Tunnel ingress-rule reconciler: the same diff/ownership discipline as
//! [`super::Reconciler`], applied to a Cloudflare Tunnel's ordered ingress
//! list rather than to independently addressable DNS records.
//!
//! Grounded on §4.I: the desired set is hostnames opted into tunneling, the
//! provider state is one ordered document per tunnel, and the diff key is
//! hostname with `(service, path)` as the comparison fields. The catch-all
//! rule (`hostname: None`) is always carried over unchanged at the tail.

use std::collections::HashMap;
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::Mutex as AsyncMutex;

use crate::ledger::{Ledger, OwnershipKey};
use crate::policy::PolicyStore;
use crate::provider::cloudflare::tunnel::{IngressRule, TunnelProvider};
use crate::types::{canonicalize_name, RecordType};

/// One hostname this process wants routed through the tunnel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredIngress {
    pub hostname: String,
    pub service: String,
    pub path: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TunnelReconcileReport {
    pub created: u32,
    pub updated: u32,
    pub unchanged: u32,
    pub deleted: u32,
    pub errors: Vec<String>,
}

pub struct TunnelReconciler {
    provider: Arc<dyn TunnelProvider>,
    tunnel_id: String,
    ledger: Arc<dyn Ledger>,
    policy: Arc<PolicyStore>,
    mutex: AsyncMutex<()>,
}

impl TunnelReconciler {
    pub fn new(
        provider: Arc<dyn TunnelProvider>,
        tunnel_id: impl Into<String>,
        ledger: Arc<dyn Ledger>,
        policy: Arc<PolicyStore>,
    ) -> Self {
        Self {
            provider,
            tunnel_id: tunnel_id.into(),
            ledger,
            policy,
            mutex: AsyncMutex::new(()),
        }
    }

    pub async fn reconcile_once(&self, desired: Vec<DesiredIngress>) -> TunnelReconcileReport {
        let _guard = self.mutex.lock().await;
        let mut report = TunnelReconcileReport::default();

        let current = match self.provider.get_ingress(&self.tunnel_id).await {
            Ok(rules) => rules,
            Err(e) => {
                report.errors.push(format!("failed to fetch tunnel configuration: {e}"));
                return report;
            }
        };

        let catch_all = current.iter().find(|r| r.hostname.is_none()).cloned();
        let mut by_hostname: HashMap<String, &IngressRule> = current
            .iter()
            .filter_map(|r| r.hostname.as_ref().map(|h| (canonicalize_name(h), r)))
            .collect();

        let desired_hostnames: std::collections::HashSet<String> =
            desired.iter().map(|d| canonicalize_name(&d.hostname)).collect();

        let mut rewritten: Vec<IngressRule> = Vec::with_capacity(desired.len() + 1);
        let mut changed = false;

        for d in &desired {
            let key = canonicalize_name(&d.hostname);
            match by_hostname.remove(&key) {
                Some(existing) if existing.service == d.service && existing.path == d.path => {
                    report.unchanged += 1;
                    rewritten.push(existing.clone());
                }
                Some(_) => {
                    report.updated += 1;
                    changed = true;
                    rewritten.push(IngressRule {
                        hostname: Some(d.hostname.clone()),
                        service: d.service.clone(),
                        path: d.path.clone(),
                    });
                }
                None => {
                    report.created += 1;
                    changed = true;
                    rewritten.push(IngressRule {
                        hostname: Some(d.hostname.clone()),
                        service: d.service.clone(),
                        path: d.path.clone(),
                    });
                }
            }
        }

        // Anything still in `by_hostname` is no longer desired - drop it
        // unless owned-but-preserved (mirrors §4.H step 6's orphan rule).
        for (hostname, rule) in by_hostname {
            let owned = self.ledger.is_owned(&OwnershipKey {
                record_type: RecordType::Cname,
                name: hostname.clone(),
                content: String::new(),
            });
            if owned && !self.policy.should_preserve_hostname(&hostname) {
                report.deleted += 1;
                changed = true;
            } else {
                rewritten.push(rule.clone());
            }
        }

        if let Some(tail) = catch_all {
            rewritten.push(tail);
        }

        if changed {
            if let Err(e) = self.provider.set_ingress(&self.tunnel_id, rewritten).await {
                report.errors.push(format!("failed to rewrite tunnel configuration: {e}"));
                return report;
            }
            info!(
                "tunnel {} ingress rewritten: created={} updated={} deleted={}",
                self.tunnel_id, report.created, report.updated, report.deleted
            );
        }

        for hostname in &desired_hostnames {
            let key = OwnershipKey {
                record_type: RecordType::Cname,
                name: hostname.clone(),
                content: String::new(),
            };
            if let Err(e) = self.ledger.track(&key, true) {
                warn!("failed to track tunnel ingress ownership for {hostname}: {e}");
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MockLedger;
    use crate::provider::cloudflare::tunnel::MockTunnelProvider;
    use tempfile::tempdir;

    fn catch_all() -> IngressRule {
        IngressRule {
            hostname: None,
            service: "http_status:404".into(),
            path: None,
        }
    }

    #[tokio::test]
    async fn new_hostname_is_appended_before_catch_all() {
        let mut provider = MockTunnelProvider::new();
        provider.expect_get_ingress().returning(|_| Ok(vec![catch_all()]));
        provider.expect_set_ingress().returning(|_, rules| {
            assert_eq!(rules.last().unwrap().hostname, None);
            assert_eq!(rules[0].hostname.as_deref(), Some("app.example.com"));
            Ok(())
        });

        let mut ledger = MockLedger::new();
        ledger.expect_track().returning(|_, _| Ok(()));

        let dir = tempdir().unwrap();
        let policy = Arc::new(PolicyStore::load(dir.path()).unwrap());
        let reconciler = TunnelReconciler::new(Arc::new(provider), "tun1", Arc::new(ledger), policy);

        let report = reconciler
            .reconcile_once(vec![DesiredIngress {
                hostname: "app.example.com".into(),
                service: "http://localhost:8080".into(),
                path: None,
            }])
            .await;
        assert_eq!(report.created, 1);
    }

    #[tokio::test]
    async fn unchanged_ingress_issues_no_rewrite() {
        let existing = IngressRule {
            hostname: Some("app.example.com".into()),
            service: "http://localhost:8080".into(),
            path: None,
        };
        let mut provider = MockTunnelProvider::new();
        provider
            .expect_get_ingress()
            .returning(move |_| Ok(vec![existing.clone(), catch_all()]));
        provider.expect_set_ingress().never();

        let mut ledger = MockLedger::new();
        ledger.expect_track().returning(|_, _| Ok(()));

        let dir = tempdir().unwrap();
        let policy = Arc::new(PolicyStore::load(dir.path()).unwrap());
        let reconciler = TunnelReconciler::new(Arc::new(provider), "tun1", Arc::new(ledger), policy);

        let report = reconciler
            .reconcile_once(vec![DesiredIngress {
                hostname: "app.example.com".into(),
                service: "http://localhost:8080".into(),
                path: None,
            }])
            .await;
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.created, 0);
    }

    #[tokio::test]
    async fn owned_hostname_dropped_from_desired_set_is_removed() {
        let stale = IngressRule {
            hostname: Some("old.example.com".into()),
            service: "http://localhost:9090".into(),
            path: None,
        };
        let mut provider = MockTunnelProvider::new();
        provider.expect_get_ingress().returning(move |_| Ok(vec![stale.clone(), catch_all()]));
        provider.expect_set_ingress().returning(|_, rules| {
            assert!(rules.iter().all(|r| r.hostname.as_deref() != Some("old.example.com")));
            Ok(())
        });

        let mut ledger = MockLedger::new();
        ledger.expect_is_owned().returning(|_| true);

        let dir = tempdir().unwrap();
        let policy = Arc::new(PolicyStore::load(dir.path()).unwrap());
        let reconciler = TunnelReconciler::new(Arc::new(provider), "tun1", Arc::new(ledger), policy);

        let report = reconciler.reconcile_once(vec![]).await;
        assert_eq!(report.deleted, 1);
    }
}
