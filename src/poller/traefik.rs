//! Router poller: periodically fetches Traefik's router table over its
//! read-only HTTP API and emits `traefik:routers:updated` on any change.
//!
//! Uses `reqwest`, the REST client already in the dependency stack for the
//! HTTP-based provider adapters.

use std::time::Duration;

use log::{error, info};
use serde::Deserialize;

use crate::event_bus::{topics, EventBus};
use crate::parser::TraefikRule;
use crate::poller::BackoffTracker;

#[derive(Debug, Deserialize)]
struct RawRouter {
    rule: Option<String>,
    service: Option<String>,
}

pub struct TraefikPoller {
    http: reqwest::Client,
    api_url: String,
    bus: EventBus,
    last_snapshot: Vec<TraefikRule>,
    backoff: BackoffTracker,
}

impl TraefikPoller {
    pub fn new(api_url: String, bus: EventBus, base_interval: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            bus,
            last_snapshot: Vec::new(),
            backoff: BackoffTracker::new(base_interval),
        }
    }

    pub async fn poll_once(&mut self) -> Duration {
        match self.fetch_routers().await {
            Ok(snapshot) => {
                self.backoff.on_success();
                if !routers_equal(&snapshot, &self.last_snapshot) {
                    info!("traefik poller observed a router change: {} routers", snapshot.len());
                    self.bus.publish(
                        topics::TRAEFIK_ROUTERS_UPDATED,
                        serde_json::json!({ "routers": snapshot.len() }),
                    );
                    self.last_snapshot = snapshot;
                }
            }
            Err(e) => {
                error!("traefik poll failed (consecutive errors: {}): {e}", self.backoff.consecutive_errors() + 1);
                self.backoff.on_error();
            }
        }
        self.backoff.next_delay()
    }

    async fn fetch_routers(&self) -> Result<Vec<TraefikRule>, reqwest::Error> {
        let url = format!("{}/api/http/routers", self.api_url);
        let routers: std::collections::HashMap<String, RawRouter> =
            self.http.get(url).send().await?.json().await?;
        Ok(routers
            .into_iter()
            .filter_map(|(id, r)| {
                Some(TraefikRule {
                    router_id: id,
                    rule: r.rule?,
                    service: r.service.unwrap_or_default(),
                })
            })
            .collect())
    }

    pub fn snapshot(&self) -> &[TraefikRule] {
        &self.last_snapshot
    }
}

fn routers_equal(a: &[TraefikRule], b: &[TraefikRule]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a_sorted: Vec<(&str, &str)> = a.iter().map(|r| (r.router_id.as_str(), r.rule.as_str())).collect();
    let mut b_sorted: Vec<(&str, &str)> = b.iter().map(|r| (r.router_id.as_str(), r.rule.as_str())).collect();
    a_sorted.sort();
    b_sorted.sort();
    a_sorted == b_sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str, rule: &str) -> TraefikRule {
        TraefikRule {
            router_id: id.to_string(),
            rule: rule.to_string(),
            service: "svc".to_string(),
        }
    }

    #[test]
    fn identical_snapshots_in_different_order_are_equal() {
        let a = vec![rule("r1", "Host(`a.example.com`)"), rule("r2", "Host(`b.example.com`)")];
        let b = vec![rule("r2", "Host(`b.example.com`)"), rule("r1", "Host(`a.example.com`)")];
        assert!(routers_equal(&a, &b));
    }

    #[test]
    fn changed_rule_is_not_equal() {
        let a = vec![rule("r1", "Host(`a.example.com`)")];
        let b = vec![rule("r1", "Host(`b.example.com`)")];
        assert!(!routers_equal(&a, &b));
    }
}
