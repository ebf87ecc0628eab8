//! In-process publish/subscribe bus used to decouple the pollers, the
//! reconcilers and the ledger from one another (container started, router
//! updated, record created, cache refreshed, ...).
//!
//! Topics are dot/colon-separated strings such as `dns:record:created`.
//! A subscription is either an exact topic or a glob containing `*`, which
//! matches any run of characters within or across segments. A bare `*`
//! subscription receives every event.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use log::error;
use regex::Regex;
use serde_json::Value;

/// The envelope every subscriber receives, regardless of whether they
/// matched on an exact topic or a wildcard.
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

pub type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

struct Subscription {
    pattern: SubscriptionPattern,
    handler: Handler,
}

enum SubscriptionPattern {
    Exact(String),
    Wildcard(Regex),
}
impl fmt::Debug for SubscriptionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionPattern::Exact(s) => write!(f, "Exact({s})"),
            SubscriptionPattern::Wildcard(r) => write!(f, "Wildcard({r})"),
        }
    }
}

/// Compiles a topic glob (`*` = any run of characters) into an anchored
/// regex. `*` alone matches everything, including across `:`/`.` separators.
fn compile_pattern(glob: &str) -> Regex {
    let mut out = String::from("^");
    for part in glob.split('*') {
        out.push_str(&regex::escape(part));
        out.push_str(".*");
    }
    // strip the trailing ".*" added for the implicit split tail when the
    // pattern doesn't actually end in a wildcard
    if !glob.ends_with('*') {
        out.truncate(out.len() - 2);
    }
    out.push('$');
    Regex::new(&out).expect("glob-derived regex must always compile")
}

/// Synchronous, in-process event bus. Publication iterates exact handlers
/// first, then wildcard handlers whose compiled pattern matches the topic.
/// A handler that panics or whose closure returns is caught and logged -
/// the failure never reaches the publisher.
#[derive(Default, Clone)]
pub struct EventBus {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    exact: HashMap<String, Vec<Handler>>,
    wildcard: Vec<Subscription>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to an exact topic or a glob containing `*`.
    pub fn subscribe<F>(&self, topic: &str, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        let mut inner = self.inner.lock().expect("event bus mutex poisoned");
        if topic.contains('*') {
            inner.wildcard.push(Subscription {
                pattern: SubscriptionPattern::Wildcard(compile_pattern(topic)),
                handler,
            });
        } else {
            inner.exact.entry(topic.to_string()).or_default().push(handler);
        }
    }

    /// Publish an event. `data` is any JSON-serializable payload; `_timestamp`
    /// and `_eventType` are attached automatically and available to
    /// handlers via [`Event::timestamp`]/[`Event::event_type`].
    pub fn publish(&self, event_type: &str, data: Value) {
        let event = Event {
            event_type: event_type.to_string(),
            data,
            timestamp: Utc::now(),
        };

        let (exact_handlers, wildcard_handlers): (Vec<Handler>, Vec<Handler>) = {
            let inner = self.inner.lock().expect("event bus mutex poisoned");
            let exact = inner.exact.get(event_type).cloned().unwrap_or_default();
            let wildcard = inner
                .wildcard
                .iter()
                .filter(|s| match &s.pattern {
                    SubscriptionPattern::Wildcard(r) => r.is_match(event_type),
                    SubscriptionPattern::Exact(_) => false,
                })
                .map(|s| s.handler.clone())
                .collect();
            (exact, wildcard)
        };

        for handler in exact_handlers.iter().chain(wildcard_handlers.iter()) {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handler(&event)));
            if let Err(panic) = result {
                let msg = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "<non-string panic payload>".to_string());
                error!("event handler for topic '{event_type}' panicked: {msg}");
            }
        }
    }
}

/// Well-known topics published by the core. Kept as associated constants
/// rather than an enum so downstream subscribers can still match on glob
/// patterns like `dns:record:*`.
pub mod topics {
    pub const DNS_RECORD_CREATED: &str = "dns:record:created";
    pub const DNS_RECORD_UPDATED: &str = "dns:record:updated";
    pub const DNS_RECORD_DELETED: &str = "dns:record:deleted";
    pub const DNS_RECORDS_UPDATED: &str = "dns:records:updated";
    pub const DNS_CACHE_REFRESHED: &str = "dns:cache:refreshed";
    pub const TRAEFIK_ROUTERS_UPDATED: &str = "traefik:routers:updated";
    pub const DOCKER_LABELS_UPDATED: &str = "docker:labels:updated";
    pub const ERROR_OCCURRED: &str = "error:occurred";
    pub const CONFIG_UPDATED: &str = "config:updated";
    pub const OPERATION_MODE_CHANGED: &str = "operation_mode_changed";
    pub const TUNNEL_CREATED: &str = "tunnel:created";
    pub const TUNNEL_DEPLOYED: &str = "tunnel:deployed";
    pub const TUNNEL_DELETED: &str = "tunnel:deleted";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn exact_subscriber_receives_exact_topic_only() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        bus.subscribe("dns:record:created", move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        bus.publish("dns:record:created", serde_json::json!({}));
        bus.publish("dns:record:deleted", serde_json::json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn wildcard_matches_any_run_within_segment() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        bus.subscribe("dns:record:*", move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        bus.publish("dns:record:created", serde_json::json!({}));
        bus.publish("dns:record:updated", serde_json::json!({}));
        bus.publish("dns:records:updated", serde_json::json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn bare_star_receives_everything() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        bus.subscribe("*", move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        bus.publish("anything:goes", serde_json::json!({}));
        bus.publish("dns:record:created", serde_json::json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panicking_handler_does_not_abort_publish() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        bus.subscribe("t", |_| panic!("boom"));
        bus.subscribe("t", move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        bus.publish("t", serde_json::json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn event_carries_timestamp_and_type() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(None));
        let s = seen.clone();
        bus.subscribe("dns:record:created", move |e| {
            *s.lock().unwrap() = Some(e.clone());
        });
        bus.publish("dns:record:created", serde_json::json!({"name": "x"}));
        let e = seen.lock().unwrap().clone().unwrap();
        assert_eq!(e.event_type, "dns:record:created");
    }
}
