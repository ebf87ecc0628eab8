//! Extracts hostnames from a Traefik router rule expression.
//!
//! Matches the canonical rule grammar `Host(\`x.y\`) [&& ...] [|| Host(...)]`
//! - each `Host(...)` literal contributes one hostname. `HostRegexp(...)`
//! literals are recognized but intentionally produce no record (logged,
//! not parsed) since a regex doesn't name a concrete FQDN.

use log::warn;
use regex::Regex;

use super::ParserDefaults;
use crate::types::{canonicalize_name, DesiredRecord, DnsRecord, RecordAux, Source};

/// One router as reported by the Traefik API poller.
#[derive(Debug, Clone)]
pub struct TraefikRule {
    pub router_id: String,
    pub rule: String,
    pub service: String,
}

fn host_pattern() -> Regex {
    Regex::new(r"Host\(\s*`([^`]+)`\s*\)").expect("static pattern always compiles")
}

fn host_regexp_pattern() -> Regex {
    Regex::new(r"HostRegexp\(\s*`([^`]+)`\s*\)").expect("static pattern always compiles")
}

/// Extracts the set of hostnames a router rule names, emitting a warning
/// for every `HostRegexp(...)` clause encountered (no record is produced
/// for those).
pub fn extract_hostnames(rule: &str) -> Vec<String> {
    let mut hosts: Vec<String> = host_pattern()
        .captures_iter(rule)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect();

    for regexp in host_regexp_pattern().captures_iter(rule) {
        if let Some(m) = regexp.get(1) {
            warn!("ignoring HostRegexp(`{}`) clause: no concrete hostname to derive a record from", m.as_str());
        }
    }

    hosts.sort();
    hosts.dedup();
    hosts
}

/// Builds one [`DesiredRecord`] per `Host(...)` literal in the router's
/// rule, using configured defaults for every field the router descriptor
/// doesn't specify directly.
pub fn extract_from_router(router: &TraefikRule, defaults: &ParserDefaults) -> Vec<DesiredRecord> {
    extract_hostnames(&router.rule)
        .into_iter()
        .map(|hostname| DesiredRecord {
            record: DnsRecord {
                record_type: defaults.default_record_type,
                name: canonicalize_name(&hostname),
                content: "<public-ip>".to_string(),
                ttl: defaults.default_ttl,
                proxied: Some(defaults.default_proxied),
                aux: RecordAux::default(),
                external_id: None,
            },
            source: Source::Traefik,
            source_id: router.router_id.clone(),
            needs_ip_lookup: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_host_clause_yields_one_hostname() {
        let hosts = extract_hostnames("Host(`app.example.com`)");
        assert_eq!(hosts, vec!["app.example.com".to_string()]);
    }

    #[test]
    fn multiple_host_clauses_combined_with_or_are_all_extracted() {
        let hosts = extract_hostnames("Host(`a.example.com`) || Host(`b.example.com`)");
        assert_eq!(hosts, vec!["a.example.com".to_string(), "b.example.com".to_string()]);
    }

    #[test]
    fn host_regexp_clause_produces_no_hostname() {
        let hosts = extract_hostnames("HostRegexp(`^.+\\.example\\.com$`)");
        assert!(hosts.is_empty());
    }

    #[test]
    fn mixed_rule_extracts_only_host_literal() {
        let hosts = extract_hostnames("Host(`app.example.com`) && PathPrefix(`/api`)");
        assert_eq!(hosts, vec!["app.example.com".to_string()]);
    }

    #[test]
    fn router_descriptor_produces_one_desired_record_per_hostname() {
        let router = TraefikRule {
            router_id: "my-router@docker".to_string(),
            rule: "Host(`app.example.com`)".to_string(),
            service: "my-service".to_string(),
        };
        let defaults = ParserDefaults::default();
        let records = extract_from_router(&router, &defaults);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record.name, "app.example.com");
        assert!(records[0].needs_ip_lookup);
    }
}
