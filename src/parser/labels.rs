//! Container label parsing: `<genericPrefix>.<provider>.<hostname>.<field>
//! =<value>` labels become [`DesiredRecord`]s, falling back to configured
//! defaults for any field a label omits.

use std::collections::HashMap;

use thiserror::Error;

use super::ParserDefaults;
use crate::types::{canonicalize_name, DesiredRecord, DnsRecord, RecordAux, RecordType, Source};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelParseError {
    #[error("hostname `{0}` has conflicting values across labels")]
    ConflictingLabels(String),
}

/// Parses one container's label map into a set of [`DesiredRecord`]s.
/// Labels are first grouped by `(provider, hostname)` so distinct provider
/// blocks can target the same hostname independently; candidates that
/// collide on `(type, hostname)` with differing `content` are then dropped
/// together with [`LabelParseError::ConflictingLabels`], while the rest of
/// the container's records still go through.
pub fn extract_from_labels(
    container_id: &str,
    labels: &HashMap<String, String>,
    defaults: &ParserDefaults,
) -> (Vec<DesiredRecord>, Vec<LabelParseError>) {
    let prefix = format!("{}.", defaults.generic_label_prefix);
    let mut by_group: HashMap<(String, String), HashMap<String, String>> = HashMap::new();

    for (key, value) in labels {
        let Some(rest) = key.strip_prefix(&prefix) else { continue };
        let mut head = rest.splitn(2, '.');
        let Some(provider) = head.next() else { continue };
        let Some(remainder) = head.next() else { continue };
        let Some((hostname, field)) = remainder.rsplit_once('.') else { continue };

        if hostname.contains('*') && !hostname.starts_with("*.") {
            continue;
        }
        let hostname = normalize_hostname(hostname);

        by_group
            .entry((provider.to_string(), hostname))
            .or_default()
            .insert(field.to_string(), value.clone());
    }

    let mut candidates: Vec<DesiredRecord> = Vec::new();
    for ((_provider, hostname), fields) in &by_group {
        if let Ok(record) = build_record(hostname, fields, defaults) {
            candidates.push(DesiredRecord {
                record,
                source: Source::Container,
                source_id: container_id.to_string(),
                needs_ip_lookup: !fields.contains_key("content"),
            });
        }
    }

    let mut by_identity: HashMap<(RecordType, String), Vec<DesiredRecord>> = HashMap::new();
    for candidate in candidates {
        by_identity.entry(candidate.identity_key()).or_default().push(candidate);
    }

    let mut records = Vec::new();
    let mut errors = Vec::new();
    for ((_, hostname), group) in by_identity {
        let distinct_contents: std::collections::HashSet<&str> =
            group.iter().map(|d| d.record.content.as_str()).collect();
        if distinct_contents.len() > 1 {
            errors.push(LabelParseError::ConflictingLabels(hostname));
        } else {
            records.push(group.into_iter().next().expect("group is non-empty"));
        }
    }

    (records, errors)
}

fn normalize_hostname(hostname: &str) -> String {
    canonicalize_name(hostname)
}

fn build_record(
    hostname: &str,
    fields: &HashMap<String, String>,
    defaults: &ParserDefaults,
) -> Result<DnsRecord, LabelParseError> {
    let record_type = fields
        .get("type")
        .and_then(|t| parse_record_type(t))
        .unwrap_or(defaults.default_record_type);

    let content = fields
        .get("content")
        .cloned()
        .unwrap_or_else(|| "<public-ip>".to_string());

    let ttl = fields
        .get("ttl")
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.default_ttl);

    let proxied = fields
        .get("proxied")
        .and_then(|v| v.parse().ok())
        .or(Some(defaults.default_proxied));

    let aux = RecordAux {
        priority: fields.get("priority").and_then(|v| v.parse().ok()),
        weight: fields.get("weight").and_then(|v| v.parse().ok()),
        port: fields.get("port").and_then(|v| v.parse().ok()),
        flags: fields.get("flags").and_then(|v| v.parse().ok()),
        tag: fields.get("tag").cloned(),
    };

    Ok(DnsRecord {
        record_type,
        name: hostname.to_string(),
        content,
        ttl,
        proxied,
        aux,
        external_id: None,
    })
}

fn parse_record_type(s: &str) -> Option<RecordType> {
    Some(match s.to_ascii_uppercase().as_str() {
        "A" => RecordType::A,
        "AAAA" => RecordType::Aaaa,
        "CNAME" => RecordType::Cname,
        "MX" => RecordType::Mx,
        "NS" => RecordType::Ns,
        "TXT" => RecordType::Txt,
        "SRV" => RecordType::Srv,
        "CAA" => RecordType::Caa,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let defaults = ParserDefaults::default();
        let l = labels(&[
            ("trafegodns.cloudflare.app.example.com.type", "A"),
            ("trafegodns.cloudflare.app.example.com.content", "203.0.113.10"),
            ("trafegodns.cloudflare.app.example.com.ttl", "120"),
        ]);
        let (records, errors) = extract_from_labels("c1", &l, &defaults);
        assert!(errors.is_empty());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record.ttl, 120);
        assert_eq!(records[0].record.content, "203.0.113.10");
        assert!(!records[0].needs_ip_lookup);
    }

    #[test]
    fn missing_content_flags_needs_ip_lookup() {
        let defaults = ParserDefaults::default();
        let l = labels(&[("trafegodns.cloudflare.app.example.com.type", "A")]);
        let (records, _) = extract_from_labels("c1", &l, &defaults);
        assert!(records[0].needs_ip_lookup);
    }

    #[test]
    fn non_matching_labels_are_ignored() {
        let defaults = ParserDefaults::default();
        let l = labels(&[("com.docker.compose.project", "myapp")]);
        let (records, errors) = extract_from_labels("c1", &l, &defaults);
        assert!(records.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn wildcard_hostname_without_leading_star_dot_is_dropped() {
        let defaults = ParserDefaults::default();
        let l = labels(&[("trafegodns.cloudflare.foo*bar.example.com.type", "A")]);
        let (records, _) = extract_from_labels("c1", &l, &defaults);
        assert!(records.is_empty());
    }

    #[test]
    fn conflicting_content_across_provider_blocks_is_dropped_with_error() {
        let defaults = ParserDefaults::default();
        let l = labels(&[
            ("trafegodns.cloudflare.host.example.com.content", "1.1.1.1"),
            ("trafegodns.route53.host.example.com.content", "2.2.2.2"),
        ]);
        let (records, errors) = extract_from_labels("c1", &l, &defaults);
        assert!(records.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], LabelParseError::ConflictingLabels(h) if h == "host.example.com"));
    }
}
