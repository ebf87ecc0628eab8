//! Pure functions mapping a container's label map, or a Traefik router
//! descriptor, into a set of [`DesiredRecord`]s.
//!
//! Grounded on the teacher's `config.rs` `ValueEnum`-derived option types
//! for the default-policy fields this module consults, generalized from a
//! single fixed `A`-record NAT target into the full per-hostname field set
//! the label convention allows.

pub mod labels;
pub mod traefik;

pub use labels::{extract_from_labels, LabelParseError};
pub use traefik::{extract_from_router, TraefikRule};

use crate::types::{DesiredRecord, RecordType, Source};

/// Defaults applied to fields a label map or router descriptor leaves
/// unset. Mirrors the configuration options table this crate exposes.
#[derive(Debug, Clone)]
pub struct ParserDefaults {
    pub generic_label_prefix: String,
    pub default_record_type: RecordType,
    pub default_ttl: u32,
    pub default_proxied: bool,
}
impl Default for ParserDefaults {
    fn default() -> Self {
        Self {
            generic_label_prefix: "trafegodns".to_string(),
            default_record_type: RecordType::A,
            default_ttl: 300,
            default_proxied: false,
        }
    }
}

/// Resolves ties when two [`DesiredRecord`]s collide on identity: `managed`
/// wins, then `traefik`, then `container`, then alphabetic by `sourceId`.
pub fn resolve_conflict<'a>(a: &'a DesiredRecord, b: &'a DesiredRecord) -> &'a DesiredRecord {
    match a.source.cmp(&b.source) {
        std::cmp::Ordering::Less => a,
        std::cmp::Ordering::Greater => b,
        std::cmp::Ordering::Equal => {
            if a.source_id <= b.source_id {
                a
            } else {
                b
            }
        }
    }
}

/// Deduplicates a list of desired records by identity, applying
/// [`resolve_conflict`] to each collision.
pub fn dedupe_by_identity(records: Vec<DesiredRecord>) -> Vec<DesiredRecord> {
    use std::collections::HashMap;
    let mut winners: HashMap<(RecordType, String), DesiredRecord> = HashMap::new();
    for record in records {
        let key = record.identity_key();
        winners
            .entry(key)
            .and_modify(|existing| {
                let winner = resolve_conflict(existing, &record).clone();
                *existing = winner;
            })
            .or_insert(record);
    }
    winners.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DnsRecord, RecordAux};

    fn desired(source: Source, source_id: &str) -> DesiredRecord {
        DesiredRecord {
            record: DnsRecord {
                record_type: RecordType::A,
                name: "app.example.com".into(),
                content: "203.0.113.10".into(),
                ttl: 300,
                proxied: None,
                aux: RecordAux::default(),
                external_id: None,
            },
            source,
            source_id: source_id.to_string(),
            needs_ip_lookup: false,
        }
    }

    #[test]
    fn managed_wins_over_traefik_and_container() {
        let managed = desired(Source::Managed, "m");
        let traefik = desired(Source::Traefik, "t");
        let winner = resolve_conflict(&managed, &traefik);
        assert_eq!(winner.source, Source::Managed);
    }

    #[test]
    fn same_source_ties_break_alphabetically_by_source_id() {
        let a = desired(Source::Container, "a-container");
        let b = desired(Source::Container, "b-container");
        let winner = resolve_conflict(&a, &b);
        assert_eq!(winner.source_id, "a-container");
    }

    #[test]
    fn dedupe_collapses_colliding_identities_to_one_record() {
        let records = vec![desired(Source::Container, "c"), desired(Source::Traefik, "t")];
        let out = dedupe_by_identity(records);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source, Source::Traefik);
    }
}
