//! Core data model: DNS records as read from a provider, and the records the
//! engine *wants* a provider to contain once reconciliation finishes.
//!
//! This module only carries shape plus the bit of logic every other module
//! leans on: name canonicalization and the diffing equality rule.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A DNS record type the engine understands. Not every provider supports
/// every variant - see [`crate::provider::ProviderInfo::supported_types`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Txt,
    Srv,
    Caa,
}
impl Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Txt => "TXT",
            RecordType::Srv => "SRV",
            RecordType::Caa => "CAA",
        };
        write!(f, "{s}")
    }
}
impl RecordType {
    /// Hostname-targeting types compare `content` case-insensitively; every
    /// other type compares it verbatim.
    pub fn hostname_targeting(&self) -> bool {
        matches!(
            self,
            RecordType::Cname | RecordType::Mx | RecordType::Ns | RecordType::Srv
        )
    }
}

/// Type-specific auxiliary fields beyond `content`/`ttl`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RecordAux {
    pub priority: Option<u16>,
    pub weight: Option<u16>,
    pub port: Option<u16>,
    pub flags: Option<u8>,
    pub tag: Option<String>,
}

/// Provider-assigned opaque id, or the engine-synthesized stable key for
/// providers that don't hand out one (Route53: `name:type`, Pi-hole:
/// `base64(name:type:content)`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    External(String),
    Synthesized(String),
}
impl RecordId {
    pub fn as_str(&self) -> &str {
        match self {
            RecordId::External(s) | RecordId::Synthesized(s) => s,
        }
    }

    pub fn synthesize_name_type(name: &str, ty: RecordType) -> RecordId {
        RecordId::Synthesized(format!("{}:{}", canonicalize_name(name), ty))
    }

    pub fn synthesize_name_type_content(name: &str, ty: RecordType, content: &str) -> RecordId {
        use base64::{engine::general_purpose::STANDARD, Engine};
        let raw = format!("{}:{}:{}", canonicalize_name(name), ty, content);
        RecordId::Synthesized(STANDARD.encode(raw))
    }
}

/// Lowercases and strips a single trailing dot; the canonical form every
/// name comparison in this crate is done against.
pub fn canonicalize_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// A single DNS record as observed at (or about to be sent to) a provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsRecord {
    pub record_type: RecordType,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: Option<bool>,
    pub aux: RecordAux,
    pub external_id: Option<RecordId>,
}
impl DnsRecord {
    pub fn identity_key(&self) -> (RecordType, String) {
        (self.record_type, canonicalize_name(&self.name))
    }

    pub fn stable_id(&self) -> RecordId {
        self.external_id.clone().unwrap_or_else(|| {
            RecordId::synthesize_name_type_content(&self.name, self.record_type, &self.content)
        })
    }

    /// Equality per the provider adapter interface's diffing rule.
    /// `proxy_capable` says whether `proxied` (and the TTL-suspension that
    /// goes with it) is meaningful for this provider at all.
    pub fn equals_desired(&self, desired: &DnsRecord, proxy_capable: bool) -> bool {
        if self.record_type != desired.record_type {
            return false;
        }
        if canonicalize_name(&self.name) != canonicalize_name(&desired.name) {
            return false;
        }
        let content_eq = if self.record_type.hostname_targeting() {
            canonicalize_name(&self.content) == canonicalize_name(&desired.content)
        } else {
            self.content == desired.content
        };
        if !content_eq || self.aux != desired.aux {
            return false;
        }

        if proxy_capable {
            if self.proxied != desired.proxied {
                return false;
            }
            let either_proxied = self.proxied.unwrap_or(false) || desired.proxied.unwrap_or(false);
            if either_proxied {
                return true;
            }
        }
        self.ttl == desired.ttl
    }
}
impl Display for DnsRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} (ttl={})", self.record_type, self.name, self.content, self.ttl)
    }
}

/// Where a [`DesiredRecord`] came from; used to break ties when two desired
/// records collide on identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    Managed,
    Traefik,
    Container,
}

/// A record the engine wants a provider to contain, with enough provenance
/// to resolve conflicts and to decide whether `content` still needs the
/// public-IP collaborator invoked on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DesiredRecord {
    pub record: DnsRecord,
    pub source: Source,
    pub source_id: String,
    pub needs_ip_lookup: bool,
}
impl DesiredRecord {
    pub fn identity_key(&self) -> (RecordType, String) {
        self.record.identity_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, content: &str, ttl: u32, proxied: Option<bool>) -> DnsRecord {
        DnsRecord {
            record_type: RecordType::A,
            name: name.to_string(),
            content: content.to_string(),
            ttl,
            proxied,
            aux: RecordAux::default(),
            external_id: None,
        }
    }

    #[test]
    fn canonicalizes_trailing_dot_and_case() {
        assert_eq!(canonicalize_name("App.Example.com."), "app.example.com");
    }

    #[test]
    fn identical_records_are_equal() {
        let a = rec("app.example.com", "203.0.113.10", 300, None);
        let b = rec("APP.example.com.", "203.0.113.10", 300, None);
        assert!(a.equals_desired(&b, true));
    }

    #[test]
    fn proxied_toggle_forces_update_even_if_content_matches() {
        let a = rec("app.example.com", "203.0.113.10", 300, Some(false));
        let b = rec("app.example.com", "203.0.113.10", 300, Some(true));
        assert!(!a.equals_desired(&b, true));
    }

    #[test]
    fn ttl_ignored_when_either_side_proxied() {
        let a = rec("app.example.com", "203.0.113.10", 300, Some(true));
        let b = rec("app.example.com", "203.0.113.10", 1, Some(true));
        assert!(a.equals_desired(&b, true));
    }

    #[test]
    fn hostname_targeting_content_is_case_insensitive() {
        let mut a = rec("alias.example.com", "Target.Example.com", 300, None);
        a.record_type = RecordType::Cname;
        let mut b = rec("alias.example.com", "target.example.com", 300, None);
        b.record_type = RecordType::Cname;
        assert!(a.equals_desired(&b, false));
    }

    #[test]
    fn synthesized_ids_are_stable_for_same_inputs() {
        let id1 = RecordId::synthesize_name_type("App.example.com.", RecordType::A);
        let id2 = RecordId::synthesize_name_type("app.example.com", RecordType::A);
        assert_eq!(id1, id2);
    }
}
