//! Preserved-hostname patterns and explicit managed-hostname records.
//!
//! Adapted from the teacher's policy-adjacent pieces (`config.rs`'s
//! `ValueEnum` derives and `registry.rs`'s `thiserror`/`From<String>` idiom)
//! since the teacher has no concept of preserved/managed hostnames of its
//! own - this module is built fresh in that idiom, persisted as the two
//! JSON files the persisted-state layout names
//! (`policy/preserved.json`, `policy/managed.json`).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{canonicalize_name, DesiredRecord};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum PolicyError {
    #[error("pattern `{0}` is not a valid DNS name or `*.suffix` wildcard")]
    InvalidPattern(String),
    #[error("`{0}` already exists")]
    AlreadyExists(String),
    #[error("`{0}` was not found")]
    NotFound(String),
    #[error("internal policy store error: `{0}`")]
    Internal(String),
}
impl From<String> for PolicyError {
    fn from(s: String) -> Self {
        PolicyError::Internal(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreservedPattern {
    Literal(String),
    WildcardSuffix(String),
}
impl PreservedPattern {
    fn parse(pattern: &str) -> Result<Self, PolicyError> {
        let pattern = pattern.trim();
        if let Some(suffix) = pattern.strip_prefix("*.") {
            if suffix.is_empty() || !is_valid_dns_name(suffix) {
                return Err(PolicyError::InvalidPattern(pattern.to_string()));
            }
            Ok(PreservedPattern::WildcardSuffix(canonicalize_name(suffix)))
        } else if is_valid_dns_name(pattern) {
            Ok(PreservedPattern::Literal(canonicalize_name(pattern)))
        } else {
            Err(PolicyError::InvalidPattern(pattern.to_string()))
        }
    }

    fn matches(&self, fqdn: &str) -> bool {
        let fqdn = canonicalize_name(fqdn);
        match self {
            PreservedPattern::Literal(l) => *l == fqdn,
            PreservedPattern::WildcardSuffix(suffix) => fqdn.ends_with(&format!(".{suffix}")),
        }
    }

    fn as_str(&self) -> String {
        match self {
            PreservedPattern::Literal(l) => l.clone(),
            PreservedPattern::WildcardSuffix(s) => format!("*.{s}"),
        }
    }
}

/// A label is a valid DNS label if it is non-empty, <=63 chars, and contains
/// only alphanumerics and hyphens (no leading/trailing hyphen). A name is
/// valid if every dot-separated label is valid.
fn is_valid_dns_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 253 {
        return false;
    }
    name.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

#[derive(Serialize, Deserialize)]
struct PersistedState {
    preserved: Vec<String>,
    managed: Vec<StoredManagedRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredManagedRecord {
    record_type: String,
    name: String,
    content: String,
    ttl: u32,
    proxied: Option<bool>,
}

pub struct PolicyStore {
    preserved_path: PathBuf,
    managed_path: PathBuf,
    state: RwLock<(Vec<PreservedPattern>, Vec<DesiredRecord>)>,
}

impl PolicyStore {
    pub fn load(data_dir: &Path) -> Result<Self, PolicyError> {
        let dir = data_dir.join("policy");
        fs::create_dir_all(&dir).map_err(|e| PolicyError::Internal(e.to_string()))?;
        let preserved_path = dir.join("preserved.json");
        let managed_path = dir.join("managed.json");

        let preserved = if preserved_path.exists() {
            let raw = fs::read_to_string(&preserved_path).map_err(|e| PolicyError::Internal(e.to_string()))?;
            let list: Vec<String> = serde_json::from_str(&raw).map_err(|e| PolicyError::Internal(e.to_string()))?;
            list.iter()
                .map(|p| PreservedPattern::parse(p))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            Vec::new()
        };

        let managed = if managed_path.exists() {
            let raw = fs::read_to_string(&managed_path).map_err(|e| PolicyError::Internal(e.to_string()))?;
            let stored: Vec<StoredManagedRecord> =
                serde_json::from_str(&raw).map_err(|e| PolicyError::Internal(e.to_string()))?;
            stored.into_iter().map(desired_from_stored).collect()
        } else {
            Vec::new()
        };

        Ok(Self {
            preserved_path,
            managed_path,
            state: RwLock::new((preserved, managed)),
        })
    }

    pub fn get_preserved_hostnames(&self) -> Vec<String> {
        self.state.read().unwrap().0.iter().map(|p| p.as_str()).collect()
    }

    pub fn add_preserved_hostname(&self, pattern: &str) -> Result<(), PolicyError> {
        let parsed = PreservedPattern::parse(pattern)?;
        let mut state = self.state.write().unwrap();
        if state.0.contains(&parsed) {
            return Err(PolicyError::AlreadyExists(pattern.to_string()));
        }
        state.0.push(parsed);
        self.persist_preserved(&state.0)
    }

    pub fn remove_preserved_hostname(&self, pattern: &str) -> Result<(), PolicyError> {
        let parsed = PreservedPattern::parse(pattern)?;
        let mut state = self.state.write().unwrap();
        let before = state.0.len();
        state.0.retain(|p| *p != parsed);
        if state.0.len() == before {
            return Err(PolicyError::NotFound(pattern.to_string()));
        }
        self.persist_preserved(&state.0)
    }

    pub fn should_preserve_hostname(&self, fqdn: &str) -> bool {
        self.state.read().unwrap().0.iter().any(|p| p.matches(fqdn))
    }

    pub fn get_managed_hostnames(&self) -> Vec<DesiredRecord> {
        self.state.read().unwrap().1.clone()
    }

    pub fn add_managed_hostname(&self, record: DesiredRecord) -> Result<(), PolicyError> {
        let mut state = self.state.write().unwrap();
        let name = canonicalize_name(&record.record.name);
        if state.1.iter().any(|r| canonicalize_name(&r.record.name) == name) {
            return Err(PolicyError::AlreadyExists(name));
        }
        state.1.push(record);
        self.persist_managed(&state.1)
    }

    pub fn remove_managed_hostname(&self, fqdn: &str) -> Result<(), PolicyError> {
        let mut state = self.state.write().unwrap();
        let name = canonicalize_name(fqdn);
        let before = state.1.len();
        state.1.retain(|r| canonicalize_name(&r.record.name) != name);
        if state.1.len() == before {
            return Err(PolicyError::NotFound(fqdn.to_string()));
        }
        self.persist_managed(&state.1)
    }

    fn persist_preserved(&self, patterns: &[PreservedPattern]) -> Result<(), PolicyError> {
        let list: Vec<String> = patterns.iter().map(|p| p.as_str()).collect();
        atomic_write_json(&self.preserved_path, &list)
    }

    fn persist_managed(&self, records: &[DesiredRecord]) -> Result<(), PolicyError> {
        let stored: Vec<StoredManagedRecord> = records.iter().map(stored_from_desired).collect();
        atomic_write_json(&self.managed_path, &stored)
    }
}

fn atomic_write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PolicyError> {
    let serialized = serde_json::to_string_pretty(value).map_err(|e| PolicyError::Internal(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serialized).map_err(|e| PolicyError::Internal(e.to_string()))?;
    fs::rename(&tmp, path).map_err(|e| PolicyError::Internal(e.to_string()))?;
    Ok(())
}

fn stored_from_desired(d: &DesiredRecord) -> StoredManagedRecord {
    StoredManagedRecord {
        record_type: d.record.record_type.to_string(),
        name: d.record.name.clone(),
        content: d.record.content.clone(),
        ttl: d.record.ttl,
        proxied: d.record.proxied,
    }
}

fn desired_from_stored(s: StoredManagedRecord) -> DesiredRecord {
    use crate::types::{DnsRecord, RecordAux, RecordType, Source};
    let record_type = match s.record_type.as_str() {
        "A" => RecordType::A,
        "AAAA" => RecordType::Aaaa,
        "CNAME" => RecordType::Cname,
        "MX" => RecordType::Mx,
        "NS" => RecordType::Ns,
        "TXT" => RecordType::Txt,
        "SRV" => RecordType::Srv,
        "CAA" => RecordType::Caa,
        other => panic!("unknown persisted record type `{other}`"),
    };
    DesiredRecord {
        record: DnsRecord {
            record_type,
            name: s.name.clone(),
            content: s.content,
            ttl: s.ttl,
            proxied: s.proxied,
            aux: RecordAux::default(),
            external_id: None,
        },
        source: Source::Managed,
        source_id: "managed".to_string(),
        needs_ip_lookup: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn literal_pattern_matches_only_exact_fqdn() {
        let dir = tempdir().unwrap();
        let store = PolicyStore::load(dir.path()).unwrap();
        store.add_preserved_hostname("keep.example.com").unwrap();
        assert!(store.should_preserve_hostname("Keep.Example.com."));
        assert!(!store.should_preserve_hostname("other.example.com"));
    }

    #[test]
    fn wildcard_suffix_matches_any_depth_but_not_bare_suffix_mismatch() {
        let dir = tempdir().unwrap();
        let store = PolicyStore::load(dir.path()).unwrap();
        store.add_preserved_hostname("*.a.b").unwrap();
        assert!(store.should_preserve_hostname("x.a.b"));
        assert!(store.should_preserve_hostname("y.x.a.b"));
        assert!(!store.should_preserve_hostname("a.b"));
        assert!(!store.should_preserve_hostname("z.b"));
    }

    #[test]
    fn duplicate_pattern_is_rejected() {
        let dir = tempdir().unwrap();
        let store = PolicyStore::load(dir.path()).unwrap();
        store.add_preserved_hostname("keep.example.com").unwrap();
        assert!(matches!(
            store.add_preserved_hostname("keep.example.com"),
            Err(PolicyError::AlreadyExists(_))
        ));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let dir = tempdir().unwrap();
        let store = PolicyStore::load(dir.path()).unwrap();
        assert!(matches!(
            store.add_preserved_hostname("*."),
            Err(PolicyError::InvalidPattern(_))
        ));
    }

    #[test]
    fn policy_store_survives_reload() {
        let dir = tempdir().unwrap();
        {
            let store = PolicyStore::load(dir.path()).unwrap();
            store.add_preserved_hostname("keep.example.com").unwrap();
        }
        let reloaded = PolicyStore::load(dir.path()).unwrap();
        assert!(reloaded.should_preserve_hostname("keep.example.com"));
    }
}
