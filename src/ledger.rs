//! Durable mapping from `(provider, type, name, content)` to ownership
//! metadata - the source of truth for "did this engine create this record".
//!
//! Adapted from the teacher's `registry.rs`: a `thiserror`-derived error
//! type with the same `From<String>` escape hatch, and the same
//! `#[cfg_attr(test, automock)]` trait-boundary idiom, but backed by an
//! atomically-rewritten JSON file rather than an in-memory TXT-record
//! inference (the JSON-vs-SQL choice is recorded in DESIGN.md).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::RecordType;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum LedgerError {
    #[error("ledger data directory is inaccessible: `{0}`")]
    Inaccessible(String),
    #[error("ledger file is corrupted: `{0}`")]
    Corrupted(String),
    #[error("internal ledger error: `{0}`")]
    Internal(String),
}
impl From<String> for LedgerError {
    fn from(s: String) -> Self {
        LedgerError::Internal(s)
    }
}

/// Key identifying a single ownership entry. `content` is part of the key
/// because providers that permit multi-value RRsets store one entry per
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnershipKey {
    pub record_type: RecordType,
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipEntry {
    pub created_by: CreatedBy,
    pub app_managed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatedBy {
    Engine,
    External,
}

/// Tracks ownership for a single provider. Construct one per provider via
/// [`OwnershipLedger::load`]; the ledger serializes writes for that provider
/// behind an internal mutex (the locking-order note in the concurrency
/// model puts this lock after the provider's reconcile mutex).
#[cfg_attr(test, automock)]
pub trait Ledger {
    fn track(&self, key: &OwnershipKey, app_managed: bool) -> Result<(), LedgerError>;
    fn untrack(&self, key: &OwnershipKey) -> Result<(), LedgerError>;
    fn is_owned(&self, key: &OwnershipKey) -> bool;
    fn list(&self) -> Vec<(OwnershipKey, OwnershipEntry)>;
    /// Upgrade a pre-existing entry's `app_managed` flag to `true` without
    /// ever touching `created_by`. Per the ownership-monotonicity invariant
    /// this never downgrades an entry that is already app-managed.
    fn adopt(&self, key: &OwnershipKey) -> Result<(), LedgerError>;
}

pub struct OwnershipLedger {
    path: PathBuf,
    entries: Mutex<HashMap<OwnershipKey, OwnershipEntry>>,
}

impl OwnershipLedger {
    /// Load (or create) the ledger file for one provider at
    /// `<data_dir>/ownership/<provider>.json`.
    pub fn load(data_dir: &Path, provider: &str) -> Result<Self, LedgerError> {
        let dir = data_dir.join("ownership");
        fs::create_dir_all(&dir)
            .map_err(|e| LedgerError::Inaccessible(format!("{}: {e}", dir.display())))?;
        let path = dir.join(format!("{provider}.json"));

        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|e| LedgerError::Inaccessible(format!("{}: {e}", path.display())))?;
            let list: Vec<(OwnershipKey, OwnershipEntry)> = serde_json::from_str(&raw)
                .map_err(|e| LedgerError::Corrupted(format!("{}: {e}", path.display())))?;
            list.into_iter().collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Write the current in-memory map to a temp file and rename it over the
    /// real path, so a crash mid-write never leaves a half-written ledger.
    fn persist(&self, entries: &HashMap<OwnershipKey, OwnershipEntry>) -> Result<(), LedgerError> {
        let list: Vec<(&OwnershipKey, &OwnershipEntry)> = entries.iter().collect();
        let serialized = serde_json::to_string_pretty(&list)
            .map_err(|e| LedgerError::Internal(e.to_string()))?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized)
            .map_err(|e| LedgerError::Inaccessible(format!("{}: {e}", tmp_path.display())))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| LedgerError::Inaccessible(format!("{}: {e}", self.path.display())))?;
        Ok(())
    }
}

impl Ledger for OwnershipLedger {
    fn track(&self, key: &OwnershipKey, app_managed: bool) -> Result<(), LedgerError> {
        let mut entries = self.entries.lock().expect("ledger mutex poisoned");
        let now = Utc::now();
        entries
            .entry(key.clone())
            .and_modify(|e| {
                // Monotonicity: never silently downgrade an app-managed entry.
                e.app_managed = e.app_managed || app_managed;
                e.updated_at = now;
            })
            .or_insert(OwnershipEntry {
                created_by: CreatedBy::Engine,
                app_managed,
                created_at: now,
                updated_at: now,
            });
        self.persist(&entries)
    }

    fn untrack(&self, key: &OwnershipKey) -> Result<(), LedgerError> {
        let mut entries = self.entries.lock().expect("ledger mutex poisoned");
        entries.remove(key);
        self.persist(&entries)
    }

    fn is_owned(&self, key: &OwnershipKey) -> bool {
        let entries = self.entries.lock().expect("ledger mutex poisoned");
        entries
            .get(key)
            .is_some_and(|e| e.created_by == CreatedBy::Engine && e.app_managed)
    }

    fn list(&self) -> Vec<(OwnershipKey, OwnershipEntry)> {
        let entries = self.entries.lock().expect("ledger mutex poisoned");
        entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn adopt(&self, key: &OwnershipKey) -> Result<(), LedgerError> {
        let mut entries = self.entries.lock().expect("ledger mutex poisoned");
        let now = Utc::now();
        if let Some(entry) = entries.get_mut(key) {
            if !entry.app_managed {
                entry.app_managed = true;
                entry.updated_at = now;
            }
        } else {
            entries.insert(
                key.clone(),
                OwnershipEntry {
                    created_by: CreatedBy::External,
                    app_managed: true,
                    created_at: now,
                    updated_at: now,
                },
            );
        }
        self.persist(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn key(name: &str) -> OwnershipKey {
        OwnershipKey {
            record_type: RecordType::A,
            name: name.to_string(),
            content: "203.0.113.10".to_string(),
        }
    }

    #[test]
    fn tracked_record_is_owned() {
        let dir = tempdir().unwrap();
        let ledger = OwnershipLedger::load(dir.path(), "cloudflare").unwrap();
        let k = key("app.example.com");
        ledger.track(&k, true).unwrap();
        assert!(ledger.is_owned(&k));
    }

    #[test]
    fn untracked_record_is_not_owned() {
        let dir = tempdir().unwrap();
        let ledger = OwnershipLedger::load(dir.path(), "cloudflare").unwrap();
        let k = key("app.example.com");
        ledger.track(&k, true).unwrap();
        ledger.untrack(&k).unwrap();
        assert!(!ledger.is_owned(&k));
    }

    #[test]
    fn ledger_survives_reload_from_disk() {
        let dir = tempdir().unwrap();
        let k = key("app.example.com");
        {
            let ledger = OwnershipLedger::load(dir.path(), "cloudflare").unwrap();
            ledger.track(&k, true).unwrap();
        }
        let reloaded = OwnershipLedger::load(dir.path(), "cloudflare").unwrap();
        assert!(reloaded.is_owned(&k));
    }

    #[test]
    fn track_never_downgrades_app_managed() {
        let dir = tempdir().unwrap();
        let ledger = OwnershipLedger::load(dir.path(), "cloudflare").unwrap();
        let k = key("app.example.com");
        ledger.track(&k, true).unwrap();
        ledger.track(&k, false).unwrap();
        assert!(ledger.is_owned(&k));
    }

    #[test]
    fn adopt_marks_externally_created_record_as_app_managed_but_not_engine_created() {
        let dir = tempdir().unwrap();
        let ledger = OwnershipLedger::load(dir.path(), "cloudflare").unwrap();
        let k = key("app.example.com");
        ledger.adopt(&k).unwrap();
        // app_managed, but created_by remains External so orphan cleanup must not treat it as owned.
        assert!(!ledger.is_owned(&k));
    }
}
