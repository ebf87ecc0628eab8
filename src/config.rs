//! Persisted configuration: `clap`-derived CLI/env flags layered on top of a
//! `serde`-deserialized `config/app.json` file, matching the layout the
//! persisted-state section of this crate's design names.
//!
//! `Loglevel`/its `From<Loglevel> for LevelFilter` impl and the `ValueEnum`
//! derive idiom are kept verbatim from the teacher's `bin/cli/mod.rs`; the
//! rest of this module is new, since the teacher has no multi-provider,
//! file-backed configuration layer of its own.

#![allow(non_camel_case_types)]

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    #[error("configuration file `{0}` is invalid: `{1}`")]
    Invalid(String, String),
    #[error("configuration directory is inaccessible: `{0}`")]
    Inaccessible(String),
}

/// Re-creation of `log::Level` since that enum doesn't derive `ValueEnum`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum Loglevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
impl From<Loglevel> for LevelFilter {
    fn from(ll: Loglevel) -> Self {
        match ll {
            Loglevel::Error => LevelFilter::Error,
            Loglevel::Warn => LevelFilter::Warn,
            Loglevel::Info => LevelFilter::Info,
            Loglevel::Debug => LevelFilter::Debug,
            Loglevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Which source feeds the desired-hostname pipeline. Exactly one poller is
/// active per process.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    Traefik,
    Direct,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultRecordType {
    A,
    Aaaa,
    Cname,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Cloudflare,
    Route53,
    Digitalocean,
    Unifi,
    Pihole,
}

pub type Ttl = u32;

/// Per-provider connection details. Only the fields the selected
/// `ProviderKind` needs are populated at runtime; the rest stay `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConnection {
    pub kind: Option<ProviderKind>,
    pub zone: Option<String>,
    pub api_token: Option<String>,
    pub account_id: Option<String>,
    pub tunnel_id: Option<String>,
    pub domain: Option<String>,
    pub base_url: Option<String>,
    pub site: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// The persisted subset of configuration, read from `<dataDir>/config/app.json`
/// and merged underneath whatever the CLI/env layer overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub operation_mode: OperationMode,
    pub poll_interval_ms: u64,
    pub cache_refresh_interval_ms: u64,
    pub default_record_type: DefaultRecordType,
    pub default_ttl: Ttl,
    pub default_proxied: bool,
    pub default_content: Option<String>,
    pub cleanup_orphaned: bool,
    pub api_timeout_ms: u64,
    pub generic_label_prefix: String,
    pub providers: Vec<ProviderConnection>,
}
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            operation_mode: OperationMode::Direct,
            poll_interval_ms: 60_000,
            cache_refresh_interval_ms: 300_000,
            default_record_type: DefaultRecordType::A,
            default_ttl: 300,
            default_proxied: false,
            default_content: None,
            cleanup_orphaned: false,
            api_timeout_ms: 60_000,
            generic_label_prefix: "trafegodns".to_string(),
            providers: Vec::new(),
        }
    }
}
impl AppConfig {
    /// Loads `<dataDir>/config/app.json`, falling back to defaults if the
    /// file does not exist yet (a fresh install).
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path(data_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)
            .map_err(|e| ConfigError::Inaccessible(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::Invalid(path.display().to_string(), e.to_string()))
    }

    pub fn save(&self, data_dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path(data_dir);
        let dir = path.parent().expect("config path always has a parent");
        fs::create_dir_all(dir).map_err(|e| ConfigError::Inaccessible(format!("{}: {e}", dir.display())))?;
        let serialized =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Invalid(path.display().to_string(), e.to_string()))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serialized).map_err(|e| ConfigError::Inaccessible(format!("{}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path).map_err(|e| ConfigError::Inaccessible(format!("{}: {e}", path.display())))?;
        Ok(())
    }

    fn path(data_dir: &Path) -> PathBuf {
        data_dir.join("config").join("app.json")
    }

    /// Applies any CLI/env overrides the operator passed at startup on top
    /// of the persisted file, CLI winning per the teacher's env-overridable-
    /// by-flag convention.
    pub fn merge_cli(mut self, cli: &crate::config::CliOverrides) -> Self {
        if let Some(mode) = cli.operation_mode {
            self.operation_mode = mode;
        }
        if let Some(interval) = cli.poll_interval_ms {
            self.poll_interval_ms = interval;
        }
        if let Some(ttl) = cli.default_ttl {
            self.default_ttl = ttl;
        }
        if cli.cleanup_orphaned {
            self.cleanup_orphaned = true;
        }
        self
    }
}

/// The subset of `AppConfig` fields an operator can override from the
/// command line; everything else is file-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub operation_mode: Option<OperationMode>,
    pub poll_interval_ms: Option<u64>,
    pub default_ttl: Option<Ttl>,
    pub cleanup_orphaned: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_config_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let cfg = AppConfig::load(dir.path()).unwrap();
        assert_eq!(cfg.generic_label_prefix, "trafegodns");
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let mut cfg = AppConfig::default();
        cfg.default_ttl = 120;
        cfg.save(dir.path()).unwrap();
        let reloaded = AppConfig::load(dir.path()).unwrap();
        assert_eq!(reloaded.default_ttl, 120);
    }

    #[test]
    fn cli_override_wins_over_file_value() {
        let cfg = AppConfig::default();
        let overrides = CliOverrides {
            default_ttl: Some(900),
            ..Default::default()
        };
        let merged = cfg.merge_cli(&overrides);
        assert_eq!(merged.default_ttl, 900);
    }
}
