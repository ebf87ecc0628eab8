//! Command-line/env surface, layered on top of `config/app.json` at
//! startup. Kept in the teacher's `clap` derive + `env_prefix!` idiom,
//! generalized from a single-provider NAT-helper flag set to the
//! multi-provider, multi-source configuration this crate needs.

#![allow(non_camel_case_types)]

use std::path::PathBuf;

use clap::Parser;

use trafego_core::config::{CliOverrides, DefaultRecordType, Loglevel, OperationMode, Ttl};

macro_rules! env_prefix {
    () => {
        "TRAFEGODNS_"
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding persisted state: policy lists, ownership ledgers
    /// and the configuration file.
    #[arg(
        long,
        default_value = "/var/lib/trafegodns",
        value_name = "PATH",
        env = concat!(env_prefix!(), "DATA_DIR")
    )]
    pub data_dir: PathBuf,

    /// Which source feeds the desired-hostname pipeline.
    #[arg(
        value_enum,
        short = 'm',
        long,
        env = concat!(env_prefix!(), "OPERATION_MODE")
    )]
    pub operation_mode: Option<OperationMode>,

    /// Set the loglevel of the application.
    #[arg(
        value_enum,
        short = 'l',
        long,
        default_value_t = Loglevel::Info,
        value_name = "LEVEL",
        env = concat!(env_prefix!(), "LOGLEVEL")
    )]
    pub loglevel: Loglevel,

    /// Only run one reconciliation cycle per provider, then exit.
    #[arg(long, default_value_t = false, action)]
    pub run_once: bool,

    /// Base poll interval in milliseconds; backoff applies on fetch errors.
    #[arg(long, env = concat!(env_prefix!(), "POLL_INTERVAL_MS"))]
    pub poll_interval_ms: Option<u64>,

    /// Implicit record type applied when labels/routers don't specify one.
    #[arg(value_enum, long, env = concat!(env_prefix!(), "DEFAULT_RECORD_TYPE"))]
    pub default_record_type: Option<DefaultRecordType>,

    /// TTL applied when labels/config omit one.
    #[arg(long, env = concat!(env_prefix!(), "DEFAULT_TTL"))]
    pub default_ttl: Option<Ttl>,

    /// Delete provider records this engine owns once their hostname is no
    /// longer in the desired set.
    #[arg(long, action, default_value_t = false, env = concat!(env_prefix!(), "CLEANUP_ORPHANED"))]
    pub cleanup_orphaned: bool,

    /// Do not make any changes to configured providers, only show what
    /// would happen.
    #[arg(long, short = 'd', action, default_value_t = false)]
    pub dry_run: bool,

    /// Prefix container labels must carry to be considered by this engine.
    #[arg(long, default_value = "trafegodns", env = concat!(env_prefix!(), "LABEL_PREFIX"))]
    pub generic_label_prefix: String,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            operation_mode: self.operation_mode,
            poll_interval_ms: self.poll_interval_ms,
            default_ttl: self.default_ttl,
            cleanup_orphaned: self.cleanup_orphaned,
        }
    }
}
