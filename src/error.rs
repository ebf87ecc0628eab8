//! Shared error taxonomy. Every per-module error type (`ProviderError`,
//! `LedgerError`, `PolicyError`, `ParseError`, `PollError`) carries enough
//! information for the reconciler to dispatch on taxonomy regardless of
//! which module raised it, without every module having to agree on one
//! giant enum.

use std::fmt;

/// The error categories described in the error handling design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network timeout, 5xx, connection reset. Safe to retry within a cycle.
    TransientIo,
    /// Invalid credentials, 401/403. Marks the adapter degraded.
    Auth,
    /// Rate limit. Backs off the cycle and retries next tick.
    Quota,
    /// Desired record fails type-specific validation. Dropped with a
    /// per-record error; the cycle continues.
    Validation,
    /// Provider returned "already exists" on create.
    RecordExists,
    /// Delete or update target is missing.
    NotFound,
    /// Provider does not support the requested record type.
    UnsupportedType,
    /// Target hostname is outside the adapter's configured zone.
    OutOfZone,
    /// Policy-store duplicate, or two desired records collide irreconcilably.
    Conflict,
    /// Configuration invalid, data directory inaccessible, ledger corrupted
    /// beyond repair. The process should exit non-zero after clean shutdown.
    Fatal,
}
impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::TransientIo => "transient_io",
            ErrorKind::Auth => "auth",
            ErrorKind::Quota => "quota",
            ErrorKind::Validation => "validation",
            ErrorKind::RecordExists => "record_exists",
            ErrorKind::NotFound => "not_found",
            ErrorKind::UnsupportedType => "unsupported_type",
            ErrorKind::OutOfZone => "out_of_zone",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Fatal => "fatal",
        };
        write!(f, "{s}")
    }
}

/// Implemented by every per-module error type so the reconciler can
/// dispatch on taxonomy without matching on each concrete error type.
pub trait Taxonomy {
    fn kind(&self) -> ErrorKind;
}
