//! Conversions between the engine's [`DnsRecord`] and the `cloudflare`
//! crate's wire types. Adapted from the teacher's
//! `provider/cloudflare/util.rs`, extended to the full set of record types
//! this engine supports rather than just `A`/`AAAA`/`TXT`.

use std::net::{Ipv4Addr, Ipv6Addr};

use cloudflare::endpoints::dns;
use cloudflare::framework::response::ApiFailure;

use crate::provider::ProviderError;
use crate::types::{DnsRecord, RecordAux, RecordId, RecordType};

impl From<ApiFailure> for ProviderError {
    fn from(f: ApiFailure) -> Self {
        match f {
            ApiFailure::Error(status, errs) => {
                let msg = format!("[{status}] {:?}", errs.errors);
                match status.as_u16() {
                    401 | 403 => ProviderError::Auth(msg),
                    429 => ProviderError::Quota(msg),
                    404 => ProviderError::NotFound(msg),
                    500..=599 => ProviderError::TransientIo(msg),
                    _ => ProviderError::Internal(msg),
                }
            }
            ApiFailure::Invalid(e) => ProviderError::TransientIo(e.to_string()),
        }
    }
}

pub fn record_type_of(content: &dns::DnsContent) -> RecordType {
    match content {
        dns::DnsContent::A { .. } => RecordType::A,
        dns::DnsContent::AAAA { .. } => RecordType::Aaaa,
        dns::DnsContent::CNAME { .. } => RecordType::Cname,
        dns::DnsContent::NS { .. } => RecordType::Ns,
        dns::DnsContent::MX { .. } => RecordType::Mx,
        dns::DnsContent::TXT { .. } => RecordType::Txt,
        dns::DnsContent::SRV { .. } => RecordType::Srv,
        _ => RecordType::Txt,
    }
}

pub fn try_record_from_api(r: &dns::DnsRecord) -> Result<DnsRecord, String> {
    let (content, aux) = content_string(&r.content)?;
    Ok(DnsRecord {
        record_type: record_type_of(&r.content),
        name: r.name.clone(),
        content,
        ttl: r.ttl,
        proxied: r.proxied,
        aux,
        external_id: Some(RecordId::External(r.id.clone())),
    })
}

fn content_string(content: &dns::DnsContent) -> Result<(String, RecordAux), String> {
    Ok(match content {
        dns::DnsContent::A { content } => (content.to_string(), RecordAux::default()),
        dns::DnsContent::AAAA { content } => (content.to_string(), RecordAux::default()),
        dns::DnsContent::CNAME { content } => (content.clone(), RecordAux::default()),
        dns::DnsContent::NS { content } => (content.clone(), RecordAux::default()),
        dns::DnsContent::TXT { content } => (content.clone(), RecordAux::default()),
        dns::DnsContent::MX { content, priority } => (
            content.clone(),
            RecordAux {
                priority: Some(*priority),
                ..Default::default()
            },
        ),
        dns::DnsContent::SRV { content } => (content.clone(), RecordAux::default()),
        other => return Err(format!("unsupported Cloudflare record content: {other:?}")),
    })
}

/// Converts an engine record into the wire content the `cloudflare` crate
/// expects. Returns an error for record types this engine still models but
/// which the pinned `cloudflare` crate version doesn't expose a typed
/// variant for (`CAA`).
pub fn to_api_content(record: &DnsRecord) -> Result<dns::DnsContent, ProviderError> {
    Ok(match record.record_type {
        RecordType::A => dns::DnsContent::A {
            content: record
                .content
                .parse::<Ipv4Addr>()
                .map_err(|e| ProviderError::Validation(e.to_string()))?,
        },
        RecordType::Aaaa => dns::DnsContent::AAAA {
            content: record
                .content
                .parse::<Ipv6Addr>()
                .map_err(|e| ProviderError::Validation(e.to_string()))?,
        },
        RecordType::Cname => dns::DnsContent::CNAME {
            content: record.content.clone(),
        },
        RecordType::Ns => dns::DnsContent::NS {
            content: record.content.clone(),
        },
        RecordType::Txt => dns::DnsContent::TXT {
            content: record.content.clone(),
        },
        RecordType::Mx => dns::DnsContent::MX {
            content: record.content.clone(),
            priority: record.aux.priority.unwrap_or(10),
        },
        RecordType::Srv => dns::DnsContent::SRV {
            content: record.content.clone(),
        },
        RecordType::Caa => {
            return Err(ProviderError::UnsupportedType(RecordType::Caa));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_caa_is_rejected_with_taxonomy() {
        use crate::error::Taxonomy;
        let rec = DnsRecord {
            record_type: RecordType::Caa,
            name: "example.com".into(),
            content: "0 issue \"letsencrypt.org\"".into(),
            ttl: 300,
            proxied: None,
            aux: RecordAux::default(),
            external_id: None,
        };
        let err = to_api_content(&rec).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::UnsupportedType);
    }

    #[test]
    fn roundtrips_a_record_content() {
        let content = dns::DnsContent::A {
            content: "203.0.113.10".parse().unwrap(),
        };
        let (s, _) = content_string(&content).unwrap();
        assert_eq!(s, "203.0.113.10");
    }
}
