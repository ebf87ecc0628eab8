//! Route53 adapter: no update primitive (delete+create in one atomic change
//! batch), synthesized `name:type` ids, batch size capped at 100 per the
//! provider's own `ChangeResourceRecordSets` limit.
//!
//! The teacher repo has no AWS adapter of its own; this module is grounded
//! directly on the `aws-sdk-route53` crate's `ChangeResourceRecordSets`
//! shape (`Change`/`ChangeBatch`/`ChangeAction`/`ResourceRecordSet`), kept
//! in the teacher's style of one adapter module owning its own client and
//! implementing this engine's `Provider` trait.

use async_trait::async_trait;
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use aws_sdk_route53::Client;

use crate::provider::{EnsureOutcome, Provider, ProviderError, ProviderInfo, RecordChange};
use crate::types::{canonicalize_name, DesiredRecord, DnsRecord, RecordId, RecordType};

const MAX_BATCH_SIZE: usize = 100;

pub struct Route53Provider {
    client: Client,
    hosted_zone_id: String,
}

impl Route53Provider {
    pub fn new(client: Client, hosted_zone_id: String) -> Self {
        Self { client, hosted_zone_id }
    }
}

fn rr_type(t: RecordType) -> Result<RrType, ProviderError> {
    Ok(match t {
        RecordType::A => RrType::A,
        RecordType::Aaaa => RrType::Aaaa,
        RecordType::Cname => RrType::Cname,
        RecordType::Mx => RrType::Mx,
        RecordType::Ns => RrType::Ns,
        RecordType::Txt => RrType::Txt,
        RecordType::Srv => RrType::Srv,
        RecordType::Caa => RrType::Caa,
    })
}

fn record_type_of(t: &RrType) -> RecordType {
    match t {
        RrType::A => RecordType::A,
        RrType::Aaaa => RecordType::Aaaa,
        RrType::Cname => RecordType::Cname,
        RrType::Mx => RecordType::Mx,
        RrType::Ns => RecordType::Ns,
        RrType::Txt => RecordType::Txt,
        RrType::Srv => RecordType::Srv,
        RrType::Caa => RecordType::Caa,
        _ => RecordType::Txt,
    }
}

fn resource_record_value(record: &DnsRecord) -> String {
    match record.record_type {
        RecordType::Mx => format!("{} {}", record.aux.priority.unwrap_or(10), record.content),
        RecordType::Srv => format!(
            "{} {} {} {}",
            record.aux.priority.unwrap_or(10),
            record.aux.weight.unwrap_or(1),
            record.aux.port.unwrap_or(0),
            record.content
        ),
        RecordType::Txt => format!("\"{}\"", record.content),
        _ => record.content.clone(),
    }
}

fn to_record_set(record: &DnsRecord) -> Result<ResourceRecordSet, ProviderError> {
    let rr = ResourceRecord::builder()
        .value(resource_record_value(record))
        .build()
        .map_err(|e| ProviderError::Internal(e.to_string()))?;
    ResourceRecordSet::builder()
        .name(record.name.clone())
        .r#type(rr_type(record.record_type)?)
        .ttl(record.ttl as i64)
        .resource_records(rr)
        .build()
        .map_err(|e| ProviderError::Internal(e.to_string()))
}

/// Route53's SDK errors don't expose a typed status code the way a plain
/// REST adapter's do; classify from the service error message instead.
fn classify_send_error<E: std::fmt::Display>(e: &E) -> ProviderError {
    let msg = e.to_string();
    if msg.contains("AccessDenied") || msg.contains("not authorized") {
        ProviderError::Auth(msg)
    } else if msg.contains("Throttling") || msg.contains("LimitExceeded") {
        ProviderError::Quota(msg)
    } else {
        ProviderError::TransientIo(msg)
    }
}

fn change(action: ChangeAction, set: ResourceRecordSet) -> Change {
    Change::builder()
        .action(action)
        .resource_record_set(set)
        .build()
        .expect("action and resource_record_set are always set")
}

#[async_trait]
impl Provider for Route53Provider {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "route53",
            stable_ids: false,
            proxied: false,
            ttl_min: 1,
            ttl_max: 172800,
            supported_types: &[
                RecordType::A,
                RecordType::Aaaa,
                RecordType::Cname,
                RecordType::Mx,
                RecordType::Ns,
                RecordType::Txt,
                RecordType::Srv,
                RecordType::Caa,
            ],
            native_batch: true,
            supports_ownership_marker: false,
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.client
            .get_hosted_zone()
            .id(&self.hosted_zone_id)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| ProviderError::TransientIo(e.to_string()))
    }

    async fn refresh_record_cache(&self) -> Result<Vec<DnsRecord>, ProviderError> {
        let mut records = Vec::new();
        let mut next: Option<(String, Option<String>)> = None;
        loop {
            let mut req = self
                .client
                .list_resource_record_sets()
                .hosted_zone_id(&self.hosted_zone_id);
            if let Some((name, rtype)) = &next {
                req = req.start_record_name(name);
                if let Some(rtype) = rtype {
                    req = req.start_record_type(rtype.as_str().into());
                }
            }
            let resp = req
                .send()
                .await
                .map_err(|e| ProviderError::TransientIo(e.to_string()))?;
            for set in resp.resource_record_sets() {
                let Some(rtype) = set.r#type() else { continue };
                let rt = record_type_of(rtype);
                let ttl = set.ttl().unwrap_or(0) as u32;
                for rr in set.resource_records() {
                    let value = rr.value().to_string();
                    let name = canonicalize_name(set.name());
                    let id = RecordId::synthesize_name_type(&name, rt);
                    records.push(DnsRecord {
                        record_type: rt,
                        name: name.clone(),
                        content: value,
                        ttl,
                        proxied: None,
                        aux: Default::default(),
                        external_id: Some(id),
                    });
                }
            }
            if resp.is_truncated() {
                next = resp
                    .next_record_name()
                    .map(|n| (n.to_string(), resp.next_record_type().map(|t| t.as_str().to_string())));
            } else {
                break;
            }
        }
        Ok(records)
    }

    async fn create_record(&self, input: DesiredRecord) -> Result<DnsRecord, ProviderError> {
        let set = to_record_set(&input.record)?;
        let batch = ChangeBatch::builder()
            .changes(change(ChangeAction::Upsert, set))
            .build()
            .map_err(|e| ProviderError::Internal(e.to_string()))?;
        self.client
            .change_resource_record_sets()
            .hosted_zone_id(&self.hosted_zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| ProviderError::TransientIo(e.to_string()))?;
        Ok(input.record)
    }

    /// Route53 has no update primitive: every update is expressed as an
    /// UPSERT of the full record set, which Route53 applies atomically.
    async fn update_record(
        &self,
        _id: &RecordId,
        input: DesiredRecord,
    ) -> Result<DnsRecord, ProviderError> {
        self.create_record(input).await
    }

    async fn delete_record(&self, id: &RecordId) -> Result<bool, ProviderError> {
        let Some((name, type_str)) = id.as_str().split_once(':') else {
            return Err(ProviderError::Internal(format!("malformed synthesized id `{}`", id.as_str())));
        };
        let rt = match type_str {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CNAME" => RecordType::Cname,
            "MX" => RecordType::Mx,
            "NS" => RecordType::Ns,
            "TXT" => RecordType::Txt,
            "SRV" => RecordType::Srv,
            "CAA" => RecordType::Caa,
            other => return Err(ProviderError::Internal(format!("unknown record type `{other}`"))),
        };
        let existing = self
            .refresh_record_cache()
            .await?
            .into_iter()
            .find(|r| r.record_type == rt && canonicalize_name(&r.name) == canonicalize_name(name));
        let Some(existing) = existing else {
            return Ok(true);
        };
        let set = to_record_set(&existing)?;
        let batch = ChangeBatch::builder()
            .changes(change(ChangeAction::Delete, set))
            .build()
            .map_err(|e| ProviderError::Internal(e.to_string()))?;
        match self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(&self.hosted_zone_id)
            .change_batch(batch)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => Err(ProviderError::TransientIo(e.to_string())),
        }
    }

    /// Submits up to [`MAX_BATCH_SIZE`] changes as a single atomic
    /// `ChangeResourceRecordSets` call per chunk; larger batches are split
    /// into one call per chunk rather than one call per row.
    async fn batch_ensure_records(&self, changes: Vec<RecordChange>) -> Vec<EnsureOutcome> {
        let mut outcomes = Vec::with_capacity(changes.len());
        for chunk in changes.chunks(MAX_BATCH_SIZE) {
            let mut rows = Vec::with_capacity(chunk.len());
            let mut batch_changes = Vec::with_capacity(chunk.len());
            for c in chunk {
                match to_record_set(&c.desired().record) {
                    Ok(set) => {
                        batch_changes.push(change(ChangeAction::Upsert, set));
                        rows.push(Ok(c));
                    }
                    Err(e) => rows.push(Err(e)),
                }
            }

            if batch_changes.is_empty() {
                outcomes.extend(rows.into_iter().filter_map(Result::err).map(EnsureOutcome::Failed));
                continue;
            }

            let batch = match ChangeBatch::builder().set_changes(Some(batch_changes)).build() {
                Ok(b) => b,
                Err(e) => {
                    let err = ProviderError::Internal(e.to_string());
                    outcomes.extend(rows.iter().map(|_| EnsureOutcome::Failed(err.clone())));
                    continue;
                }
            };

            let result = self
                .client
                .change_resource_record_sets()
                .hosted_zone_id(&self.hosted_zone_id)
                .change_batch(batch)
                .send()
                .await;

            match result {
                Ok(_) => {
                    for row in rows {
                        outcomes.push(match row {
                            Ok(c) => match c {
                                RecordChange::Create(d) => EnsureOutcome::Created(d.record.clone()),
                                RecordChange::Update(_, d) => EnsureOutcome::Updated(d.record.clone()),
                            },
                            Err(e) => EnsureOutcome::Failed(e),
                        });
                    }
                }
                Err(e) => {
                    let taxonomy = classify_send_error(&e);
                    for row in rows {
                        outcomes.push(EnsureOutcome::Failed(match row {
                            Ok(_) => taxonomy.clone(),
                            Err(e) => e,
                        }));
                    }
                }
            }
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordAux;

    #[test]
    fn mx_resource_record_value_carries_priority_prefix() {
        let rec = DnsRecord {
            record_type: RecordType::Mx,
            name: "example.com".into(),
            content: "mail.example.com".into(),
            ttl: 300,
            proxied: None,
            aux: RecordAux { priority: Some(20), ..Default::default() },
            external_id: None,
        };
        assert_eq!(resource_record_value(&rec), "20 mail.example.com");
    }

    #[test]
    fn txt_value_is_quoted() {
        let rec = DnsRecord {
            record_type: RecordType::Txt,
            name: "example.com".into(),
            content: "hello world".into(),
            ttl: 300,
            proxied: None,
            aux: RecordAux::default(),
            external_id: None,
        };
        assert_eq!(resource_record_value(&rec), "\"hello world\"");
    }

    #[test]
    fn batches_larger_than_limit_are_split() {
        let changes: Vec<usize> = (0..250).collect();
        let chunks: Vec<_> = changes.chunks(MAX_BATCH_SIZE).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 100);
        assert_eq!(chunks[2].len(), 50);
    }
}
