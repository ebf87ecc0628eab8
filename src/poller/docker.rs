//! Direct container poller: enumerates running containers via the Docker
//! API, filters to those carrying relevant labels, and emits
//! `docker:labels:updated` on any change from the previous snapshot.
//!
//! Uses `bollard`, the idiomatic async Docker client, since the teacher
//! repo has no container-runtime collaborator of its own.

use std::collections::HashMap;
use std::time::Duration;

use bollard::container::ListContainersOptions;
use bollard::Docker;
use log::{error, info};

use crate::event_bus::{topics, EventBus};
use crate::poller::BackoffTracker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSnapshot {
    pub container_id: String,
    pub labels: HashMap<String, String>,
}

pub struct DockerPoller {
    docker: Docker,
    bus: EventBus,
    generic_label_prefix: String,
    last_snapshot: Vec<ContainerSnapshot>,
    backoff: BackoffTracker,
}

impl DockerPoller {
    pub fn new(docker: Docker, bus: EventBus, generic_label_prefix: String, base_interval: Duration) -> Self {
        Self {
            docker,
            bus,
            generic_label_prefix,
            last_snapshot: Vec::new(),
            backoff: BackoffTracker::new(base_interval),
        }
    }

    /// Enumerates containers, filters to ones carrying at least one label
    /// under `generic_label_prefix`, and publishes a change event if the
    /// filtered set differs from the previous poll.
    pub async fn poll_once(&mut self) -> Duration {
        let options = ListContainersOptions::<String> {
            all: false,
            ..Default::default()
        };
        match self.docker.list_containers(Some(options)).await {
            Ok(containers) => {
                let snapshot = filter_relevant(containers, &self.generic_label_prefix);
                self.backoff.on_success();
                if snapshot != self.last_snapshot {
                    info!("docker poller observed a label change across {} containers", snapshot.len());
                    self.bus.publish(
                        topics::DOCKER_LABELS_UPDATED,
                        serde_json::json!({ "containers": snapshot.len() }),
                    );
                    self.last_snapshot = snapshot;
                }
            }
            Err(e) => {
                error!("docker poll failed (consecutive errors: {}): {e}", self.backoff.consecutive_errors() + 1);
                self.backoff.on_error();
            }
        }
        self.backoff.next_delay()
    }

    pub fn snapshot(&self) -> &[ContainerSnapshot] {
        &self.last_snapshot
    }
}

fn filter_relevant(
    containers: Vec<bollard::models::ContainerSummary>,
    prefix: &str,
) -> Vec<ContainerSnapshot> {
    let needle = format!("{prefix}.");
    containers
        .into_iter()
        .filter_map(|c| {
            let labels = c.labels.unwrap_or_default();
            if !labels.keys().any(|k| k.starts_with(&needle)) {
                return None;
            }
            Some(ContainerSnapshot {
                container_id: c.id.unwrap_or_default(),
                labels,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bollard::models::ContainerSummary;

    fn container(id: &str, labels: &[(&str, &str)]) -> ContainerSummary {
        ContainerSummary {
            id: Some(id.to_string()),
            labels: Some(labels.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn containers_without_relevant_labels_are_filtered_out() {
        let containers = vec![container("c1", &[("com.docker.compose.project", "x")])];
        let out = filter_relevant(containers, "trafegodns");
        assert!(out.is_empty());
    }

    #[test]
    fn containers_with_relevant_labels_are_kept() {
        let containers = vec![container("c1", &[("trafegodns.cloudflare.app.example.com.type", "A")])];
        let out = filter_relevant(containers, "trafegodns");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].container_id, "c1");
    }
}
