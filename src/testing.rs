use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::time::sleep;

use crate::{
    notify::{NotificationPayload, NotificationSink},
    runtime::{ContainerSnapshot, ContainerSummary, ImageSummary, RuntimeClient},
};

/// In-memory runtime with optional latency and listing failures.
#[derive(Default)]
pub struct FakeRuntime {
    pub containers: Vec<ContainerSummary>,
    pub images: Vec<ImageSummary>,
    pub snapshots: HashMap<String, ContainerSnapshot>,
    pub fail_container_listing: bool,
    pub fail_image_listing: bool,
    pub listing_delay: Option<Duration>,
}

impl FakeRuntime {
    pub fn with_container(mut self, id: &str, name: &str, image_id: &str, running: bool) -> Self {
        self.containers.push(ContainerSummary {
            id: id.to_owned(),
            image_id: image_id.to_owned(),
            state: String::from(if running { "running" } else { "exited" }),
        });
        self.snapshots.insert(id.to_owned(), ContainerSnapshot {
            id: id.to_owned(),
            name: name.to_owned(),
            image_id: image_id.to_owned(),
            running,
        });
        self
    }

    pub fn with_image(mut self, id: &str, repo_tags: &[&str]) -> Self {
        self.images.push(ImageSummary {
            id: id.to_owned(),
            repo_tags: repo_tags.iter().map(|tag| tag.to_string()).collect(),
        });
        self
    }

    /// Keeps the container in the listing but makes inspection fail.
    pub fn forget_snapshot(mut self, id: &str) -> Self {
        self.snapshots.remove(id);
        self
    }
}

#[async_trait]
impl RuntimeClient for FakeRuntime {
    async fn inspect_container(&self, id: &str) -> Result<ContainerSnapshot> {
        self.snapshots
            .get(id)
            .cloned()
            .ok_or(anyhow!("no such container: {id}"))
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        if let Some(delay) = self.listing_delay {
            sleep(delay).await;
        }

        if self.fail_container_listing {
            return Err(anyhow!("container listing unavailable"));
        }

        Ok(self.containers.clone())
    }

    async fn list_images(&self) -> Result<Vec<ImageSummary>> {
        if self.fail_image_listing {
            return Err(anyhow!("image listing unavailable"));
        }

        Ok(self.images.clone())
    }
}

/// Sink that remembers every payload it was handed.
#[derive(Clone, Default)]
pub struct RecordingSink {
    payloads: Arc<Mutex<Vec<NotificationPayload>>>,
    fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn payloads(&self) -> Vec<NotificationPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, payload: &NotificationPayload) -> Result<()> {
        self.payloads.lock().unwrap().push(payload.clone());

        if self.fail {
            return Err(anyhow!("webhook unreachable"));
        }

        Ok(())
    }
}
