use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::{
    notify::{Action, NotificationPayload, NotificationSink},
    runtime::{naming::display_name, ContainerSummary, ImageRef, ImageSummary, RuntimeClient},
};

/// Reports every known container to the webhook on demand.
pub struct Inventory {
    runtime: Arc<dyn RuntimeClient>,
    sink: Arc<dyn NotificationSink>,
}

impl Inventory {
    pub fn new(runtime: Arc<dyn RuntimeClient>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            runtime,
            sink,
        }
    }

    /// Runs an enumeration in the background and logs its outcome.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<Result<usize>> {
        let inventory = Arc::clone(self);
        tokio::spawn(async move {
            let result = inventory.enumerate().await;
            match &result {
                Ok(sent) => info!("Reported {sent} container(s). "),
                Err(e) => warn!("Failed to enumerate containers: {e:#}. "),
            }
            result
        })
    }

    /// Sends one `containerInfos` notification per container, in listing
    /// order. Returns how many were delivered.
    pub async fn enumerate(&self) -> Result<usize> {
        let containers = self.runtime.list_containers().await.context("failed to list containers")?;
        let images = self.runtime.list_images().await.context("failed to list images")?;

        debug!("Enumerating {} container(s) against {} image(s). ", containers.len(), images.len());

        let mut sent = 0;
        for container in &containers {
            let payload = self.describe(container, &images).await;
            match self.sink.send(&payload).await {
                Ok(()) => sent += 1,
                Err(e) => warn!("Failed to report container {}: {e}. ", container.id),
            }
        }

        Ok(sent)
    }

    async fn describe(&self, container: &ContainerSummary, images: &[ImageSummary]) -> NotificationPayload {
        let (name, image_id, running) = match self.runtime.inspect_container(&container.id).await {
            Ok(snapshot) => (
                display_name(&snapshot.name).to_owned(),
                snapshot.image_id,
                snapshot.running,
            ),
            Err(e) => {
                warn!("Failed to inspect container {}: {e}. ", container.id);
                (String::new(), container.image_id.clone(), container.is_running())
            },
        };

        let image = images
            .iter()
            .find(|image| image.id == image_id)
            .and_then(|image| image.repo_tags.first())
            .map(|tag| ImageRef::parse(tag))
            .unwrap_or_default();

        NotificationPayload::new(Action::ContainerInfos, container.id.clone(), name, image)
            .with_running(running)
    }
}
