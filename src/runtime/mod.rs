mod event;
mod image_ref;
pub mod naming;

use anyhow::Result;
use async_trait::async_trait;

pub use event::{EventKind, RuntimeEvent};
pub use image_ref::ImageRef;

/// Point-in-time inspection result for one container.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerSnapshot {
    pub id: String,
    /// Name as reported by the runtime, separator prefix included.
    pub name: String,
    pub image_id: String,
    pub running: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContainerSummary {
    pub id: String,
    pub image_id: String,
    pub state: String,
}

impl ContainerSummary {
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageSummary {
    pub id: String,
    pub repo_tags: Vec<String>,
}

/// Read-only view of the container runtime. Implementations must be safe to
/// call from many tasks at once.
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    async fn inspect_container(&self, id: &str) -> Result<ContainerSnapshot>;

    /// Lists every container, stopped ones included.
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>>;

    async fn list_images(&self) -> Result<Vec<ImageSummary>>;
}
