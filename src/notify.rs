use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use reqwest::{header, Client};
use serde::Serialize;

use crate::runtime::ImageRef;

const FORM_MIME: &str = "application/x-www-form-urlencoded";
const WEBHOOK_URL: &str = "http://127.0.0.1:8080/webadmin/Docker/Docker";
const WEBHOOK_USERNAME: &str = "admin";
const WEBHOOK_PASSWORD: &str = "admin";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    StartContainer,
    StopContainer,
    ContainerInfos,
}

/// Form body posted to the webhook.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub action: Action,
    pub id: String,
    pub name: String,
    pub image_repo: String,
    pub image_tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
}

impl NotificationPayload {
    pub fn new(action: Action, id: String, name: String, image: ImageRef) -> Self {
        Self {
            action,
            id,
            name,
            image_repo: image.repository,
            image_tag: image.tag,
            running: None,
        }
    }

    pub fn with_running(mut self, running: bool) -> Self {
        self.running = Some(running);
        self
    }
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one payload. Errors are for logging only, nothing retries.
    async fn send(&self, payload: &NotificationPayload) -> Result<()>;
}

#[derive(Clone)]
pub struct WebhookTarget {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl Default for WebhookTarget {
    /// The co-located admin panel's Docker plugin.
    fn default() -> Self {
        Self {
            url: String::from(WEBHOOK_URL),
            username: String::from(WEBHOOK_USERNAME),
            password: String::from(WEBHOOK_PASSWORD),
        }
    }
}

pub struct WebhookNotifier {
    target: WebhookTarget,
    client: Client,
}

impl WebhookNotifier {
    /// Falls back to a default client when none is supplied.
    pub fn new(target: WebhookTarget, client: Option<Client>) -> Self {
        Self {
            target,
            client: client.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl NotificationSink for WebhookNotifier {
    async fn send(&self, payload: &NotificationPayload) -> Result<()> {
        debug!("Posting {:?} for container {} to {}. ", payload.action, payload.id, self.target.url);

        let response = self.client
            .post(&self.target.url)
            .header(header::CONTENT_TYPE, FORM_MIME)
            .basic_auth(&self.target.username, Some(&self.target.password))
            .form(payload)
            .send()
            .await?;

        response.error_for_status()?;

        Ok(())
    }
}
