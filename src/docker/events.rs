use std::{collections::HashMap, sync::Arc};

use anyhow::{anyhow, Result};
use bytes::{Buf, BytesMut};
use hyper::{body::HttpBody, Method, StatusCode};
use log::{debug, info, warn};
use serde::Deserialize;
use url::form_urlencoded::byte_serialize;

use crate::{
    docker::api::make_request,
    runtime::RuntimeEvent,
    translator::EventTranslator,
};

const CONTAINER_FILTER: &str = r#"{"type":["container"]}"#;

/// One line of the Engine's `/events` stream. Engines before API 1.44 send
/// `status`/`id`/`from`, newer ones only `Action` and `Actor`.
#[derive(Deserialize)]
struct EventMessage {
    status: Option<String>,
    id: Option<String>,
    from: Option<String>,

    #[serde(rename = "Type")]
    kind: Option<String>,

    #[serde(rename = "Action")]
    action: Option<String>,

    #[serde(rename = "Actor")]
    actor: Option<EventActor>,
}

#[derive(Deserialize)]
struct EventActor {
    #[serde(rename = "ID")]
    id: Option<String>,

    #[serde(rename = "Attributes", default)]
    attributes: HashMap<String, String>,
}

impl EventMessage {
    fn into_event(self) -> Option<RuntimeEvent> {
        if self.kind.as_deref().is_some_and(|kind| kind != "container") {
            return None;
        }

        let status = self.status.or(self.action)?;
        let kind = match status.parse() {
            Ok(kind) => kind,
            Err(e) => {
                debug!("Ignoring Docker event: {e}. ");
                return None;
            },
        };

        let (actor_id, actor_image) = match self.actor {
            Some(mut actor) => (actor.id, actor.attributes.remove("image")),
            None => (None, None),
        };

        Some(RuntimeEvent {
            kind,
            id: self.id.or(actor_id)?,
            from: self.from.or(actor_image).unwrap_or_default(),
        })
    }
}

/// Splits the newline-delimited JSON event stream into events, whatever the
/// chunk boundaries.
#[derive(Default)]
pub struct EventDecoder {
    buffer: BytesMut,
}

impl EventDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<RuntimeEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = vec![];
        while let Some(end) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let line = self.buffer.split_to(end);
            self.buffer.advance(1);

            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let message: EventMessage = match serde_json::from_slice(&line) {
                Ok(message) => message,
                Err(e) => {
                    warn!("Failed to parse Docker event: {e}. ");
                    continue;
                },
            };

            events.extend(message.into_event());
        }

        events
    }
}

fn events_uri() -> String {
    let filters: String = byte_serialize(CONTAINER_FILTER.as_bytes()).collect();
    format!("/events?filters={filters}")
}

/// Subscribes to container events and hands each one to the translator on its
/// own task. Only returns when the subscription fails or the stream ends.
pub async fn monitor_events(socket: &str, translator: Arc<EventTranslator>) -> Result<()> {
    let response = make_request(socket, Method::GET, &events_uri()).await?;

    if response.status() != StatusCode::OK {
        return Err(anyhow!("Docker API returned non-OK status code: {}", response.status().as_u16()));
    }

    info!("Subscribed to Docker events on {socket}. ");

    let mut body = response.into_body();
    let mut decoder = EventDecoder::default();
    while let Some(chunk) = body.data().await {
        for event in decoder.push(&chunk?) {
            let translator = Arc::clone(&translator);
            tokio::spawn(async move {
                translator.handle(event).await;
            });
        }
    }

    Err(anyhow!("Docker event stream closed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::EventKind;

    const LEGACY_START: &str = r#"{"status":"start","id":"c1","from":"nginx:1.25","Type":"container","Action":"start","Actor":{"ID":"c1","Attributes":{"image":"nginx:1.25","name":"web"}},"time":1700000000}"#;
    const MODERN_DIE: &str = r#"{"Type":"container","Action":"die","Actor":{"ID":"c2","Attributes":{"image":"redis","exitCode":"0"}},"scope":"local"}"#;

    #[test]
    fn decodes_legacy_and_modern_messages() {
        let mut decoder = EventDecoder::default();
        let events = decoder.push(format!("{LEGACY_START}\n{MODERN_DIE}\n").as_bytes());

        assert_eq!(events, vec![
            RuntimeEvent {
                kind: EventKind::Start,
                id: String::from("c1"),
                from: String::from("nginx:1.25"),
            },
            RuntimeEvent {
                kind: EventKind::Die,
                id: String::from("c2"),
                from: String::from("redis"),
            },
        ]);
    }

    #[test]
    fn buffers_partial_lines() {
        let mut decoder = EventDecoder::default();
        let (head, tail) = LEGACY_START.split_at(40);

        assert!(decoder.push(head.as_bytes()).is_empty());
        assert!(decoder.push(tail.as_bytes()).is_empty());

        let events = decoder.push(b"\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "c1");
    }

    #[test]
    fn skips_unknown_and_malformed_messages() {
        let mut decoder = EventDecoder::default();
        let stream = concat!(
            r#"{"Type":"container","Action":"exec_start: sh","Actor":{"ID":"c1"}}"#, "\n",
            r#"{"Type":"network","Action":"create","Actor":{"ID":"n1"}}"#, "\n",
            "not json\n",
            "\n",
            r#"{"status":"stop","id":"c3","from":"app:v2"}"#, "\n",
        );

        let events = decoder.push(stream.as_bytes());

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Stop);
        assert_eq!(events[0].from, "app:v2");
    }

    #[test]
    fn filter_is_url_encoded() {
        assert_eq!(
            events_uri(),
            "/events?filters=%7B%22type%22%3A%5B%22container%22%5D%7D",
        );
    }
}
