use std::sync::Arc;

use log::{debug, info, warn};

use crate::{
    notify::{Action, NotificationPayload, NotificationSink},
    runtime::{naming::PLACEHOLDER_NAME, EventKind, ImageRef, RuntimeClient, RuntimeEvent},
};

/// Turns runtime events into webhook notifications.
pub struct EventTranslator {
    runtime: Arc<dyn RuntimeClient>,
    sink: Arc<dyn NotificationSink>,
}

impl EventTranslator {
    pub fn new(runtime: Arc<dyn RuntimeClient>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            runtime,
            sink,
        }
    }

    /// Translates and delivers one event. Returns the payload that was handed
    /// to the sink, whether or not delivery succeeded.
    pub async fn handle(&self, event: RuntimeEvent) -> Option<NotificationPayload> {
        let payload = self.translate(&event).await?;

        if let Err(e) = self.sink.send(&payload).await {
            warn!("Failed to notify {} of container {}: {e}. ", event.kind, event.id);
        }

        Some(payload)
    }

    pub async fn translate(&self, event: &RuntimeEvent) -> Option<NotificationPayload> {
        debug!("Received {} event for container {} ({}). ", event.kind, event.id, event.from);

        let action = match event.kind {
            EventKind::Start => Action::StartContainer,
            EventKind::Stop => Action::StopContainer,
            EventKind::Create | EventKind::Restart | EventKind::Kill | EventKind::Die => {
                info!("Container {} {}, nothing to report. ", event.id, event.kind);
                return None;
            },
        };

        let name = match self.runtime.inspect_container(&event.id).await {
            Ok(snapshot) => {
                debug!("Container {} is named {}. ", snapshot.id, snapshot.name);
                snapshot.name
            },
            Err(e) => {
                warn!("Failed to inspect container {}: {e}. ", event.id);
                String::from(PLACEHOLDER_NAME)
            },
        };

        let image = ImageRef::parse(&event.from);

        Some(NotificationPayload::new(action, event.id.clone(), name, image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRuntime, RecordingSink};

    fn event(kind: EventKind, id: &str, from: &str) -> RuntimeEvent {
        RuntimeEvent {
            kind,
            id: id.to_owned(),
            from: from.to_owned(),
        }
    }

    fn translator(runtime: FakeRuntime, sink: &RecordingSink) -> EventTranslator {
        EventTranslator::new(Arc::new(runtime), Arc::new(sink.clone()))
    }

    #[tokio::test]
    async fn start_reports_inspected_name() {
        let sink = RecordingSink::default();
        let runtime = FakeRuntime::default().with_container("c1", "/web", "sha256:aa", true);
        let translator = translator(runtime, &sink);

        translator.handle(event(EventKind::Start, "c1", "nginx:1.25")).await;

        let payloads = sink.payloads();
        assert_eq!(payloads.len(), 1);
        let payload = &payloads[0];
        assert_eq!(payload.action, Action::StartContainer);
        assert_eq!(payload.id, "c1");
        assert_eq!(payload.name, "/web");
        assert_eq!(payload.image_repo, "nginx");
        assert_eq!(payload.image_tag, "1.25");
        assert_eq!(payload.running, None);
    }

    #[tokio::test]
    async fn stop_uses_stop_action() {
        let sink = RecordingSink::default();
        let runtime = FakeRuntime::default().with_container("c2", "/db", "sha256:bb", false);
        let translator = translator(runtime, &sink);

        translator.handle(event(EventKind::Stop, "c2", "postgres")).await;

        let payloads = sink.payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].action, Action::StopContainer);
        assert_eq!(payloads[0].image_repo, "postgres");
        assert_eq!(payloads[0].image_tag, "");
    }

    #[tokio::test]
    async fn uninspectable_container_gets_placeholder() {
        let sink = RecordingSink::default();
        let translator = translator(FakeRuntime::default(), &sink);

        let payload = translator.handle(event(EventKind::Start, "gone", "app:v1")).await;

        assert!(payload.is_some());
        let payloads = sink.payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].name, PLACEHOLDER_NAME);
        assert_eq!(payloads[0].image_repo, "app");
        assert_eq!(payloads[0].image_tag, "v1");
    }

    #[tokio::test]
    async fn other_lifecycle_events_are_silent() {
        let sink = RecordingSink::default();
        let runtime = FakeRuntime::default().with_container("c1", "/web", "sha256:aa", true);
        let translator = translator(runtime, &sink);

        for kind in [EventKind::Create, EventKind::Restart, EventKind::Kill, EventKind::Die] {
            assert!(translator.handle(event(kind, "c1", "nginx")).await.is_none());
        }

        assert!(sink.payloads().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_is_not_fatal() {
        let sink = RecordingSink::failing();
        let runtime = FakeRuntime::default().with_container("c1", "/web", "sha256:aa", true);
        let translator = translator(runtime, &sink);

        let payload = translator.handle(event(EventKind::Stop, "c1", "nginx")).await;

        assert!(payload.is_some());
        assert_eq!(sink.payloads().len(), 1);
    }
}
