use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use reqwest::Client;
use tokio::time::sleep;

use crate::{
    config::Config,
    docker::{monitor_events, DockerClient},
    inventory::Inventory,
    notify::{NotificationSink, WebhookNotifier, WebhookTarget},
    runtime::RuntimeClient,
    server::start_server,
    translator::EventTranslator,
};

pub struct App {
    docker: Arc<DockerClient>,
    translator: Arc<EventTranslator>,
    inventory: Arc<Inventory>,
    listen: SocketAddr,
    event_retry_interval: Duration,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let docker = Arc::new(DockerClient::new(config.docker_socket));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        let target = WebhookTarget::default();
        info!("Forwarding notifications to {}. ", target.url);

        let sink: Arc<dyn NotificationSink> = Arc::new(WebhookNotifier::new(target, Some(client)));
        let runtime: Arc<dyn RuntimeClient> = docker.clone();

        let translator = Arc::new(EventTranslator::new(Arc::clone(&runtime), Arc::clone(&sink)));
        let inventory = Arc::new(Inventory::new(runtime, sink));

        Ok(Self {
            docker,
            translator,
            inventory,
            listen: config.listen,
            event_retry_interval: Duration::from_secs(config.event_retry_interval),
        })
    }

    pub async fn start(self) -> Result<()> {
        self.docker.show_api_version().await;

        let socket = self.docker.socket().to_owned();
        let translator = Arc::clone(&self.translator);
        let retry_interval = self.event_retry_interval;
        let event_monitor = tokio::spawn(async move {
            loop {
                if let Err(e) = monitor_events(&socket, Arc::clone(&translator)).await {
                    warn!("Docker event monitor stopped: {e}. ");
                }

                debug!("Resubscribing to Docker events in {}s. ", retry_interval.as_secs());
                sleep(retry_interval).await;
            }
        });

        let server = tokio::spawn(start_server(self.listen, Arc::clone(&self.inventory)));

        tokio::select! {
            result = event_monitor => Err(anyhow!("event monitor exited unexpectedly: {result:?}. "))?,
            result = server => result??,
        }

        Err(anyhow!("server failed"))?
    }
}
