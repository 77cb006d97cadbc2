use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hyper::{body, Body, Client, Method, Request, Response, StatusCode};
use hyperlocal::{UnixClientExt, Uri as LocalUri};
use log::{error, info};
use serde::{de::DeserializeOwned, Deserialize};

use crate::runtime::{ContainerSnapshot, ContainerSummary, ImageSummary, RuntimeClient};

pub(super) async fn make_request(socket: &str, method: Method, uri: &str) -> Result<Response<Body>> {
    let uri: LocalUri = LocalUri::new(socket, uri);
    let client = Client::unix();

    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())?;

    let response = client.request(request).await?;

    Ok(response)
}

async fn get_json<T: DeserializeOwned>(socket: &str, uri: &str) -> Result<T> {
    let response = make_request(socket, Method::GET, uri).await?;

    if response.status() != StatusCode::OK {
        return Err(anyhow!("Docker API returned non-OK status code: {}", response.status().as_u16()));
    }

    let response = body::to_bytes(response).await?;

    Ok(serde_json::from_slice(&response)?)
}

/// Docker Engine API client speaking over the daemon's unix socket.
#[derive(Clone)]
pub struct DockerClient {
    socket: String,
}

impl DockerClient {
    pub fn new(socket: String) -> Self {
        Self {
            socket,
        }
    }

    pub fn socket(&self) -> &str {
        &self.socket
    }

    async fn get_api_version(&self) -> Result<(String, Option<String>)> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "ApiVersion")]
            api_version: String,
            #[serde(rename = "MinAPIVersion")]
            min_api_version: Option<String>,
        }

        let response: Response = get_json(&self.socket, "/version").await?;

        Ok((response.api_version, response.min_api_version))
    }

    pub async fn show_api_version(&self) {
        let api_ver = match self.get_api_version().await {
            Ok(x) => x,
            Err(e) => {
                error!("Failed to get Docker API version: {e}. ");
                return;
            },
        };

        info!("Current API version: {}. ", api_ver.0);
        match api_ver.1 {
            Some(x) => info!("Minimum API version: {}. ", x),
            None => info!("Docker API didn't specify minimum API version. "),
        }
    }
}

#[async_trait]
impl RuntimeClient for DockerClient {
    async fn inspect_container(&self, id: &str) -> Result<ContainerSnapshot> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "Id")]
            id: String,
            #[serde(rename = "Name")]
            name: String,
            #[serde(rename = "Image")]
            image: String,
            #[serde(rename = "State")]
            state: State,
        }

        #[derive(Deserialize)]
        struct State {
            #[serde(rename = "Running")]
            running: bool,
        }

        let uri = format!("/containers/{id}/json");
        let response: Response = get_json(&self.socket, &uri).await?;

        Ok(ContainerSnapshot {
            id: response.id,
            name: response.name,
            image_id: response.image,
            running: response.state.running,
        })
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "Id")]
            id: String,
            #[serde(rename = "ImageID", default)]
            image_id: String,
            #[serde(rename = "State", default)]
            state: String,
        }

        let response: Vec<Response> = get_json(&self.socket, "/containers/json?all=1").await?;

        let containers = response
            .into_iter()
            .map(|r| ContainerSummary {
                id: r.id,
                image_id: r.image_id,
                state: r.state,
            })
            .collect();

        Ok(containers)
    }

    async fn list_images(&self) -> Result<Vec<ImageSummary>> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "Id")]
            id: String,
            // null for dangling images on older engines
            #[serde(rename = "RepoTags")]
            repo_tags: Option<Vec<String>>,
        }

        let response: Vec<Response> = get_json(&self.socket, "/images/json").await?;

        let images = response
            .into_iter()
            .map(|r| ImageSummary {
                id: r.id,
                repo_tags: r.repo_tags.unwrap_or_default(),
            })
            .collect();

        Ok(images)
    }
}
