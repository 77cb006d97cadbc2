use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use anyhow::Result;
use log::debug;
use reqwest::{Client, StatusCode};
use url::Url;

/// Address a local caller should use to reach the daemon's listener.
pub fn daemon_base_url(listen: SocketAddr) -> Result<Url> {
    let ip = if listen.ip().is_unspecified() {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    } else {
        listen.ip()
    };

    let base = Url::parse(&format!("http://{}/", SocketAddr::new(ip, listen.port())))?;

    Ok(base)
}

/// Sends `GET <daemon>/<path>` to a running daemon, e.g. `containers` to
/// trigger an inventory from a script.
pub async fn request_daemon(listen: SocketAddr, path: &str, timeout: u64) -> Result<(Url, StatusCode)> {
    let mut uri = daemon_base_url(listen)?;
    uri.set_path(path.trim_start_matches('/'));
    debug!("Requesting {uri}. ");

    let client = Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()?;

    let response = client.get(uri.clone()).send().await?;

    Ok((uri, response.status()))
}
