use std::{
    net::{SocketAddr, TcpListener},
    sync::Arc,
};

use anyhow::Result;
use axum::{
    extract::{ConnectInfo, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
    Server,
};
use log::{debug, info};

use crate::inventory::Inventory;

pub fn router(inventory: Arc<Inventory>) -> Router {
    Router::new()
        .route("/containers", get(containers_handler))
        .layer(Extension(inventory))
}

/// Acknowledges right away; the enumeration runs after the response is sent
/// so a caller blocked on the response never waits on the runtime.
async fn containers_handler(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Extension(inventory): Extension<Arc<Inventory>>,
) -> impl IntoResponse {
    debug!("Got container enumeration request from {addr}. ");

    // detached: the outcome is logged by the task itself
    let _ = inventory.spawn();

    (StatusCode::OK, "OK")
}

pub async fn start_server(listen: SocketAddr, inventory: Arc<Inventory>) -> Result<()> {
    let listener = TcpListener::bind(listen)?;
    info!("Listening on {listen}. ");
    serve(listener, inventory).await
}

pub async fn serve(listener: TcpListener, inventory: Arc<Inventory>) -> Result<()> {
    let app = router(inventory).into_make_service_with_connect_info::<SocketAddr>();
    Server::from_tcp(listener)?.serve(app).await?;
    Ok(())
}
