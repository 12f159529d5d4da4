#![allow(dead_code)]

use axum::Router;
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral local port and return its base url.
pub async fn spawn_fake(router: Router) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{addr}"))
}
