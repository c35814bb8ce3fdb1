//! HTTP health endpoint
//!
//! A single `GET /` answering `200 OK`, used by the hosting platform to
//! keep the process alive. Independent of the bot core.

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;

use crate::error::{Error, Result};

/// Serve the health endpoint until the process stops.
pub async fn serve(port: u16) -> Result<()> {
    let (_, server) = serve_with_addr(port).await?;
    server.await
}

/// Bind and return the actual address plus the serving future. Useful with
/// port 0 in tests.
pub async fn serve_with_addr(
    port: u16,
) -> Result<(
    std::net::SocketAddr,
    impl std::future::Future<Output = Result<()>>,
)> {
    let app = Router::new().route("/", get(|| async { "OK" }));

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Server(format!("failed to bind on {addr}: {e}")))?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| Error::Server(format!("failed to read bound address: {e}")))?;

    info!("health endpoint listening on http://{local_addr}/");

    let server = async move {
        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Server(format!("health server error: {e}")))?;
        Ok(())
    };

    Ok((local_addr, server))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint_answers_ok() {
        let (addr, server) = serve_with_addr(0).await.unwrap();
        tokio::spawn(server);

        let body = reqwest::get(format!("http://{addr}/"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "OK");
    }
}
