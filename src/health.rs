use axum::{routing::get, Router};
use tokio::net::TcpListener;

fn router() -> Router {
    Router::new().route("/", get(|| async { "OK" }))
}

/// Answers `GET /` with `OK` until the process exits.
pub(crate) async fn serve(listener: TcpListener) -> std::io::Result<()> {
    log::info!("health endpoint listening on {}", listener.local_addr()?);
    axum::serve(listener, router()).await
}
