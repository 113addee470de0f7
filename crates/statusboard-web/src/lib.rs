//! statusboard-web - HTTP API and status page for statusboard using Axum

pub mod error;
pub mod page;
pub mod router;
pub mod sse;

pub use error::ApiError;
pub use router::create_router;

use anyhow::{Context, Result};
use statusboard_core::DashboardStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Run the web server
pub async fn run(store: Arc<DashboardStore>, port: u16) -> Result<()> {
    let router = create_router(store);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(%addr, "Web server listening");
    println!("Web server listening on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
