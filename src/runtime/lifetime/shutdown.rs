use tokio::signal;
use tracing::{error, warn};

/// 等待 Ctrl+C 信号
pub async fn listen_for_shutdown() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return std::future::pending().await;
    }
    warn!("Shutdown signal received, initiating graceful shutdown...");
}
