use clap::Parser;
use replication_cluster::app::NodeContext;
use replication_cluster::config::NodeConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = NodeConfig::parse();

    let node = NodeContext::build(&config);
    tracing::info!("Node ID: {}", node.membership.local_node.id);
    tracing::info!(
        "Cluster members: {}, known indices: {:?}",
        node.membership.member_count(),
        config.known_indices()
    );

    let app = node.router();

    tracing::info!("HTTP server listening on {}", config.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    node.shutdown();
    tracing::info!("Node stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
