//! Server binary: sharded matching engine behind the REST API.

use clap::Parser;
use matchbook::api;
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(name = "matchbook", version, about = "In-memory order matching engine")]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let cli = Cli::parse();

    // one shard per hardware thread, default intake buffer
    let state = api::create_app_state(0);
    tracing::info!(shards = state.router.shard_count(), "starting matching engine");

    let app = api::create_router(state.clone());
    let listener = TcpListener::bind(cli.bind).await?;
    tracing::info!("listening on http://{}", cli.bind);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    state.router.stop();
    tracing::info!("stopped");
    Ok(())
}
