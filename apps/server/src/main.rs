mod config;
mod health;
mod sse;
mod streamable;
#[cfg(test)]
mod test_support;

use std::{net::SocketAddr, sync::Arc};

use chart_server::{Server, transport::ByteTransport};
use chart_tools::{ChartDispatcher, ChartRouter, ToolRegistry, build_strategy};
use clap::Parser;
use tokio::io::{stdin, stdout};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::{Cli, TransportKind},
    sse::SseApp,
    streamable::StreamableApp,
};

pub type SharedRouter = Arc<dyn chart_server::Router>;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("info,{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

async fn serve(app: axum::Router, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let generate = cli.generate.to_config();
    let registry = Arc::new(ToolRegistry::new(cli.generate.disabled_tools())?);
    let strategy = build_strategy(&generate)?;
    let router: SharedRouter = Arc::new(ChartRouter::new(ChartDispatcher::new(
        registry,
        strategy,
        generate.timeout,
    )));

    tracing::info!(transport = ?cli.transport, "Starting mcp-server-chart");
    match cli.transport {
        TransportKind::Stdio => {
            Server::new(router)
                .run(ByteTransport::new(stdin(), stdout()))
                .await?;
        }
        TransportKind::Sse => {
            let endpoint = cli.endpoint();
            tracing::info!(%endpoint, port = cli.port, "SSE transport");
            serve(SseApp::new(router).routes(&endpoint), cli.port).await?;
        }
        TransportKind::Streamable => {
            let endpoint = cli.endpoint();
            tracing::info!(%endpoint, port = cli.port, "Streamable HTTP transport");
            let app = StreamableApp::new(router);
            app.spawn_idle_sweeper(cli.session_idle_timeout());
            serve(app.routes(&endpoint), cli.port).await?;
        }
    }
    Ok(())
}
