//! Tidechat server entry point.
//!
//! Binary name: `tidechat`
//!
//! Parses CLI arguments, initializes the database and services, then
//! starts the REST API server.

mod http;
mod state;

use clap::Parser;

use state::AppState;

/// Tidechat -- streaming LLM chat server.
#[derive(Debug, Parser)]
#[command(name = "tidechat", version)]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1", env = "TIDECHAT_HOST")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080, env = "TIDECHAT_PORT")]
    port: u16,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Export spans via OpenTelemetry (stdout exporter).
    #[arg(long)]
    otel: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info,tidechat=debug",
        _ => "trace",
    };
    tidechat_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let state = AppState::init().await?;

    let registered = state.models.ids().len();
    if registered == 0 {
        println!(
            "  {} No models registered -- set XAI_API_KEY / GROQ_API_KEY",
            console::style("!").yellow().bold()
        );
    }

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} Tidechat listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tidechat_observe::tracing_setup::shutdown_tracing();
    println!("\n  Server stopped.");

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
