//! NovaForge CLI and HTTP server entry point.
//!
//! Binary name: `novaforge`
//!
//! Loads `.env`, parses CLI arguments, initializes tracing and services, then
//! dispatches to a command handler or starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use novaforge_observe::tracing_setup::{
    TracingOptions, init_tracing, shutdown_tracing, verbosity_filter,
};

use cli::{Cli, Commands};
use state::AppState;

const ENV_OTEL: &str = "NOVAFORGE_OTEL";
const ENV_LOG_JSON: &str = "NOVAFORGE_LOG_JSON";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal; the environment may already be populated.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "novaforge", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(&TracingOptions {
        default_filter: verbosity_filter(cli.quiet, cli.verbose).to_string(),
        json: env_flag(ENV_LOG_JSON),
        otel: env_flag(ENV_OTEL),
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            serve(state, &host, port, cli.quiet).await?;
        }

        Commands::Generate {
            name,
            description,
            project_type,
        } => {
            cli::project::generate_project(&state, &name, &description, &project_type, cli.json)
                .await?;
        }

        Commands::AddFeature { name, feature } => {
            cli::project::add_feature(&state, &name, &feature, cli.json).await?;
        }

        Commands::List => {
            cli::project::list_projects(&state, cli.json).await?;
        }

        Commands::Show { name, artifact } => {
            cli::project::show_project(&state, &name, artifact, cli.json).await?;
        }

        Commands::Deploy { name } => {
            cli::project::deploy_project(&state, &name, cli.json).await?;
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

async fn serve(state: AppState, host: &str, port: u16, quiet: bool) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    if !quiet {
        println!(
            "  {} NovaForge listening on {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }
    tracing::info!(%addr, "server started");

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

fn env_flag(var: &str) -> bool {
    std::env::var(var)
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
