mod config_cmd;
mod prune_cmd;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use tailgate_config::defaults::{DEFAULT_BIND, DEFAULT_PORT};
use tailgate_gateway::GatewayState;
use tailgate_logging::init_logger;

#[derive(Parser)]
#[command(name = "tailgate")]
#[command(about = "Tailgate — conversation-pruning relay")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay server
    Serve {
        /// Port to bind, overriding the configured one
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Prune a conversation JSON document once and exit
    Prune {
        /// Input file, or `-` for stdin
        input: PathBuf,
        /// Retention bound, overriding the configured one
        #[arg(short, long)]
        keep: Option<i64>,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Read or update persisted settings
    Config {
        #[command(subcommand)]
        action: config_cmd::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = tailgate_config::config_file_path(&tailgate_config::config_dir());
    let config = tailgate_config::load_and_prepare(&config_path).await?;

    let logging = config.logging.clone().unwrap_or_default();
    let log_dir = logging.dir.as_deref().map(PathBuf::from);
    init_logger(
        log_dir.as_deref(),
        logging.level.as_deref().unwrap_or("info"),
    );

    match cli.command {
        Commands::Serve { port } => run_serve(&config, port).await,
        Commands::Prune {
            input,
            keep,
            output,
        } => prune_cmd::run(&input, keep.or(config.keep_tail_count()), output.as_deref()),
        Commands::Config { action } => config_cmd::run(&config_path, action).await,
    }
}

async fn run_serve(config: &tailgate_config::TailgateConfig, port: Option<u16>) -> Result<()> {
    let server = config.server.clone().unwrap_or_default();
    let bind = server.bind.as_deref().unwrap_or(DEFAULT_BIND);
    let port = port.or(server.port).unwrap_or(DEFAULT_PORT);
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("invalid bind address {bind}:{port}"))?;

    let upstream = config
        .upstream
        .as_ref()
        .and_then(|u| u.base_url.clone())
        .context("upstream.baseUrl must be configured to serve")?;

    info!(%upstream, keep_tail_count = ?config.keep_tail_count(), "starting relay");
    let state = Arc::new(GatewayState::new(upstream, config.keep_tail_count()));
    tailgate_gateway::start_server(addr, state).await
}
