//! idcheck: serves the NIN lookup API and runs verification sessions in the
//! terminal.

mod config;
mod platform;
mod shutdown;
mod terminal;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use idcheck_client::HttpLookupClient;
use idcheck_flow::{
    Confirmer, FlowConfig, InProcessLookup, PlatformCredential, RecordLookup, SimulatedScan,
    VerificationFlow,
};
use idcheck_registry::{load_records, StaticRegistry};
use idcheck_rpc::{RpcConfig, RpcServer};
use idcheck_utils::LogFormat;

use crate::config::{ConfirmationMode, DaemonConfig};
use crate::platform::CommandCredential;
use crate::shutdown::ShutdownController;
use crate::terminal::Terminal;

#[derive(Parser)]
#[command(name = "idcheck", about = "NIN/BVN identity verification")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "IDCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "IDCHECK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "IDCHECK_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the lookup server.
    Serve {
        /// Address to bind.
        #[arg(long, env = "IDCHECK_BIND_ADDRESS")]
        bind: Option<String>,

        /// Port to listen on.
        #[arg(long, env = "IDCHECK_RPC_PORT")]
        port: Option<u16>,

        /// TOML record file (defaults to the built-in demo records).
        #[arg(long, env = "IDCHECK_RECORDS")]
        records: Option<PathBuf>,

        /// Artificial delay before each lookup, in milliseconds.
        #[arg(long, env = "IDCHECK_SIMULATED_LATENCY_MS")]
        latency_ms: Option<u64>,

        /// Expose Prometheus metrics at /metrics.
        #[arg(long, env = "IDCHECK_ENABLE_METRICS")]
        metrics: bool,
    },

    /// Walk through a verification session in the terminal.
    Verify {
        /// Lookup server base URL.
        #[arg(long, env = "IDCHECK_SERVER_URL")]
        server: Option<String>,

        /// Look records up in-process instead of over HTTP.
        #[arg(long)]
        offline: bool,

        /// TOML record file for offline mode.
        #[arg(long, env = "IDCHECK_RECORDS")]
        records: Option<PathBuf>,

        /// Biometric confirmation strategy.
        #[arg(long, value_enum, env = "IDCHECK_CONFIRMATION")]
        confirmation: Option<ConfirmationMode>,

        /// Lookup timeout, in milliseconds.
        #[arg(long, env = "IDCHECK_LOOKUP_TIMEOUT_MS")]
        timeout_ms: Option<u64>,
    },

    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => DaemonConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DaemonConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    idcheck_utils::init_logging(config.log_format, &config.log_level)
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))?;
    if let Some(ref path) = cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Serve {
            bind,
            port,
            records,
            latency_ms,
            metrics,
        } => {
            if let Some(bind) = bind {
                config.bind_address = bind;
            }
            if let Some(port) = port {
                config.rpc_port = port;
            }
            if records.is_some() {
                config.records_path = records;
            }
            if let Some(ms) = latency_ms {
                config.simulated_latency_ms = ms;
            }
            config.enable_metrics |= metrics;
            serve(&config).await
        }
        Command::Verify {
            server,
            offline,
            records,
            confirmation,
            timeout_ms,
        } => {
            if let Some(server) = server {
                config.server_url = server;
            }
            if records.is_some() {
                config.records_path = records;
            }
            if let Some(mode) = confirmation {
                config.confirmation = mode;
            }
            if let Some(ms) = timeout_ms {
                config.lookup_timeout_ms = ms;
            }
            if offline {
                verify(InProcessLookup::new(registry(&config)?), &config).await
            } else {
                let client = HttpLookupClient::new(&config.server_url, config.lookup_timeout())?;
                tracing::info!("Using lookup server at {}", client.endpoint());
                verify(client, &config).await
            }
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn registry(config: &DaemonConfig) -> anyhow::Result<StaticRegistry> {
    match config.records_path {
        Some(ref path) => Ok(load_records(path)?),
        None => {
            tracing::info!("No record file configured, using demo records");
            Ok(StaticRegistry::demo())
        }
    }
}

async fn serve(config: &DaemonConfig) -> anyhow::Result<()> {
    let rpc_config = RpcConfig {
        bind_address: config.bind_address.clone(),
        port: config.rpc_port,
        simulated_latency: config.simulated_latency(),
        enable_metrics: config.enable_metrics,
    };
    let server = RpcServer::new(rpc_config, Arc::new(registry(config)?))?;

    let shutdown = ShutdownController::new();
    let stopped = shutdown.notified();
    tokio::spawn(shutdown.trigger_on_signal());

    server.start(stopped).await?;
    Ok(())
}

async fn verify<L: RecordLookup + 'static>(lookup: L, config: &DaemonConfig) -> anyhow::Result<()> {
    let confirmer: Box<dyn Confirmer> = match config.confirmation {
        ConfirmationMode::Simulated => Box::new(SimulatedScan::new(config.scan_duration())),
        ConfirmationMode::Platform => {
            let command = CommandCredential::from_argv(&config.credential_command)
                .ok_or_else(|| anyhow!("confirmation = \"platform\" needs a credential_command"))?;
            Box::new(PlatformCredential::new(command))
        }
    };
    let flow = VerificationFlow::new(
        lookup,
        confirmer,
        FlowConfig {
            lookup_timeout: config.lookup_timeout(),
            secondary_check_delay: config.secondary_check_delay(),
        },
    );

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut terminal = Terminal::new(flow, input, std::io::stdout());
    terminal.run().await?;
    Ok(())
}
