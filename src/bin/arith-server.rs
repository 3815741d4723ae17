//! arith-server: answers multiply/divide requests on UDP port 11111.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn, Level};

use arith_rpc::config::{NetworkConfig, VERSION};
use arith_rpc::protocol::status::DeviceIndicator;
use arith_rpc::utils::logging::init_logging;
use arith_rpc::Server;

#[derive(Parser, Debug)]
#[command(name = "arith-server")]
#[command(about = "Remote integer arithmetic server", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file; flags below override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen address
    #[arg(short, long, value_name = "ADDR:PORT")]
    address: Option<String>,

    /// Character device receiving one status character per request
    #[arg(short = 'd', long, value_name = "PATH")]
    status_device: Option<PathBuf>,

    /// Idle period after which "still listening" is logged
    #[arg(long, value_name = "MS")]
    receive_timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<Level>,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

fn load_config(cli: &Cli) -> arith_rpc::Result<NetworkConfig> {
    let mut config = match &cli.config {
        Some(path) => NetworkConfig::from_file(path)?,
        None => NetworkConfig::from_env()?,
    };

    if let Some(address) = &cli.address {
        config.server.address = address.clone();
    }
    if let Some(device) = &cli.status_device {
        config.server.status_device = Some(device.display().to_string());
    }
    if let Some(ms) = cli.receive_timeout_ms {
        config.server.receive_timeout = Duration::from_millis(ms);
    }
    if let Some(level) = cli.log_level {
        config.logging.log_level = level;
    }
    if cli.json {
        config.logging.json_format = true;
    }
    config.logging.app_name = String::from("arith-server");

    config.validate_strict()?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("arith-server: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("arith-server: {e}");
        return ExitCode::FAILURE;
    }

    info!("arith-server, version {VERSION}");

    let server = match Server::bind(&config.server).await {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, address = %config.server.address, "Could not start server");
            return ExitCode::FAILURE;
        }
    };

    let server = match &config.server.status_device {
        Some(path) => match DeviceIndicator::open(path) {
            Ok(device) => {
                info!(device = %path, "Reporting status to device");
                server.with_indicator(device)
            }
            Err(e) => {
                warn!(error = %e, device = %path, "Status device unavailable, continuing without it");
                server
            }
        },
        None => server,
    };

    match server.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server stopped");
            ExitCode::FAILURE
        }
    }
}
