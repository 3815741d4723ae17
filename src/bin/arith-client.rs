//! arith-client: one remote multiply or divide from the command line.
//!
//! ```text
//! arith-client 6 7 m 127.0.0.1
//! ```

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::Level;

use arith_rpc::config::{LoggingConfig, NetworkConfig, VERSION};
use arith_rpc::utils::logging::init_logging;
use arith_rpc::{ClientSession, Result};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Func {
    /// Multiplication
    M,
    /// Division
    D,
}

#[derive(Parser, Debug)]
#[command(name = "arith-client")]
#[command(about = "Remote integer arithmetic client", long_about = None)]
#[command(version)]
struct Cli {
    /// First operand
    #[arg(allow_negative_numbers = true)]
    op1: i32,

    /// Second operand
    #[arg(allow_negative_numbers = true)]
    op2: i32,

    /// m = multiplication, d = division
    #[arg(value_enum)]
    func: Func,

    /// IP address of the server
    ip: String,

    /// Server UDP port
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value_t = Level::WARN)]
    log_level: Level,
}

// Operands travel as raw 32-bit words; signed input is reinterpreted bit for bit.
async fn call(session: &mut ClientSession, cli: &Cli) -> Result<i32> {
    let (op1, op2) = (cli.op1 as u32, cli.op2 as u32);
    let result = match cli.func {
        Func::M => session.multiply(op1, op2).await?,
        Func::D => session.divide(op1, op2).await?,
    };
    Ok(result as i32)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    println!("arith-client, version {VERSION}");

    let logging = LoggingConfig {
        app_name: String::from("arith-client"),
        log_level: cli.log_level,
        ..LoggingConfig::default()
    };
    if let Err(e) = init_logging(&logging) {
        eprintln!("arith-client: {e}");
        return ExitCode::FAILURE;
    }

    let mut config = match NetworkConfig::from_env() {
        Ok(config) => config.client,
        Err(e) => {
            println!("Got an error: {}", e.status_code());
            return ExitCode::FAILURE;
        }
    };
    if let Some(port) = cli.port {
        config.port = port;
    }

    let mut session = ClientSession::with_config(config);
    if let Err(e) = session.set_remote_address(&cli.ip) {
        println!("Got an error: {}", e.status_code());
        return ExitCode::FAILURE;
    }
    if let Err(e) = session.open().await {
        println!("Got an error: {}", e.status_code());
        return ExitCode::FAILURE;
    }

    let outcome = call(&mut session, &cli).await;
    let _ = session.close();

    match outcome {
        Ok(result) => {
            println!("Result: {result}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Got an error: {}", e.status_code());
            ExitCode::FAILURE
        }
    }
}
