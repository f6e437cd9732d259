//! QuantaStore control binary
//!
//! Creates an in-memory device table and drives it with console commands
//! read from stdin (or a script file).

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use quantastore::console::Console;
use quantastore::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// QuantaStore control shell
#[derive(Parser, Debug)]
#[command(name = "quantactl")]
#[command(about = "In-memory quantum-set device store")]
#[command(version)]
struct Args {
    /// Number of devices
    #[arg(short = 'n', long, default_value = "4")]
    devices: usize,

    /// Quantum size in bytes
    #[arg(short, long, default_value = "4000")]
    quantum: usize,

    /// Quanta per quantum set
    #[arg(short = 's', long, default_value = "1000")]
    qset: usize,

    /// Cancellation poll interval for blocked lock attempts (milliseconds)
    #[arg(long, default_value = "10")]
    poll_ms: u64,

    /// Read commands from this file instead of stdin
    #[arg(short = 'f', long)]
    script: Option<String>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quantastore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("QuantaStore v{}", quantastore::VERSION);

    // Build config from args
    let config = Config::builder()
        .device_count(args.devices)
        .quantum_size(args.quantum)
        .quanta_per_set(args.qset)
        .cancel_poll_interval(Duration::from_millis(args.poll_ms))
        .build();

    let engine = match Engine::new(config) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to initialize engine: {}", e);
            std::process::exit(1);
        }
    };

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                tracing::error!("Failed to open script {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut console = Console::new(Arc::clone(&engine));
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        };
        match console.run_line(&line) {
            Ok(Some(output)) => {
                let _ = writeln!(out, "{}", output.trim_end());
            }
            Ok(None) => {}
            Err(e) => {
                let _ = writeln!(out, "error: {}", e);
            }
        }
    }
    drop(console);

    match Arc::try_unwrap(engine) {
        Ok(engine) => engine.shutdown(),
        Err(_) => tracing::warn!("Engine still shared at exit, skipping trim"),
    }
}
