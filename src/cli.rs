//! CLI interface for ir-scribe

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::config::Config;
use crate::device::{simulator, BridgeDevice};
use crate::shell;

#[derive(Parser)]
#[command(name = "ir-scribe")]
#[command(about = "Teach a networked IR/RF bridge button codes from a physical remote", long_about = None)]
#[command(version)]
struct Cli {
    /// IP address of the bridge device to connect to
    host: String,

    /// Discovery timeout in seconds
    #[arg(default_value_t = 5)]
    timeout: u64,

    /// Use the built-in simulated bridge instead of scanning the network
    #[arg(long)]
    simulate: bool,

    /// Override the number of poll attempts per capture
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Override the wait between polls, in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Directory for appliance record files
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(max_attempts) = cli.max_attempts {
        config.capture.max_attempts = max_attempts;
    }
    if let Some(poll_interval_ms) = cli.poll_interval_ms {
        config.capture.poll_interval_ms = poll_interval_ms;
    }
    if let Some(output_dir) = cli.output_dir {
        config.store.output_dir = Some(output_dir);
    }

    println!("Scanning network for available devices...");
    let timeout = Duration::from_secs(cli.timeout);

    // The bridge wire protocol lives in external drivers implementing
    // BridgeDevice; this build ships the simulator as its only driver.
    let devices: Vec<Box<dyn BridgeDevice>> = if cli.simulate {
        simulator::discover(&cli.host, timeout)
            .await
            .into_iter()
            .map(|d| Box::new(d) as Box<dyn BridgeDevice>)
            .collect()
    } else {
        debug!("no hardware driver linked into this build");
        Vec::new()
    };

    if devices.is_empty() {
        eprintln!("No devices found in network, aborting");
        eprintln!("* hint: try to ping your device before starting this tool");
        if !cli.simulate {
            eprintln!("* hint: this build has no hardware driver; use --simulate to exercise the workflow");
        }
        std::process::exit(1);
    }
    println!("Found {} device(s)", devices.len());

    let mut device = match devices
        .into_iter()
        .find(|d| d.info().host == cli.host)
    {
        Some(device) => device,
        None => {
            eprintln!("Device with address {} was not found, aborting", cli.host);
            std::process::exit(1);
        }
    };

    println!("Connecting to: {}...", cli.host);
    device
        .authenticate()
        .await
        .with_context(|| format!("Authentication with {} failed", cli.host))?;
    println!("connected.");

    let exit = shell::run_shell(device.as_mut(), &config).await?;
    debug!(?exit, "shell session ended");
    println!("\nBye.");
    Ok(())
}
