// ============================================
// File: crates/keylink-cli/src/main.rs
// ============================================
//! # Keylink Entry Point
//!
//! ## Creation Reason
//! Command-line tool for running one X25519 key exchange with a peer
//! over TCP. Handles CLI parsing, logging setup, and config loading.
//!
//! ## Main Functionality
//! - CLI argument parsing with clap
//! - Logging initialization with tracing
//! - Configuration loading with flag overrides
//! - One-shot exchange execution
//!
//! ## Usage
//! ```bash
//! # Wait for a peer (one connection, then exit)
//! keylink exchange --listen 0.0.0.0:4040
//!
//! # Connect to a peer
//! keylink exchange --connect 192.168.0.10:4040 --role write-first
//!
//! # With a config file; flags override file values
//! keylink exchange --config keylink.toml --timeout-ms 10000
//!
//! # Check a config file
//! keylink validate --config keylink.toml
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The two peers must run mirrored roles or both sides hang
//! - The printed secret is for operator comparison only; matching hex
//!   on both ends is NOT key confirmation
//!
//! ## Last Modified
//! v0.1.0 - Initial CLI implementation

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use keylink_common::ExchangeRole;
use keylink_core::{DalekProvider, HandshakeSession, SharedSecret};
use keylink_transport::TcpTransport;

mod config;

use config::CliConfig;

// ============================================
// CLI Definition
// ============================================

/// One-shot X25519 key exchange over a point-to-point link.
#[derive(Parser, Debug)]
#[command(name = "keylink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one key exchange and print the hex shared secret
    Exchange {
        /// TCP address to connect to
        #[arg(long, conflicts_with = "listen")]
        connect: Option<String>,

        /// TCP address to accept one peer connection on
        #[arg(long)]
        listen: Option<String>,

        /// Exchange role: read-first or write-first
        #[arg(long)]
        role: Option<ExchangeRole>,

        /// Pause after opening the channel, in milliseconds
        #[arg(long)]
        settle_ms: Option<u64>,

        /// Per-operation I/O deadline in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Accept peer keys that yield an all-zero shared secret
        #[arg(long)]
        allow_low_order: bool,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
}

// ============================================
// Main
// ============================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Logging is initialized inside each command, after the config
    // file is loaded, so [logging].level takes effect.

    // Execute command
    let result = match cli.command {
        Commands::Exchange {
            connect,
            listen,
            role,
            settle_ms,
            timeout_ms,
            allow_low_order,
            config,
        } => {
            cmd_exchange(
                connect,
                listen,
                role,
                settle_ms,
                timeout_ms,
                allow_low_order,
                config,
            )
            .await
        }
        Commands::Validate { config } => cmd_validate(config).await,
    };

    // Handle errors. A command may fail before installing the
    // subscriber (config load errors), so install a fallback first;
    // this is a no-op when logging is already up.
    if let Err(e) = result {
        init_logging("info");
        error!("{:#}", e);
        std::process::exit(1);
    }
}

// ============================================
// Commands
// ============================================

/// Runs one key exchange.
#[allow(clippy::too_many_arguments)]
async fn cmd_exchange(
    connect: Option<String>,
    listen: Option<String>,
    role: Option<ExchangeRole>,
    settle_ms: Option<u64>,
    timeout_ms: Option<u64>,
    allow_low_order: bool,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Load config file if given; flags override file values.
    let mut config = match config_path {
        Some(path) => CliConfig::load(&path).await?,
        None => CliConfig::default(),
    };

    if connect.is_some() {
        config.link.connect = connect;
        config.link.listen = None;
    }
    if listen.is_some() {
        config.link.listen = listen;
        config.link.connect = None;
    }
    if let Some(role) = role {
        config.exchange.role = role;
    }
    if let Some(ms) = settle_ms {
        config.exchange.settle_ms = ms;
    }
    if let Some(ms) = timeout_ms {
        config.exchange.timeout_ms = Some(ms);
    }
    if allow_low_order {
        config.exchange.allow_low_order = true;
    }

    // First subscriber installation wins, so this happens only after
    // the config file has had its say.
    init_logging(&config.logging.level);

    config.validate()?;

    let secret = run_exchange(&config).await?;

    // Operator-facing output: the hex dump lets both ends compare by
    // eye. It is diagnostic, not key confirmation.
    println!("{}", secret.to_hex());
    Ok(())
}

/// Opens the configured endpoint and drives the session to completion.
async fn run_exchange(config: &CliConfig) -> anyhow::Result<SharedSecret> {
    let transport = match (&config.link.connect, &config.link.listen) {
        (Some(addr), _) => {
            info!("Connecting to peer at {}", addr);
            TcpTransport::connect(addr).await?
        }
        (_, Some(addr)) => {
            info!("Waiting for peer on {}", addr);
            TcpTransport::accept(addr).await?
        }
        // validate() already rejected this
        (None, None) => anyhow::bail!("no endpoint configured"),
    };

    let session = HandshakeSession::new(DalekProvider::new(), transport, config.session_config());
    let secret = session.run().await?;
    Ok(secret)
}

/// Validates a configuration file.
async fn cmd_validate(config_path: PathBuf) -> anyhow::Result<()> {
    init_logging("info");

    let config = CliConfig::load(&config_path).await?;
    config.validate()?;

    println!("✅ Configuration is valid");
    println!();
    println!("Link:");
    if let Some(addr) = &config.link.connect {
        println!("   Connect:    {addr}");
    }
    if let Some(addr) = &config.link.listen {
        println!("   Listen:     {addr}");
    }
    println!();
    println!("Exchange:");
    println!("   Role:       {}", config.exchange.role);
    println!("   Settle:     {}ms", config.exchange.settle_ms);
    match config.exchange.timeout_ms {
        Some(ms) => println!("   Timeout:    {ms}ms"),
        None => println!("   Timeout:    none (wait indefinitely)"),
    }
    println!(
        "   Peer keys:  {}",
        if config.exchange.allow_low_order {
            "permissive (low-order accepted)"
        } else {
            "strict (low-order rejected)"
        }
    );
    println!();

    Ok(())
}

// ============================================
// Helper Functions
// ============================================

/// Initializes the tracing subscriber.
///
/// The first call installs the global subscriber; later calls are
/// no-ops. `RUST_LOG` overrides the configured level when set.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .ok();
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        // Repeated installation must not panic; the error-path fallback
        // in main relies on this.
        init_logging("debug");
        init_logging("info");
    }
}
