//! # Courier CLI
//!
//! Split long messages into bounded segments and deliver them in order.
//!
//! Usage:
//!   courier split report.md                     # Preview segments
//!   courier send --to +15550100 report.md       # Deliver via configured webhook
//!   courier send --to bob -m "..." --dry-run    # Print instead of sending
//!   courier config init                         # Write default config
//!   courier config show                         # Show configuration

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use courier_channels::{segment, DeliverOptions};
use courier_core::types::QuotedRef;
use courier_core::CourierConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "courier",
    version,
    about = "Split long messages into bounded segments and deliver them in order"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a message would be segmented
    Split {
        /// File to read (stdin when omitted)
        file: Option<PathBuf>,

        /// Override the per-segment character budget
        #[arg(long, value_parser = parse_max_length)]
        max_length: Option<usize>,
    },

    /// Segment a message and deliver it to a recipient
    Send {
        /// Recipient identifier passed to the transport
        #[arg(short, long)]
        to: String,

        /// Message text (otherwise read from FILE or stdin)
        #[arg(short, long, conflicts_with = "file")]
        message: Option<String>,

        /// File to read
        file: Option<PathBuf>,

        /// Message id to reply to
        #[arg(short, long)]
        quote: Option<String>,

        /// Override the pause between segments
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Override the per-segment character budget
        #[arg(long, value_parser = parse_max_length)]
        max_length: Option<usize>,

        /// Print segments instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show system info
    Info,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Write the default configuration
    Init,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "courier=debug,courier_core=debug,courier_channels=debug"
    } else {
        "courier=info,courier_channels=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config
    let config = if let Some(path) = &cli.config {
        CourierConfig::load_from(std::path::Path::new(path))?
    } else {
        CourierConfig::load()?
    };

    match cli.command {
        Commands::Split { file, max_length } => {
            let text = read_input(None, file.as_ref())?;
            let max_length = max_length.unwrap_or(config.delivery.max_length);
            let segments = segment(&text, max_length);

            println!("{} segment(s), max {} chars\n", segments.len(), max_length);
            for (i, seg) in segments.iter().enumerate() {
                println!("── [{}/{}] {} chars ──", i + 1, segments.len(), seg.chars().count());
                println!("{seg}\n");
            }
        }

        Commands::Send { to, message, file, quote, delay_ms, max_length, dry_run } => {
            let text = read_input(message, file.as_ref())?;

            let mut options = DeliverOptions::from_policy(
                config.delivery.policy(),
                max_length.unwrap_or(config.delivery.max_length),
            );
            if let Some(ms) = delay_ms {
                options.inter_segment_delay_ms = Some(ms);
            }
            if let Some(id) = quote {
                options = options.with_quote(QuotedRef::new(id));
            }

            let transport = courier_channels::create_transport(&config, dry_run)?;
            tracing::info!("Sending to {to} via {}", transport.name());

            if let Err(e) = courier_channels::deliver(transport.as_ref(), &to, &text, &options).await {
                eprintln!("❌ Delivery failed: {e}");
                eprintln!("   Some segments may already have been delivered.");
                std::process::exit(1);
            }
        }

        Commands::Config { action } => {
            match action {
                ConfigAction::Show => {
                    let content = toml::to_string_pretty(&config)?;
                    println!("{content}");
                }
                ConfigAction::Init => {
                    let path = CourierConfig::default_path();
                    if path.exists() {
                        println!("Config already exists: {}", path.display());
                    } else {
                        CourierConfig::default().save()?;
                        println!("✅ Config saved to: {}", path.display());
                    }
                }
                ConfigAction::Path => {
                    println!("{}", CourierConfig::default_path().display());
                }
            }
        }

        Commands::Info => {
            println!("Courier v{}", env!("CARGO_PKG_VERSION"));
            println!("   Platform: {} / {}", std::env::consts::OS, std::env::consts::ARCH);
            println!("   Config: {}", CourierConfig::default_path().display());
            println!("   Max length: {} chars", config.delivery.max_length);
            println!("   Delay: {} ms", config.delivery.inter_segment_delay_ms);
            println!("   Quote first only: {}", config.delivery.quote_first_only);
            match &config.webhook {
                Some(w) => println!("   Transport: webhook ({})", w.outbound_url),
                None => println!("   Transport: console (no webhook configured)"),
            }
        }
    }

    Ok(())
}

/// `--max-length` must be a positive char count.
fn parse_max_length(raw: &str) -> std::result::Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be at least 1".into()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Message text from `--message`, a file, or stdin, in that order.
fn read_input(message: Option<String>, file: Option<&PathBuf>) -> Result<String> {
    if let Some(text) = message {
        return Ok(text);
    }
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
