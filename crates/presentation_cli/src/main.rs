//! tracking-chaos CLI
//!
//! Tools for working with a chaos server: validate fault documents, encode
//! GET payloads and drive a steady stream of events at an endpoint.

#![allow(clippy::print_stdout)]

mod check;
mod encode;
mod sender;

use std::{io::Read, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use infrastructure::DocumentFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{encode::Codec, sender::SendOptions};

/// tracking-chaos CLI
#[derive(Parser)]
#[command(name = "tracking-chaos-cli")]
#[command(author, version, about = "Tracking API chaos server tools", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Chaos document syntax
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Toml,
    Json,
}

impl From<Format> for DocumentFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Toml => Self::Toml,
            Format::Json => Self::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a chaos document and print its weight table
    ///
    /// Example: tracking-chaos-cli check-chaos chaos.toml
    CheckChaos {
        /// Document path, `-` for stdin; the built-in profile when omitted
        source: Option<String>,

        /// Document syntax (default: from the file extension)
        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },

    /// Post a track event on an interval and report each response
    Send {
        /// Server URL
        #[arg(short, long, env = "ENDPOINT", default_value = "http://localhost:8080")]
        url: String,

        /// Write key sent as the basic auth user
        #[arg(long, env = "WRITE_KEY", default_value = "")]
        write_key: String,

        /// Event name
        #[arg(long, default_value = "Trace Tested")]
        event: String,

        /// User id
        #[arg(long, default_value = "chaos-tester")]
        user_id: String,

        /// Milliseconds between requests
        #[arg(short, long, default_value = "1000")]
        interval_ms: u64,

        /// Number of requests (default: until Ctrl+C)
        #[arg(short = 'n', long)]
        count: Option<u64>,

        /// Per-request timeout in seconds
        #[arg(long, default_value = "60")]
        timeout_secs: u64,
    },

    /// Encode a JSON object as the `data` query parameter
    ///
    /// Example: tracking-chaos-cli encode '{"userId":"u"}'
    Encode {
        /// JSON object, `-` for stdin
        json: String,

        /// Base64 variant
        #[arg(short, long, value_enum, default_value_t = Codec::UrlSafeNoPad)]
        codec: Codec,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::CheckChaos { source, format } => {
            let chaos = match source.as_deref() {
                Some(source) => check::load(source, format.map(Into::into))
                    .with_context(|| format!("Chaos document {source} rejected"))?,
                None => check::load_default()?,
            };

            println!("Chaos document OK: {} entries", chaos.len());
            for line in check::weight_table(&chaos) {
                println!("{line}");
            }
        },

        Commands::Send {
            url,
            write_key,
            event,
            user_id,
            interval_ms,
            count,
            timeout_secs,
        } => {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()?;
            let options = SendOptions {
                endpoint: url,
                write_key,
                event,
                user_id,
                interval: Duration::from_millis(interval_ms.max(1)),
                count,
            };

            let summary = sender::run(&client, &options).await;
            println!(
                "Sent {}: {} succeeded, {} failed",
                summary.sent, summary.succeeded, summary.failed
            );
        },

        Commands::Encode { json, codec } => {
            let json = if json == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                json
            };
            let encoded = encode::encode_payload(&json, codec)?;
            println!("{encoded}");
            println!();
            println!("GET /v1/t?data={encoded}");
        },
    }

    Ok(())
}
