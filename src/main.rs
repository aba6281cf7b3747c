//! yadns - keeps a Yandex PDD A record pointed at this host's public IPv4
//!
//! Meant to be run from cron: one pass per invocation, exit code reports
//! whether the pass failed.

use std::io::IsTerminal as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

use yadns::config::{save_json, Config};
use yadns::constants::EXTERNAL_IP_TIMEOUT_SECS;
use yadns::external_ip::ExternalIpResolver;
use yadns::pdd::PddClient;
use yadns::transport::ReqwestTransport;
use yadns::logging::{console_timer, file_timer, log_file_appender, redact_secrets};
use yadns::{DnsProvider, RecordFields, RecordId, Updater};

/// Application version
const VERSION: &str = "1.0.0";

//==============================================================================
// Main
//==============================================================================

#[derive(Debug, Parser)]
#[command(name = "yadns")]
#[command(version = VERSION)]
struct Args {
    /// Path to the JSON config file (default: ~/.yandexdns.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,

    /// Report API failures as results instead of aborting
    #[arg(long)]
    no_strict: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Point the A record at the current external IPv4 (default)
    Update,
    /// Print the zone's records
    List {
        /// Only show records of this type
        #[arg(short = 't', long = "type")]
        record_type: Option<String>,
        /// Also save all records as JSON to this path
        #[arg(long)]
        export: Option<String>,
    },
    /// Create a record
    Add {
        #[arg(short = 't', long = "type")]
        record_type: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        subdomain: Option<String>,
        #[arg(long)]
        ttl: Option<u32>,
    },
    /// Delete a record by id
    Delete { record_id: String },
}

/// File log in the temp dir always; console only for interactive runs
fn init_logging(verbose: bool) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let appender = log_file_appender(&std::env::temp_dir()).context("Log file setup failed")?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_timer(file_timer())
        .with_ansi(false);

    let console_layer = std::io::stdout().is_terminal().then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(console_timer())
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let config = Config::load(args.config.clone()).context("Config load failed");

    let verbose = args.verbose || config.as_ref().map(|c| c.verbose).unwrap_or(false);
    let _guard = match init_logging(verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&args, &config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", redact_secrets(&format!("{:#}", e), &config.token));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, config: &Config) -> Result<bool> {
    let transport =
        Arc::new(ReqwestTransport::new(config.timeout).context("HTTP client failed")?);
    let client = PddClient::new(&config.domain, &config.token, transport)
        .with_strict(config.strict && !args.no_strict);

    match args.command.as_ref().unwrap_or(&Command::Update) {
        Command::Update => {
            let ip_transport = Arc::new(
                ReqwestTransport::new(Duration::from_secs(EXTERNAL_IP_TIMEOUT_SECS))
                    .context("HTTP client failed")?,
            );
            let updater = Updater::new(Arc::new(client), ExternalIpResolver::new(ip_transport));
            let outcome = updater.reconcile().await.context("Update failed")?;
            info!("Result: {}", outcome);
            Ok(outcome.is_success())
        }
        Command::List {
            record_type,
            export,
        } => {
            let records = client.list_records().await.context("Listing failed")?;
            for record in records
                .iter()
                .filter(|r| record_type.as_deref().map_or(true, |t| r.record_type == t))
            {
                println!("{}", record);
            }
            if let Some(path) = export {
                let written = save_json(&records, path).context("Export failed")?;
                info!("Saved {} records to {}", records.len(), written.display());
            }
            Ok(true)
        }
        Command::Add {
            record_type,
            content,
            subdomain,
            ttl,
        } => {
            let mut fields = RecordFields::new()
                .with("domain", &config.domain)
                .with("type", record_type)
                .with("content", content);
            if let Some(subdomain) = subdomain {
                fields.set("subdomain", subdomain);
            }
            if let Some(ttl) = ttl {
                fields.set("ttl", ttl);
            }
            let ok = client.add_record(&fields).await.context("Add failed")?;
            info!("Add {} record {}: {}", record_type, content, if ok { "ok" } else { "failed" });
            Ok(ok)
        }
        Command::Delete { record_id } => {
            let records = client.list_records().await.context("Listing failed")?;
            let Some(record) = records.find(&RecordId::from(record_id.as_str())) else {
                bail!("No record with id {} in {}", record_id, config.domain);
            };
            let ok = client.delete_record(record).await.context("Delete failed")?;
            Ok(ok)
        }
    }
}
