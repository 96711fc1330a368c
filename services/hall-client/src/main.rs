//! Hall client CLI
//!
//! Command-line waiting room and admin console for the Hall gateway.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hall_client::admin::format_summary;
use hall_client::poller::PollOutcome;
use hall_client::{load_config, Config, HallClientBuilder};
use tracing::Level;

#[derive(Parser)]
#[command(name = "hall-client")]
#[command(about = "Waiting room and admin console for the Hall wake-on-demand gateway")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gateway base URL (overrides config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Wait until a domain's application is ready and print its URL
    Wait {
        /// Domain to wait for (overrides config file)
        domain: Option<String>,

        /// Polling interval in milliseconds (overrides config file)
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Ask the gateway to reload its configuration
    Reload,
    /// Print the gateway's configuration summary
    Config,
    /// Ask the gateway to power off a domain's server
    Shutdown {
        /// Domain whose server should be shut down
        domain: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, base_url={:?}, log_level={:?}",
        args.config,
        args.base_url,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.resolve_secrets()?;

    if let Some(base_url) = args.base_url {
        config.gateway.base_url = base_url;
    }
    if let Command::Wait {
        domain,
        interval_ms,
    } = &args.command
    {
        if let Some(domain) = domain {
            config.waiting.domain = Some(domain.clone());
        }
        if let Some(interval_ms) = interval_ms {
            config.waiting.polling_interval_ms = *interval_ms;
        }
    }

    let client = HallClientBuilder::new(config).build()?;

    match args.command {
        Command::Wait { .. } => {
            let cancel = client.cancellation_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Shutdown signal received");
                    cancel.cancel();
                }
            });

            match client.wait(None).await? {
                PollOutcome::Redirected { .. } => Ok(ExitCode::SUCCESS),
                PollOutcome::Stopped { session } => {
                    tracing::info!(
                        "Gave up on '{}' after {} checks",
                        session.domain,
                        session.check_count
                    );
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Reload => {
            client.reload().await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config => {
            let summary = client.config_summary().await?;
            print!("{}", format_summary(&summary));
            Ok(ExitCode::SUCCESS)
        }
        Command::Shutdown { domain } => {
            client.shutdown(&domain).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
