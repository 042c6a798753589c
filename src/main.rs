use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use etlgen::config::AppConfig;
use etlgen::headless::{self, HeadlessFailure};
use etlgen::notify::NotificationKind;
use etlgen::tui::{self, theme};

#[derive(Parser)]
#[command(name = "etlgen", about = "Describe an ETL pipeline, get the code.")]
struct Cli {
    /// Config file (defaults to ~/.etlgen/config.yaml then .etlgen/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the simulated backend latency
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Write logs here (the TUI otherwise logs nothing)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Submit one request without the TUI and print the result
    Generate {
        #[arg(long)]
        source: String,
        #[arg(long)]
        destination: String,
        #[arg(long)]
        prompt: String,
    },
    /// Print the effective configuration
    Config,
}

fn env_filter(default: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::from_default_env().add_directive(default.parse()?))
}

fn init_tracing(cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter("etlgen=info")?)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else if cli.command.is_none() {
        // Raw-mode terminal: nothing may write to it but the renderer.
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("off"))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter("etlgen=info")?)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_file(path)?,
        None => AppConfig::load()?,
    };
    if let Some(latency) = cli.latency_ms {
        config.generation.latency_ms = latency;
    }
    Ok(config)
}

fn print_notifications(notifications: &[(NotificationKind, String)]) {
    for (kind, message) in notifications {
        let tag = match kind {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
        };
        eprintln!("[{tag}] {message}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;
    let config = load_config(&cli)?;

    match &cli.command {
        None => {
            theme::init(theme::Theme::default());
            info!("etlgen starting");
            tui::runner::run_tui(&config).await?;
        }
        Some(Command::Generate {
            source,
            destination,
            prompt,
        }) => {
            let outcome = match headless::generate(&config, source, destination, prompt).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    if let Some(failure) = err.downcast_ref::<HeadlessFailure>() {
                        print_notifications(&failure.notifications);
                    }
                    return Err(err);
                }
            };
            print_notifications(&outcome.notifications);
            println!("{}", outcome.artifact.artifact_text);
        }
        Some(Command::Config) => {
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
