use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use clariscan_client::{ClientConfig, HttpAnalysisClient};
use clariscan_core::DocumentUpload;
use clariscan_session::{LifecycleState, Session};

mod display;

/// Exit code for a document the service did not recognise as a contract.
const EXIT_REJECTED: u8 = 2;

#[derive(Parser)]
#[command(name = "clariscan", version, about = "Risk-annotated contract review")]
struct Cli {
    /// Base URL of the analysis service.
    #[arg(long, env = "CLARISCAN_API_URL", default_value = ClientConfig::DEFAULT_BASE_URL, global = true)]
    api_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "CLARISCAN_TIMEOUT_SECS", default_value_t = 120, global = true)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a contract and show its risk breakdown.
    Analyze {
        /// Contract document (PDF).
        file: PathBuf,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
        /// Print clause text in full.
        #[arg(long)]
        full: bool,
    },
    /// Check that the analysis service is reachable.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    tracing::info!("clariscan v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config =
        ClientConfig::new(cli.api_url).with_timeout(Duration::from_secs(cli.timeout_secs));
    let client = HttpAnalysisClient::new(config).context("building HTTP client")?;

    match cli.command {
        Command::Analyze { file, json, full } => analyze(client, &file, json, full).await,
        Command::Health => health(&client).await,
    }
}

async fn analyze(
    client: HttpAnalysisClient,
    path: &Path,
    json: bool,
    full: bool,
) -> anyhow::Result<ExitCode> {
    let upload = DocumentUpload::from_path(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let session = Session::new(client);
    session.select(upload).await;
    if let Err(err) = session.submit().await {
        eprintln!("{err}");
        return Ok(ExitCode::FAILURE);
    }

    match session.state().await {
        LifecycleState::Displaying(displayed) => {
            if json {
                let rendered = serde_json::to_string_pretty(&displayed.report)
                    .context("serialising report")?;
                println!("{rendered}");
            } else {
                let mut stdout = std::io::stdout().lock();
                display::write_report(&mut stdout, &displayed, full)
                    .context("writing report")?;
            }
            Ok(ExitCode::SUCCESS)
        }
        LifecycleState::Rejected { message } => {
            eprintln!("{message}");
            Ok(ExitCode::from(EXIT_REJECTED))
        }
        LifecycleState::Failed { message } => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
        other => anyhow::bail!("unexpected state after submission: {}", other.name()),
    }
}

async fn health(client: &HttpAnalysisClient) -> anyhow::Result<ExitCode> {
    let status = client
        .health()
        .await
        .with_context(|| format!("contacting {}", client.config().base_url))?;

    println!("  {:<26} {}", "status", status.status);
    println!("  {:<26} {}", "service", status.service);
    println!("  {:<26} {}", "engine", status.engine);

    Ok(if status.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
