use clap::{Parser, Subcommand};
use datalens::config::{self, Config};
use datalens::error::Result;
use datalens::pipeline::{followers, network, RunSummary};
use datalens::{constants, logging};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "datalens")]
#[command(about = "Data-flow network and social audience visualization pipelines")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory for rendered artifacts and normalized tables
    #[arg(long, global = true)]
    output_dir: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the organization's data-flow network from a published spreadsheet
    Network {
        /// Spreadsheet id (falls back to DATALENS_SHEET_ID)
        #[arg(long)]
        sheet_id: Option<String>,
    },
    /// Analyze a social account's followers: charts, word cloud, maps, table
    Followers {
        /// Account handle (falls back to DATALENS_SOCIAL_HANDLE)
        #[arg(long)]
        handle: Option<String>,
    },
    /// Run both pipelines sequentially
    Run {
        #[arg(long)]
        sheet_id: Option<String>,
        #[arg(long)]
        handle: Option<String>,
    },
}

fn print_summary(summary: &RunSummary) {
    println!("\n📊 Pipeline results for {}:", summary.pipeline);
    println!("   Records fetched: {}", summary.records_fetched);
    println!("   Records kept: {}", summary.records_kept);
    if summary.pipeline == constants::FOLLOWERS_PIPELINE {
        println!("   Records geocoded: {}", summary.records_geocoded);
    }
    println!("   Artifacts:");
    for artifact in &summary.artifacts {
        println!("     - {artifact}");
    }
}

async fn run_network(config: &Config, sheet_id: Option<String>) -> Result<()> {
    let sheet_id = config::sheet_id(sheet_id)?;
    println!("🚀 Running network pipeline...");
    let summary = network::run(config, &sheet_id).await?;
    print_summary(&summary);
    Ok(())
}

async fn run_followers(config: &Config, handle: Option<String>) -> Result<()> {
    let handle = config::social_handle(handle)?;
    println!("🚀 Running follower pipeline...");
    let summary = followers::run(config, &handle).await?;
    print_summary(&summary);
    Ok(())
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Config comes first: it decides where the log files go.
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    logging::init_logging(&config.log_dir);

    let result = match cli.command {
        Commands::Network { sheet_id } => run_network(&config, sheet_id).await,
        Commands::Followers { handle } => run_followers(&config, handle).await,
        Commands::Run { sheet_id, handle } => {
            // Strictly sequential: the network pipeline completes before
            // the follower pipeline starts.
            match run_network(&config, sheet_id).await {
                Ok(()) => run_followers(&config, handle).await,
                Err(e) => Err(e),
            }
        }
    };

    match result {
        Ok(()) => {
            info!("Run completed");
            println!("\n✅ Done");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("\n❌ {e}");
            std::process::ExitCode::FAILURE
        }
    }
}
