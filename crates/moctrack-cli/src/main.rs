//! CLI application for MOC invoice tracking.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, issue, portfolio, rollup, statement, status};

/// MOC invoice tracking - rollups, status changes and supplier statements
#[derive(Parser)]
#[command(name = "moctrack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a single contract
    Rollup(rollup::RollupArgs),

    /// Aggregate many contracts into dashboard figures
    Portfolio(portfolio::PortfolioArgs),

    /// Change an invoice's status or amounts
    Status(status::StatusArgs),

    /// Raise a new invoice against a contract
    Issue(issue::IssueArgs),

    /// Build a supplier statement of account
    Statement(statement::StatementArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Rollup(args) => rollup::run(args, cli.config.as_deref()).await,
        Commands::Portfolio(args) => portfolio::run(args, cli.config.as_deref()).await,
        Commands::Status(args) => status::run(args, cli.config.as_deref()).await,
        Commands::Issue(args) => issue::run(args, cli.config.as_deref()).await,
        Commands::Statement(args) => statement::run(args).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
