use clap::{Parser, Subcommand};

use crate::{config::StreamConfig, error::Result, replay::ReplayArgs};

mod config;
mod error;
mod lambda;
mod replay;

#[derive(Parser)]
#[command(name = "es-stream")]
#[command(about = "Index storage notification objects into a search service")]
#[command(version)]
struct Cli {
    #[clap(flatten)]
    config: StreamConfig,
    /// Defaults to serving Lambda invocations.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve notification events from the Lambda runtime
    Lambda,
    /// Process a single event file and print the batch report
    Replay {
        #[clap(flatten)]
        inner: ReplayArgs,
    },
}

#[tokio::main]
#[snafu::report]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    es_stream_observability::init_observability(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    );

    match cli.command.unwrap_or(Commands::Lambda) {
        Commands::Lambda => lambda::run(cli.config).await,
        Commands::Replay { inner } => inner.run(cli.config).await,
    }
}
