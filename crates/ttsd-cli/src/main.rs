//! CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ttsd_cli::{Cli, Commands, handlers};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.unwrap_or_default() {
        Commands::Version => {
            handlers::version::execute();
            Ok(())
        }
        Commands::Serve => handlers::serve::execute(&cli).await,
    }
}
