//! compound-agent CLI binary entry point.

use clap::Parser;
use compound_agent::cli::commands::{handle_ask, handle_calc, handle_tools};
use compound_agent::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Calc(args) => handle_calc(&args),
        Commands::Tools => handle_tools(),
        Commands::Ask(args) => handle_ask(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "compound_agent=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
