use clap::{Parser, Subcommand};
use tracing::{debug, error};

/// Expand annotation rows to full cluster membership
#[derive(Parser)]
#[command(name = "unirex")]
#[command(about = "Expand protein annotation rows to the union of their cluster members", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the persisted cluster index from a raw membership table
    BuildIndex(unirex::build::BuildIndexCommand),
    /// Expand an annotation table against a persisted cluster index
    Expand(unirex::expand::ExpandCommand),
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .init();

    debug!("unirex started with verbosity level: {}", cli.verbose);

    let result = match cli.command {
        Commands::BuildIndex(cmd) => unirex::build::run(cmd),
        Commands::Expand(cmd) => unirex::expand::run(cmd),
    };

    if let Err(e) = result {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
