//! AETHER Command-Line Interface
//!
//! Runs the adaptive locked MDI-QKD simulator and its baselines.
//!
//! ```text
//! aether run --signals 20000 --loss-a 0.02 --loss-b 0.02 --noise 0.001
//! aether compare --config scenario.yaml --format json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::RunArgs;
use commands::{compare, run, version};

/// AETHER - adaptive locked MDI-QKD simulation and key-rate analysis
#[derive(Parser)]
#[command(name = "aether")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulated key exchange and print its security report
    Run {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Run AETHER, standard MDI and BB84 on the same environment
    Compare {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run { args } => run::execute(&args),
        Commands::Compare { args } => compare::execute(&args),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
