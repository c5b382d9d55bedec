//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - adaptive locked MDI-QKD simulator",
        style("AETHER").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  aether-ir        Gates, state vectors and register embedding");
    println!("  aether-compile   Locking-circuit generation and linear routing");
    println!("  aether-sim       Noisy state-vector evolution");
    println!("  aether-analysis  Finite-key secure-key-rate analysis");
    println!("  aether-protocol  Controller, orchestrator and baselines");
    println!("  aether-cli       Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style(env!("CARGO_PKG_REPOSITORY")).underlined()
    );
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
