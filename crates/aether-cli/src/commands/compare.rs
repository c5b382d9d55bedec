//! Compare command implementation.

use anyhow::Result;
use console::style;
use serde::Serialize;

use aether_analysis::SecurityReport;
use aether_protocol::{Comparison, run_comparison};

use super::common::{RunArgs, build_protocol, check_format, resolve_config, spinner};

#[derive(Serialize)]
struct ComparisonSummary<'a> {
    aether: &'a SecurityReport,
    mdi: &'a SecurityReport,
    bb84: &'a SecurityReport,
    winner: &'static str,
}

/// Execute the compare command.
pub fn execute(args: &RunArgs) -> Result<()> {
    let json = check_format(&args.format)?;
    let config = resolve_config(args)?;

    if !json {
        println!(
            "{} Comparing AETHER, MDI and BB84 on {} signals (seed {})",
            style("→").cyan().bold(),
            style(config.total_signals).green(),
            style(config.rng_seed).yellow()
        );
    }

    let protocol = build_protocol(config, args)?;
    let progress = spinner("Running protocols...")?;
    let comparison = run_comparison(&protocol)?;
    progress.finish_and_clear();

    let (winner, _) = comparison.winner();
    if json {
        let summary = ComparisonSummary {
            aether: &comparison.aether.report,
            mdi: &comparison.mdi.report,
            bb84: &comparison.bb84.report,
            winner,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_table(&comparison);
    println!(
        "\n{} Winner: {}",
        style("✓").green().bold(),
        style(winner).cyan().bold()
    );
    Ok(())
}

fn print_table(comparison: &Comparison) {
    println!(
        "\n  {:<8} {:>8} {:>10} {:>10} {:>10} {:>12}",
        "Protocol", "Mode", "Sifted", "QBER", "Leakage", "SKR"
    );
    let rows = [
        ("AETHER", &comparison.aether.report),
        ("MDI", &comparison.mdi.report),
        ("BB84", &comparison.bb84.report),
    ];
    for (name, report) in rows {
        let mode = report
            .mode_chosen
            .map_or_else(|| "-".to_string(), |m| m.to_string());
        println!(
            "  {:<8} {:>8} {:>10} {:>10.4} {:>10.4} {:>12.6}",
            name,
            mode,
            report.sifted_length,
            report.qber_observed,
            report.leakage_rate,
            report.secure_key_rate
        );
    }
}
