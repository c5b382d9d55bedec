//! Run command implementation.

use anyhow::Result;
use console::style;
use serde::Serialize;

use aether_analysis::SecurityReport;
use aether_protocol::{Decision, DiagnosticStats, RunOutcome};

use super::common::{RunArgs, build_protocol, check_format, print_report, resolve_config, spinner};

/// Serializable view of a run without the raw bit streams.
#[derive(Serialize)]
struct RunSummary<'a> {
    report: &'a SecurityReport,
    decision: &'a Decision,
    diagnostics: Option<&'a DiagnosticStats>,
    leakage_rate: f64,
    compiled_depth: Option<usize>,
    fidelity_collapses: usize,
    mean_fidelity: Option<f64>,
    high_quality_length: usize,
    recycled_length: usize,
}

impl<'a> RunSummary<'a> {
    fn new(outcome: &'a RunOutcome) -> Self {
        Self {
            report: &outcome.report,
            decision: &outcome.decision,
            diagnostics: outcome.diagnostics.as_ref(),
            leakage_rate: outcome.leakage_rate,
            compiled_depth: outcome.compiled_depth,
            fidelity_collapses: outcome.fidelity_collapses,
            mean_fidelity: outcome.mean_fidelity,
            high_quality_length: outcome.streams.high_quality().len(),
            recycled_length: outcome.streams.recycled().len(),
        }
    }
}

/// Execute the run command.
pub fn execute(args: &RunArgs) -> Result<()> {
    let json = check_format(&args.format)?;
    let config = resolve_config(args)?;

    if !json {
        println!(
            "{} Running AETHER: {} signals, block {}, loss {}/{}, noise {}, seed {}",
            style("→").cyan().bold(),
            style(config.total_signals).green(),
            config.block_size,
            config.channel_loss_a,
            config.channel_loss_b,
            config.hardware_noise,
            style(config.rng_seed).yellow()
        );
    }

    let protocol = build_protocol(config, args)?;
    let progress = spinner("Exchanging signals...")?;
    let outcome = protocol.run()?;
    progress.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&RunSummary::new(&outcome))?);
        return Ok(());
    }

    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &RunOutcome) {
    if let Some(stats) = &outcome.diagnostics {
        println!("\n  Diagnostics ({} samples):", stats.sifted_samples);
        println!("    QBER mean:           {:.4}", stats.qber_mean);
        println!("    QBER upper bound:    {:.4}", stats.qber_upper_bound);
        println!("    Leakage upper bound: {:.4}", stats.leakage_upper_bound);
    }
    println!(
        "\n  Decision: {} (depth {})",
        style(outcome.decision.mode).yellow().bold(),
        outcome.decision.locking_depth
    );
    if let Some(depth) = outcome.compiled_depth {
        println!("  Compiled locking depth: {depth}");
    }
    if let Some(fidelity) = outcome.mean_fidelity {
        println!(
            "  Mean unlock fidelity: {fidelity:.6} ({} collapses)",
            outcome.fidelity_collapses
        );
    }
    println!(
        "  Streams: {} high-quality, {} recycled",
        outcome.streams.high_quality().len(),
        outcome.streams.recycled().len()
    );

    print_report("AETHER", &outcome.report);
}
