//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use aether_analysis::{DualStreamAnalysis, FiniteKeyAnalysis, SecurityReport};
use aether_compile::{AdaptiveBraidGenerator, UniformRandomGenerator};
use aether_protocol::{
    AetherProtocol, FixedController, LeakageSource, PartialBellRelay, RunConfig,
};

/// Environment and policy flags shared by `run` and `compare`.
///
/// Flags override values loaded from `--config`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Number of signals per party
    #[arg(short = 'n', long)]
    pub signals: Option<usize>,

    /// Signals per locking block
    #[arg(short, long)]
    pub block_size: Option<usize>,

    /// Photon loss on Alice's channel
    #[arg(long)]
    pub loss_a: Option<f64>,

    /// Photon loss on Bob's channel
    #[arg(long)]
    pub loss_b: Option<f64>,

    /// Hardware noise probability
    #[arg(long)]
    pub noise: Option<f64>,

    /// Source leakage rate or adversary strength
    #[arg(long)]
    pub leakage: Option<f64>,

    /// Adversary model (none, fixed, static, adaptive)
    #[arg(long)]
    pub adversary: Option<String>,

    /// Random seed
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Controller QBER threshold
    #[arg(long)]
    pub qber_threshold: Option<f64>,

    /// Controller leakage threshold
    #[arg(long)]
    pub leakage_threshold: Option<f64>,

    /// Relay model (perfect, partial)
    #[arg(long, default_value = "perfect")]
    pub relay: String,

    /// Analysis model (dual, finite)
    #[arg(long, default_value = "dual")]
    pub analysis: String,

    /// Locking-circuit generator (adaptive, uniform)
    #[arg(long, default_value = "adaptive")]
    pub generator: String,

    /// Skip the controller and force a mode (lock, nolock)
    #[arg(long)]
    pub force_mode: Option<String>,

    /// Locking depth used with --force-mode lock
    #[arg(long, default_value = "8")]
    pub lock_depth: usize,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Load a run configuration from a YAML or JSON file.
pub fn load_config(path: &str) -> Result<RunConfig> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    let ext = path_obj.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&source)
            .with_context(|| format!("Invalid JSON configuration: {path}")),
        _ => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Invalid YAML configuration: {path}")),
    }
}

/// Build a leakage source from an adversary name and a strength.
pub fn parse_leakage(kind: &str, value: f64) -> Result<LeakageSource> {
    match kind.to_lowercase().as_str() {
        "none" => Ok(LeakageSource::None),
        "fixed" => Ok(LeakageSource::Fixed { rate: value }),
        "static" => Ok(LeakageSource::Static { strength: value }),
        "adaptive" => Ok(LeakageSource::Adaptive { base: value }),
        other => {
            anyhow::bail!("Unknown adversary: '{other}'. Available: none, fixed, static, adaptive")
        }
    }
}

/// Resolve the effective configuration: file first, then flags.
pub fn resolve_config(args: &RunArgs) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RunConfig::default(),
    };

    if let Some(n) = args.signals {
        config.total_signals = n;
    }
    if let Some(b) = args.block_size {
        config.block_size = b;
    }
    if let Some(l) = args.loss_a {
        config.channel_loss_a = l;
    }
    if let Some(l) = args.loss_b {
        config.channel_loss_b = l;
    }
    if let Some(p) = args.noise {
        config.hardware_noise = p;
    }
    if let Some(s) = args.seed {
        config.rng_seed = s;
    }
    if let Some(t) = args.qber_threshold {
        config.qber_threshold = t;
    }
    if let Some(t) = args.leakage_threshold {
        config.leakage_threshold = t;
    }
    match (args.adversary.as_deref(), args.leakage) {
        (Some(kind), value) => config.leakage = parse_leakage(kind, value.unwrap_or(0.0))?,
        (None, Some(value)) => config.leakage = LeakageSource::Fixed { rate: value },
        (None, None) => {}
    }

    config.validate()?;
    debug!(?config, "resolved configuration");
    Ok(config)
}

/// Assemble the protocol with the policies selected by flags.
pub fn build_protocol(config: RunConfig, args: &RunArgs) -> Result<AetherProtocol> {
    let mut protocol = AetherProtocol::new(config);

    protocol = match args.relay.to_lowercase().as_str() {
        "perfect" => protocol,
        "partial" => protocol.with_relay(PartialBellRelay::new(PartialBellRelay::STANDARD)?),
        other => anyhow::bail!("Unknown relay: '{other}'. Available: perfect, partial"),
    };

    protocol = match args.analysis.to_lowercase().as_str() {
        "dual" | "dual_stream" => protocol.with_analysis(DualStreamAnalysis::default()),
        "finite" | "finite_key" => protocol.with_analysis(FiniteKeyAnalysis::default()),
        other => anyhow::bail!("Unknown analysis: '{other}'. Available: dual, finite"),
    };

    protocol = match args.generator.to_lowercase().as_str() {
        "adaptive" => protocol.with_generator(AdaptiveBraidGenerator::new()),
        "uniform" => protocol.with_generator(UniformRandomGenerator),
        other => anyhow::bail!("Unknown generator: '{other}'. Available: adaptive, uniform"),
    };

    if let Some(mode) = &args.force_mode {
        protocol = match mode.to_lowercase().as_str() {
            "lock" => protocol.with_controller(FixedController::lock(args.lock_depth)),
            "nolock" | "no-lock" => protocol.with_controller(FixedController::no_lock()),
            other => anyhow::bail!("Unknown mode: '{other}'. Available: lock, nolock"),
        };
    }

    Ok(protocol)
}

/// Check the output format name.
pub fn check_format(format: &str) -> Result<bool> {
    match format.to_lowercase().as_str() {
        "table" => Ok(false),
        "json" => Ok(true),
        other => anyhow::bail!("Unknown format: '{other}'. Available: table, json"),
    }
}

/// Create a steady spinner with a message.
pub fn spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Print a security report in table format.
pub fn print_report(title: &str, report: &SecurityReport) {
    let verdict = if report.is_secure() {
        style("secure").green().bold()
    } else {
        style("insecure").red().bold()
    };
    println!("\n{} {} ({}):", style("✓").green().bold(), title, verdict);
    if let Some(mode) = report.mode_chosen {
        println!("  Mode:            {}", style(mode).yellow());
    }
    println!("  Analysis:        {}", report.analysis);
    println!(
        "  Sifted key:      {} of {} signals",
        report.sifted_length, report.total_signals
    );
    println!("  QBER observed:   {:.4}", report.qber_observed);
    match report.qber_bound {
        Some(bound) => println!("  QBER bound:      {bound:.4}"),
        None => println!("  QBER bound:      -"),
    }
    println!("  Leakage rate:    {:.4}", report.leakage_rate);
    println!(
        "  Secure key rate: {}",
        style(format!("{:.6}", report.secure_key_rate)).cyan()
    );
    println!("  Final key bits:  {}", report.final_key_bits);
}
