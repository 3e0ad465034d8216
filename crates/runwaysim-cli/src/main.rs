//! runwaysim - Monte Carlo runway and deadline simulator CLI
//!
//! ## Commands
//!
//! - `simulate`: Run a scenario file and print the outcome
//! - `sample`: Print a ready-to-edit sample scenario
//! - `config`: Print the default model parameters
//! - `report`: Render a saved run as Markdown

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use runwaysim_core::metrics::METRICS;
use runwaysim_core::{
    read_result_json, render_result_md, write_result_json, Category, HeadlineSummary, Module, Role,
    SimulationConfig, SimulationRequest, SimulationResult, SimulationRun, Simulator, TeamMember,
};
use runwaysim_core::Level as Seniority;

#[derive(Parser)]
#[command(name = "runwaysim")]
#[command(version = runwaysim_core::VERSION)]
#[command(about = "Seeded Monte Carlo simulation of project deadlines and runway", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a scenario
    Simulate {
        /// Scenario file (JSON: modules, team, deadlineDays, runwayMonths, ...)
        #[arg(short, long)]
        input: PathBuf,

        /// Model parameter overrides (JSON); omitted fields keep defaults
        #[arg(short, long, env = "RUNWAYSIM_CONFIG")]
        config: Option<PathBuf>,

        /// Override the scenario seed
        #[arg(long)]
        seed: Option<i64>,

        /// Override the scenario trial count
        #[arg(long)]
        trials: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also save the run as JSON into this directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Print a sample scenario
    Sample,

    /// Print the default model parameters
    Config,

    /// Render a saved run as Markdown
    Report {
        /// Path to a run JSON written by `simulate --output-dir`
        run: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    runwaysim_core::telemetry::init_tracing(cli.json, level);

    let outcome = match cli.command {
        Commands::Simulate {
            input,
            config,
            seed,
            trials,
            format,
            output_dir,
        } => cmd_simulate(
            &input,
            config.as_deref(),
            seed,
            trials,
            format,
            output_dir.as_deref(),
        )
        .map(|out| println!("{out}")),
        Commands::Sample => cmd_sample().map(|out| println!("{out}")),
        Commands::Config => cmd_config().map(|out| println!("{out}")),
        Commands::Report { run } => cmd_report(&run).map(|out| println!("{out}")),
    };

    METRICS.flush();
    outcome
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}

/// Read a scenario and apply command-line overrides before normalizing.
fn load_request(path: &Path, seed: Option<i64>, trials: Option<u32>) -> Result<SimulationRequest> {
    let mut request: SimulationRequest = read_json_file(path)?;
    if seed.is_some() {
        request.seed = seed;
    }
    if trials.is_some() {
        request.trial_count = trials;
    }
    Ok(request)
}

fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(p) => SimulationConfig::from_json_file(p)
            .with_context(|| format!("Failed to load config {:?}", p)),
        None => Ok(SimulationConfig::default()),
    }
}

fn cmd_simulate(
    input: &Path,
    config: Option<&Path>,
    seed: Option<i64>,
    trials: Option<u32>,
    format: OutputFormat,
    output_dir: Option<&Path>,
) -> Result<String> {
    let request = load_request(input, seed, trials)?;
    let simulator = Simulator::new(load_config(config)?).context("Invalid configuration")?;

    let input = request.normalize();
    let result = simulator
        .run(&input)
        .with_context(|| format!("Simulation of {} failed", input_label(&input.modules)))?;
    let run = SimulationRun::new(input, result).context("Failed to record run")?;

    if let Some(dir) = output_dir {
        let path = write_result_json(dir, &run)?;
        info!(path = %path.display(), "run saved");
    }

    Ok(match format {
        OutputFormat::Text => render_result_text(&run),
        OutputFormat::Json => serde_json::to_string_pretty(&run.result)?,
        OutputFormat::Markdown => render_result_md(&run),
    })
}

fn input_label(modules: &[Module]) -> String {
    match modules.len() {
        0 => "empty scenario".to_string(),
        1 => format!("1 module ({})", modules[0].id),
        n => format!("{n} modules"),
    }
}

fn cmd_sample() -> Result<String> {
    Ok(serde_json::to_string_pretty(&sample_request())?)
}

fn cmd_config() -> Result<String> {
    Ok(serde_json::to_string_pretty(&SimulationConfig::default())?)
}

fn cmd_report(path: &Path) -> Result<String> {
    let run = read_result_json(path)?;
    Ok(render_result_md(&run))
}

/// A six-module venture staffed by five people.
fn sample_request() -> SimulationRequest {
    SimulationRequest {
        modules: vec![
            Module::new("M1", Category::Backend, 4, 3)
                .with_name("Core API")
                .with_external_dependencies(["DocuSign"])
                .with_risk_drivers(["integration"]),
            Module::new("M2", Category::Data, 5, 4)
                .with_name("Analytics pipeline")
                .with_risk_drivers(["unknown_requirements"]),
            Module::new("M3", Category::Frontend, 3, 2).with_name("Web app"),
            Module::new("M4", Category::Infra, 3, 3)
                .with_name("CRM sync")
                .with_external_dependencies(["Salesforce", "HubSpot"])
                .with_risk_drivers(["integration", "security"]),
            Module::new("M5", Category::Legal, 2, 3)
                .with_name("Terms and compliance")
                .with_risk_drivers(["compliance"]),
            Module::new("M6", Category::Business, 2, 2)
                .with_name("Billing")
                .with_external_dependencies(["Stripe"]),
        ],
        team: vec![
            TeamMember::new("Alex", Role::Backend, Seniority::Senior),
            TeamMember::new("Sam", Role::Frontend, Seniority::Mid),
            TeamMember::new("Jordan", Role::Data, Seniority::Mid),
            TeamMember::new("Casey", Role::Legal, Seniority::Senior),
            TeamMember::new("Riley", Role::Business, Seniority::Senior),
        ],
        deadline_days: Some(90),
        runway_months: Some(8),
        seed: Some(42),
        trial_count: Some(800),
    }
}

fn render_result_text(run: &SimulationRun) -> String {
    let result: &SimulationResult = &run.result;
    let headline = HeadlineSummary::from_result(result);

    let mut out = String::new();
    out.push_str(&format!(
        "Simulated {} trials (seed {})\n",
        result.trial_count(),
        run.input.seed
    ));
    out.push_str(&format!(
        "  On time ({}d):      {:>6.1}%  [{}]\n",
        run.input.deadline_days,
        result.on_time_probability * 100.0,
        headline.on_time_risk
    ));
    out.push_str(&format!(
        "  Within runway ({}mo): {:>6.1}%  [{}]\n",
        run.input.runway_months,
        result.within_runway_probability * 100.0,
        headline.runway_risk
    ));
    out.push_str(&format!(
        "  Finish: p50 {}d, p90 {}d, mean {}d\n",
        result.p50_days, result.p90_days, result.mean_days
    ));
    out.push_str(&format!(
        "  Primary failure mode: {}\n",
        headline.primary_failure_mode
    ));
    if let Some(module) = &headline.most_critical_module {
        out.push_str(&format!("  Most critical module: {}\n", module));
    }
    if let Some((role, ratio)) = headline.most_overloaded_role {
        out.push_str(&format!("  Most loaded role: {} ({:.3})\n", role, ratio));
    }
    out.push_str(&format!("  Input digest: {}", run.input_digest));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_scenario(dir: &Path) -> PathBuf {
        let path = dir.join("scenario.json");
        let raw = serde_json::to_string(&sample_request()).expect("serialize sample");
        std::fs::write(&path, raw).expect("write scenario");
        path
    }

    #[test]
    fn test_sample_request_normalizes_unchanged() {
        let input = sample_request().normalize();
        assert_eq!(input.trial_count, 800);
        assert_eq!(input.seed, 42);
        assert_eq!(input.deadline_days, 90);
        assert_eq!(input.runway_months, 8);
        assert_eq!(input.modules.len(), 6);
    }

    #[test]
    fn test_sample_output_parses_back() {
        let raw = cmd_sample().expect("sample");
        let parsed: SimulationRequest = serde_json::from_str(&raw).expect("parse sample");
        assert_eq!(parsed, sample_request());
    }

    #[test]
    fn test_config_output_parses_back() {
        let raw = cmd_config().expect("config");
        let parsed: SimulationConfig = serde_json::from_str(&raw).expect("parse config");
        assert_eq!(parsed.top_k, SimulationConfig::default().top_k);
    }

    #[test]
    fn test_overrides_apply() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_scenario(dir.path());
        let request = load_request(&path, Some(7), Some(150)).expect("load");
        assert_eq!(request.seed, Some(7));
        assert_eq!(request.trial_count, Some(150));

        let untouched = load_request(&path, None, None).expect("load");
        assert_eq!(untouched.seed, Some(42));
    }

    #[test]
    fn test_simulate_json_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_scenario(dir.path());
        let out = cmd_simulate(&path, None, None, Some(100), OutputFormat::Json, None)
            .expect("simulate");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json output");
        assert_eq!(value["finishDays"].as_array().map(Vec::len), Some(100));
        assert!(value["topBottlenecks"].is_array());
    }

    #[test]
    fn test_simulate_saves_run_and_report_renders_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_scenario(dir.path());
        let runs = dir.path().join("runs");
        let text = cmd_simulate(
            &path,
            None,
            None,
            Some(100),
            OutputFormat::Text,
            Some(runs.as_path()),
        )
        .expect("simulate");
        assert!(text.starts_with("Simulated 100 trials (seed 42)\n"));
        assert!(text.contains("Primary failure mode: "));

        let saved: Vec<PathBuf> = std::fs::read_dir(&runs)
            .expect("runs dir")
            .map(|e| e.expect("dir entry").path())
            .collect();
        assert_eq!(saved.len(), 1);

        let md = cmd_report(&saved[0]).expect("report");
        assert!(md.starts_with("# Simulation Report\n"));
        assert!(md.contains("- trials: 100\n"));
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_scenario(dir.path());
        let cfg = dir.path().join("config.json");
        std::fs::write(&cfg, r#"{"top_k": 2}"#).expect("write config");

        let out = cmd_simulate(&path, Some(&cfg), None, Some(100), OutputFormat::Json, None)
            .expect("simulate");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json output");
        assert!(value["topFailureModes"].as_array().map(Vec::len).unwrap_or(0) <= 2);
    }

    #[test]
    fn test_invalid_scenario_reports_context() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.json");
        std::fs::write(&path, r#"{"modules": [], "team": []}"#).expect("write");
        let err = cmd_simulate(&path, None, None, None, OutputFormat::Text, None)
            .expect_err("empty scenario");
        assert!(format!("{err:#}").contains("empty scenario"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = cmd_report(Path::new("/nonexistent/run.json")).expect_err("missing");
        assert!(format!("{err:#}").contains("read"));
    }
}
