//! Human- and machine-readable views of a simulation.
//!
//! Everything here is derived from a finished [`SimulationResult`]; nothing
//! feeds back into the engine.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::module::Role;
use crate::domain::result::SimulationResult;
use crate::run::SimulationRun;

/// Default number of histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 13;

const ON_TIME_THRESHOLDS: (f64, f64) = (0.65, 0.35);
const RUNWAY_THRESHOLDS: (f64, f64) = (0.75, 0.45);

/// One equal-width bucket of finish days, `lo..=hi`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistogramBin {
    pub lo: u32,
    pub hi: u32,
    pub count: u32,
}

/// Bucket finish days into `bins` equal-width integer bins spanning min to
/// max. Values past the last bin are counted in it. Empty input yields no
/// bins.
pub fn finish_histogram(finish_days: &[u32], bins: usize) -> Vec<HistogramBin> {
    let (Some(&lo), Some(&hi)) = (finish_days.iter().min(), finish_days.iter().max()) else {
        return Vec::new();
    };
    let bins = bins.max(1);
    let span = (hi - lo) as usize + 1;
    let width = span.div_ceil(bins).max(1) as u32;

    let mut out: Vec<HistogramBin> = (0..bins as u32)
        .map(|i| HistogramBin {
            lo: lo + i * width,
            hi: lo + i * width + width - 1,
            count: 0,
        })
        .collect();
    for &d in finish_days {
        let idx = (((d - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Coarse risk rating of a success probability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    fn classify(probability: f64, (low, moderate): (f64, f64)) -> Self {
        let p = if probability.is_finite() {
            probability
        } else {
            0.0
        };
        if p >= low {
            RiskBand::Low
        } else if p >= moderate {
            RiskBand::Moderate
        } else {
            RiskBand::High
        }
    }

    /// Band for the on-time probability (0.65 / 0.35).
    pub fn for_on_time(probability: f64) -> Self {
        Self::classify(probability, ON_TIME_THRESHOLDS)
    }

    /// Band for the within-runway probability (0.75 / 0.45).
    pub fn for_runway(probability: f64) -> Self {
        Self::classify(probability, RUNWAY_THRESHOLDS)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Low => "LOW RISK",
            RiskBand::Moderate => "MODERATE",
            RiskBand::High => "HIGH RISK",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The few facts a reader wants first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeadlineSummary {
    /// Most frequent failure mode other than `on_time`, else `on_time`.
    pub primary_failure_mode: String,
    pub most_critical_module: Option<String>,
    pub on_time_risk: RiskBand,
    pub runway_risk: RiskBand,
    pub most_overloaded_role: Option<(Role, f64)>,
}

impl HeadlineSummary {
    pub fn from_result(result: &SimulationResult) -> Self {
        let primary_failure_mode = result
            .top_failure_modes
            .iter()
            .find(|r| r.key != "on_time")
            .map_or_else(|| "on_time".to_string(), |r| r.key.clone());
        Self {
            primary_failure_mode,
            most_critical_module: result.top_bottleneck().map(str::to_string),
            on_time_risk: RiskBand::for_on_time(result.on_time_probability),
            runway_risk: RiskBand::for_runway(result.within_runway_probability),
            most_overloaded_role: result.most_overloaded_role(),
        }
    }
}

fn percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Render a Markdown report of a recorded run.
pub fn render_result_md(run: &SimulationRun) -> String {
    let result = &run.result;
    let headline = HeadlineSummary::from_result(result);
    let n = result.trial_count();

    let mut out = String::new();
    out.push_str("# Simulation Report\n\n");
    out.push_str(&format!(
        "- trials: {}\n- seed: {}\n- deadline: {} days\n- runway: {} months\n- input digest: `{}`\n\n",
        n, run.input.seed, run.input.deadline_days, run.input.runway_months, run.input_digest
    ));

    out.push_str("## Outlook\n");
    out.push_str(&format!(
        "- on time: {} ({})\n- within runway: {} ({})\n- p50: {} days\n- p90: {} days\n- mean: {} days\n- primary failure mode: {}\n\n",
        percent(result.on_time_probability),
        headline.on_time_risk,
        percent(result.within_runway_probability),
        headline.runway_risk,
        result.p50_days,
        result.p90_days,
        result.mean_days,
        headline.primary_failure_mode
    ));

    if !result.top_bottlenecks.is_empty() {
        out.push_str("## Bottlenecks\n");
        for r in &result.top_bottlenecks {
            out.push_str(&format!("- `{}`: {} trials\n", r.key, r.count));
        }
        out.push('\n');
    }

    if !result.top_failure_modes.is_empty() {
        out.push_str("## Failure Modes\n");
        for r in &result.top_failure_modes {
            out.push_str(&format!("- {}: {} trials\n", r.key, r.count));
        }
        out.push('\n');
    }

    if !result.role_overload.is_empty() {
        out.push_str("## Role Overload\n");
        for (role, ratio) in &result.role_overload {
            let flag = if *ratio > 1.0 { " (over capacity)" } else { "" };
            out.push_str(&format!("- {}: {:.3}{}\n", role, ratio, flag));
        }
        out.push('\n');
    }

    let histogram = finish_histogram(&result.finish_days, DEFAULT_HISTOGRAM_BINS);
    if !histogram.is_empty() {
        out.push_str("## Finish Days\n");
        for bin in &histogram {
            out.push_str(&format!("- {}-{}: {}\n", bin.lo, bin.hi, bin.count));
        }
    }
    out
}

/// Write the run as pretty JSON into `dir`, returning the file path.
pub fn write_result_json(dir: &Path, run: &SimulationRun) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {:?}", dir))?;
    let path = dir.join(run.file_name());
    let content = serde_json::to_string_pretty(run).context("serialize simulation run")?;
    std::fs::write(&path, content).with_context(|| format!("write {:?}", path))?;
    Ok(path)
}

/// Load a run previously written by [`write_result_json`].
pub fn read_result_json(path: &Path) -> Result<SimulationRun> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {:?}", path))
}
