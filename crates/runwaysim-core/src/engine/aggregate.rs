//! Reduction of trial outcomes into a [`SimulationResult`].

use std::collections::{BTreeMap, HashMap};

use crate::config::SimulationConfig;
use crate::domain::module::{Role, TeamMember};
use crate::domain::result::{RankedCount, SimulationResult};
use crate::rng::percentile;

use super::trial::Trial;

/// Insertion-ordered frequency counter.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: Vec<(String, u32)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn get(&self, key: &str) -> u32 {
        self.index.get(key).map_or(0, |&i| self.entries[i].1)
    }

    /// The `k` most frequent keys; equal counts keep first-seen order.
    pub fn top(&self, k: usize) -> Vec<RankedCount> {
        let mut ranked: Vec<&(String, u32)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(k)
            .map(|(key, count)| RankedCount::new(key.clone(), *count))
            .collect()
    }
}

/// Accumulates trial outcomes for one simulation.
#[derive(Debug)]
pub struct Aggregator {
    deadline_days: u32,
    runway_days: f64,
    finish_days: Vec<u32>,
    on_time: u32,
    within_runway: u32,
    bottlenecks: FrequencyTable,
    failure_modes: FrequencyTable,
    /// Total sampled days per primary role, across all trials.
    role_days: BTreeMap<Role, f64>,
    headcount: BTreeMap<Role, u32>,
}

impl Aggregator {
    pub fn new(team: &[TeamMember], deadline_days: u32, runway_days: f64, trials: u32) -> Self {
        let mut headcount = BTreeMap::new();
        for member in team {
            *headcount.entry(member.role).or_insert(0) += 1;
        }
        Self {
            deadline_days,
            runway_days,
            finish_days: Vec::with_capacity(trials as usize),
            on_time: 0,
            within_runway: 0,
            bottlenecks: FrequencyTable::new(),
            failure_modes: FrequencyTable::new(),
            role_days: BTreeMap::new(),
            headcount,
        }
    }

    /// Fold one trial in.
    ///
    /// `primary_roles[i]` is the role charged with the module at position
    /// `i`; `bottleneck_id` is the id of the trial's bottleneck module.
    pub fn record(&mut self, trial: &Trial, bottleneck_id: &str, primary_roles: &[Role]) {
        for (role, days) in primary_roles.iter().zip(&trial.durations) {
            *self.role_days.entry(*role).or_insert(0.0) += *days;
        }

        self.finish_days.push(trial.finish_days);
        if trial.finish_days <= self.deadline_days {
            self.on_time += 1;
        }
        if f64::from(trial.finish_days) <= self.runway_days {
            self.within_runway += 1;
        }
        self.bottlenecks.increment(bottleneck_id);
        self.failure_modes
            .increment(&trial.failure_mode.to_string());
    }

    pub fn trials_recorded(&self) -> usize {
        self.finish_days.len()
    }

    /// Produce the final, immutable result.
    pub fn finish(self, config: &SimulationConfig) -> SimulationResult {
        let n = self.finish_days.len().max(1) as f64;

        let mut sorted = self.finish_days.clone();
        sorted.sort_unstable();

        let mean = self
            .finish_days
            .iter()
            .map(|&d| f64::from(d))
            .sum::<f64>()
            / n;

        let role_overload = self
            .role_days
            .iter()
            .map(|(role, total)| {
                let capacity = self
                    .headcount
                    .get(role)
                    .map_or(config.unstaffed_role_capacity, |&c| f64::from(c));
                let average = total / n;
                let ratio = average / (capacity * f64::from(self.deadline_days));
                (*role, round_to(ratio, 3))
            })
            .collect();

        SimulationResult {
            on_time_probability: round_to(f64::from(self.on_time) / n, 4),
            within_runway_probability: round_to(f64::from(self.within_runway) / n, 4),
            p50_days: percentile(&sorted, 0.5),
            p90_days: percentile(&sorted, 0.9),
            mean_days: round_to(mean, 1),
            top_bottlenecks: self.bottlenecks.top(config.top_k),
            top_failure_modes: self.failure_modes.top(config.top_k),
            finish_days: self.finish_days,
            role_overload,
        }
    }
}

/// Fractional digits needed to print any `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Round to `decimals` places by the exact binary value of `value`.
///
/// The decision looks at the full decimal expansion, so 25.65 (stored just
/// below 25.65) rounds to 25.6, while an exactly representable half such as
/// 24.25 rounds away from zero to 24.3.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (int_part, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let (kept, dropped) = fraction.split_at(decimals.min(fraction.len()));

    let mut digits: Vec<u8> = int_part.bytes().chain(kept.bytes()).collect();
    let mut int_len = int_part.len();
    if dropped.as_bytes().first().is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
            int_len += 1;
        }
    }

    let mut text = String::with_capacity(digits.len() + 2);
    for (i, d) in digits.iter().enumerate() {
        if i == int_len {
            text.push('.');
        }
        text.push(char::from(*d));
    }
    let magnitude = text.parse::<f64>().unwrap_or(value.abs());
    if value.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}
