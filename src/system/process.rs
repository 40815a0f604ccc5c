use std::cmp::Ordering;

use tracing::debug;

use super::provider::{MetricsProvider, ProcessProbe};
use crate::metrics::{MetricsSnapshot, keys};

/// Weight applied to memory share in the combined ranking.
pub const MEMORY_WEIGHT: f64 = 2.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: Option<f32>,
    pub memory_percent: Option<f32>,
}

impl ProcessSample {
    pub fn cpu_or_zero(&self) -> f64 {
        or_zero(self.cpu_percent)
    }

    pub fn memory_or_zero(&self) -> f64 {
        or_zero(self.memory_percent)
    }

    /// `cpu + 2 * mem`, with absent values counted as 0.
    pub fn combined_score(&self) -> f64 {
        self.cpu_or_zero() + MEMORY_WEIGHT * self.memory_or_zero()
    }
}

fn or_zero(value: Option<f32>) -> f64 {
    value
        .filter(|v| v.is_finite())
        .map(f64::from)
        .unwrap_or(0.0)
}

/// Highest `key` first. The sort is stable so ties keep enumeration order.
fn top_by<F>(samples: &[ProcessSample], n: usize, key: F) -> Vec<ProcessSample>
where
    F: Fn(&ProcessSample) -> f64,
{
    let mut ranked: Vec<&ProcessSample> = samples.iter().collect();
    ranked.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    ranked.into_iter().take(n).cloned().collect()
}

pub fn top_by_cpu(samples: &[ProcessSample], n: usize) -> Vec<ProcessSample> {
    top_by(samples, n, ProcessSample::cpu_or_zero)
}

pub fn top_by_memory(samples: &[ProcessSample], n: usize) -> Vec<ProcessSample> {
    top_by(samples, n, ProcessSample::memory_or_zero)
}

pub fn top_by_combined(samples: &[ProcessSample], n: usize) -> Vec<ProcessSample> {
    top_by(samples, n, ProcessSample::combined_score)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessReport {
    pub count: usize,
    pub top_cpu: Vec<ProcessSample>,
    pub top_memory: Vec<ProcessSample>,
    pub top_combined: Vec<ProcessSample>,
}

pub fn collect<P: MetricsProvider + ?Sized>(
    provider: &mut P,
    top_n: usize,
    combined_top_n: usize,
) -> ProcessReport {
    let _span = tracing::debug_span!("collector.processes").entered();

    let mut samples = Vec::new();
    let mut vanished = 0usize;
    for probe in provider.processes() {
        match probe {
            ProcessProbe::Sample(sample) => samples.push(sample),
            ProcessProbe::Vanished(_) => vanished += 1,
        }
    }
    if vanished > 0 {
        debug!(vanished, "processes exited during enumeration");
    }

    ProcessReport {
        count: samples.len(),
        top_cpu: top_by_cpu(&samples, top_n),
        top_memory: top_by_memory(&samples, top_n),
        top_combined: top_by_combined(&samples, combined_top_n),
    }
}

fn percent_label(value: Option<f32>) -> String {
    match value {
        Some(v) => format!("{v:.1}%"),
        None => "n/a".to_string(),
    }
}

fn lines<F>(samples: &[ProcessSample], describe: F) -> String
where
    F: Fn(&ProcessSample) -> String,
{
    if samples.is_empty() {
        return "none".to_string();
    }
    samples
        .iter()
        .map(|p| format!("{} (PID: {}) - {}", p.name, p.pid, describe(p)))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ProcessReport {
    pub fn write_metrics(&self, out: &mut MetricsSnapshot) {
        out.insert(keys::PROCESS_COUNT, self.count);
        out.insert(
            keys::TOP_CPU_PROCESSES,
            lines(&self.top_cpu, |p| percent_label(p.cpu_percent)),
        );
        out.insert(
            keys::TOP_MEMORY_PROCESSES,
            lines(&self.top_memory, |p| percent_label(p.memory_percent)),
        );
        out.insert(
            keys::TOP_COMBINED_PROCESSES,
            lines(&self.top_combined, |p| {
                format!(
                    "CPU {} / MEM {}",
                    percent_label(p.cpu_percent),
                    percent_label(p.memory_percent)
                )
            }),
        );
    }
}
