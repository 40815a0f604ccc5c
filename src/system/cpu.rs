use std::time::Duration;

use super::provider::MetricsProvider;
use crate::format::format_mhz;
use crate::metrics::{MetricsSnapshot, UNAVAILABLE, keys};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuReport {
    pub physical_cores: Option<usize>,
    pub logical_cores: usize,
    pub frequency_mhz: Option<f64>,
    pub max_frequency_mhz: Option<f64>,
    pub usage_percent: f32,
    pub per_core_percent: Vec<f32>,
}

pub fn collect<P: MetricsProvider + ?Sized>(provider: &mut P, window: Duration) -> CpuReport {
    let _span = tracing::debug_span!("collector.cpu").entered();

    let stats = provider.sample_cpu(window);
    CpuReport {
        physical_cores: stats.physical_cores.filter(|&n| n > 0),
        logical_cores: stats.logical_cores,
        frequency_mhz: stats.frequency_mhz.filter(|&f| valid_mhz(f)),
        max_frequency_mhz: stats.max_frequency_mhz.filter(|&f| valid_mhz(f)),
        usage_percent: stats.usage_percent,
        per_core_percent: stats.per_core_percent,
    }
}

fn valid_mhz(mhz: f64) -> bool {
    mhz.is_finite() && mhz > 0.0
}

fn mhz_label(mhz: Option<f64>) -> String {
    mhz.map(format_mhz).unwrap_or_else(|| UNAVAILABLE.to_string())
}

impl CpuReport {
    pub fn frequency_label(&self) -> String {
        mhz_label(self.frequency_mhz)
    }

    pub fn max_frequency_label(&self) -> String {
        mhz_label(self.max_frequency_mhz)
    }

    pub fn physical_cores_label(&self) -> String {
        self.physical_cores
            .map(|n| n.to_string())
            .unwrap_or_else(|| UNAVAILABLE.to_string())
    }

    pub fn write_metrics(&self, out: &mut MetricsSnapshot) {
        out.insert(keys::CPU_PHYSICAL_CORES, self.physical_cores_label());
        out.insert(keys::CPU_LOGICAL_CORES, self.logical_cores);
        out.insert(keys::CPU_FREQUENCY, self.frequency_label());
        out.insert(keys::CPU_PERCENT, format!("{:.1}", self.usage_percent));
        out.insert(
            keys::CPU_PERCENT_DISPLAY,
            format!("{:.1}%", self.usage_percent),
        );
    }
}
