use tracing::warn;

use super::provider::MetricsProvider;
use crate::format::format_gib;
use crate::metrics::{MetricsSnapshot, keys};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemoryReport {
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub percent: f64,
}

/// `None` when the host memory API is unavailable; the other collectors
/// are unaffected.
pub fn collect<P: MetricsProvider + ?Sized>(provider: &mut P) -> Option<MemoryReport> {
    let _span = tracing::debug_span!("collector.memory").entered();

    match provider.memory() {
        Ok(stats) => Some(MemoryReport {
            used_bytes: stats.used_bytes,
            total_bytes: stats.total_bytes,
            available_bytes: stats.available_bytes,
            percent: stats.percent,
        }),
        Err(err) => {
            warn!(%err, "memory collector skipped");
            None
        }
    }
}

impl MemoryReport {
    pub fn write_metrics(&self, out: &mut MetricsSnapshot) {
        out.insert(keys::USED_MEMORY, format_gib(self.used_bytes));
        out.insert(keys::TOTAL_MEMORY, format_gib(self.total_bytes));
        out.insert(keys::AVAILABLE_MEMORY, format_gib(self.available_bytes));
        out.insert(keys::RAM_PERCENTAGE, format!("{:.1}", self.percent));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::fake::FakeProvider;

    #[test]
    fn converts_bytes_to_gib() {
        let mut provider = FakeProvider::healthy();
        let report = collect(&mut provider).expect("memory available");
        let mut out = MetricsSnapshot::new();
        report.write_metrics(&mut out);
        assert_eq!(out.get(keys::TOTAL_MEMORY), Some("16.00 GB"));
        assert_eq!(out.get(keys::USED_MEMORY), Some("9.82 GB"));
        assert_eq!(out.get(keys::RAM_PERCENTAGE), Some("61.4"));
    }

    #[test]
    fn unavailable_memory_yields_none() {
        let mut provider = FakeProvider::healthy();
        provider.memory = None;
        assert!(collect(&mut provider).is_none());
    }
}
