use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::debug;

use super::provider::MetricsProvider;
use super::snapshot::CycleReport;
use super::{cpu, identity, memory, process};
use crate::census::run_census;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensusRequest {
    pub root: PathBuf,
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    pub cpu_window: Duration,
    pub top_n: usize,
    pub combined_top_n: usize,
    pub ip_route_probe: bool,
    pub census: Option<CensusRequest>,
}

impl Default for CollectOptions {
    fn default() -> Self {
        CollectOptions {
            cpu_window: Duration::from_secs(1),
            top_n: 5,
            combined_top_n: 3,
            ip_route_probe: false,
            census: None,
        }
    }
}

/// Runs every collector in sequence against one provider.
pub struct Collector<P> {
    provider: P,
}

impl<P: MetricsProvider> Collector<P> {
    pub fn new(provider: P) -> Self {
        Collector { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn collect(&mut self, options: &CollectOptions) -> CycleReport {
        self.collect_at(options, Local::now())
    }

    /// Collects with `now` as the cycle timestamp and the reference point
    /// for uptime.
    pub fn collect_at(&mut self, options: &CollectOptions, now: DateTime<Local>) -> CycleReport {
        let _span = tracing::debug_span!("collector.cycle").entered();

        let system = identity::collect(&self.provider, now, options.ip_route_probe);
        let cpu = cpu::collect(&mut self.provider, options.cpu_window);
        let memory = memory::collect(&mut self.provider);
        let processes = process::collect(
            &mut self.provider,
            options.top_n,
            options.combined_top_n,
        );
        let census = options
            .census
            .as_ref()
            .map(|request| run_census(&request.root, &request.extensions));

        debug!(
            processes = processes.count,
            cpu = cpu.usage_percent,
            "cycle collected"
        );

        CycleReport {
            timestamp: now,
            system,
            cpu,
            memory,
            processes,
            census,
        }
    }
}
