use chrono::{DateTime, Local};

use super::cpu::CpuReport;
use super::identity::{DATE_TIME_FORMAT, SystemReport};
use super::memory::MemoryReport;
use super::process::ProcessReport;
use crate::census::{ExtensionCensus, summary_or_error};
use crate::error::CensusError;
use crate::metrics::{MetricsSnapshot, keys};

/// Everything one collection cycle produced, in typed form.
#[derive(Debug)]
pub struct CycleReport {
    pub timestamp: DateTime<Local>,
    pub system: SystemReport,
    pub cpu: CpuReport,
    pub memory: Option<MemoryReport>,
    pub processes: ProcessReport,
    pub census: Option<Result<ExtensionCensus, CensusError>>,
}

impl CycleReport {
    /// Flattens the reports in collection order over a seeded snapshot, so
    /// every known key is present even when a collector produced nothing.
    /// Aliases are filled last from the final values.
    pub fn to_metrics(&self) -> MetricsSnapshot {
        let mut out = MetricsSnapshot::seeded();
        out.insert(keys::TIMESTAMP, self.timestamp.format(DATE_TIME_FORMAT));
        self.system.write_metrics(&mut out);
        self.cpu.write_metrics(&mut out);
        if let Some(memory) = &self.memory {
            memory.write_metrics(&mut out);
        }
        self.processes.write_metrics(&mut out);
        if let Some(census) = &self.census {
            out.insert(keys::FILE_CENSUS, summary_or_error(census));
        }
        out.with_aliases()
    }
}
