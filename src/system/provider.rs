use std::net::IpAddr;
use std::time::Duration;

use crate::error::ProviderError;
use crate::system::process::ProcessSample;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuStats {
    pub usage_percent: f32,
    pub per_core_percent: Vec<f32>,
    pub physical_cores: Option<usize>,
    pub logical_cores: usize,
    pub frequency_mhz: Option<f64>,
    pub max_frequency_mhz: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemoryStats {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInfo {
    pub hostname: Option<String>,
    pub os_name: Option<String>,
    pub os_release: Option<String>,
    pub os_long: Option<String>,
    /// Seconds since the Unix epoch; `None` when the host does not report it.
    pub boot_time: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// A logged-in interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub host: Option<String>,
}

impl Session {
    pub fn origin(&self) -> &str {
        match self.host.as_deref() {
            Some(host) if !host.is_empty() => host,
            _ => "local",
        }
    }
}

/// One entry of a process enumeration. Processes can exit between being
/// listed and being read.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessProbe {
    Sample(ProcessSample),
    Vanished(u32),
}

/// Access to host state. Collectors only reach the operating system
/// through this trait.
pub trait MetricsProvider {
    /// Blocks for `window` to measure utilization.
    fn sample_cpu(&mut self, window: Duration) -> CpuStats;

    fn memory(&mut self) -> Result<MemoryStats, ProviderError>;

    fn host(&self) -> HostInfo;

    /// `None` when the platform has no load-average primitive.
    fn load_average(&self) -> Option<LoadAverage>;

    fn sessions(&self) -> Result<Vec<Session>, ProviderError>;

    fn processes(&mut self) -> Vec<ProcessProbe>;

    fn resolve_host(&self, hostname: &str) -> Result<IpAddr, ProviderError>;

    /// Local address the kernel would use for outbound traffic.
    fn route_probe_address(&self) -> Result<IpAddr, ProviderError>;
}
