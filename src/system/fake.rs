use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use super::process::ProcessSample;
use super::provider::{
    CpuStats, HostInfo, LoadAverage, MemoryStats, MetricsProvider, ProcessProbe, Session,
};
use crate::error::ProviderError;

/// Scripted provider for tests and benchmarks. `None` fields make the
/// corresponding query fail.
#[derive(Debug, Clone)]
pub struct FakeProvider {
    pub cpu: CpuStats,
    pub memory: Option<MemoryStats>,
    pub host: HostInfo,
    pub load_average: Option<LoadAverage>,
    pub sessions: Option<Vec<Session>>,
    pub processes: Vec<ProcessProbe>,
    pub address: Option<IpAddr>,
    pub route_address: Option<IpAddr>,
    /// Windows passed to `sample_cpu`, in call order.
    pub cpu_samples: Vec<Duration>,
}

impl FakeProvider {
    pub fn healthy() -> Self {
        FakeProvider {
            cpu: CpuStats {
                usage_percent: 23.0,
                per_core_percent: vec![10.0, 36.0],
                physical_cores: Some(2),
                logical_cores: 4,
                frequency_mhz: Some(2400.0),
                max_frequency_mhz: Some(3600.0),
            },
            memory: Some(MemoryStats {
                total_bytes: 16 * 1024 * 1024 * 1024,
                used_bytes: 10_544_144_712,
                available_bytes: 6_635_724_472,
                percent: 61.4,
            }),
            host: HostInfo {
                hostname: Some("testbox".to_string()),
                os_name: Some("Linux".to_string()),
                os_release: Some("6.1.0".to_string()),
                os_long: Some("Linux 12 Debian GNU/Linux 12".to_string()),
                boot_time: Some(1_700_000_000),
            },
            load_average: Some(LoadAverage {
                one: 0.5,
                five: 0.25,
                fifteen: 0.125,
            }),
            sessions: Some(vec![Session {
                name: "alice".to_string(),
                host: None,
            }]),
            processes: vec![
                sample(1, "init", 0.1, 0.2),
                sample(42, "compiler", 80.0, 4.0),
                sample(77, "database", 10.0, 20.0),
            ],
            address: Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20))),
            route_address: None,
            cpu_samples: Vec::new(),
        }
    }

    pub fn with_processes(mut self, processes: Vec<ProcessProbe>) -> Self {
        self.processes = processes;
        self
    }
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::healthy()
    }
}

fn sample(pid: u32, name: &str, cpu: f32, mem: f32) -> ProcessProbe {
    ProcessProbe::Sample(ProcessSample {
        pid,
        name: name.to_string(),
        cpu_percent: Some(cpu),
        memory_percent: Some(mem),
    })
}

impl MetricsProvider for FakeProvider {
    fn sample_cpu(&mut self, window: Duration) -> CpuStats {
        self.cpu_samples.push(window);
        self.cpu.clone()
    }

    fn memory(&mut self) -> Result<MemoryStats, ProviderError> {
        self.memory.ok_or(ProviderError::Unavailable("memory"))
    }

    fn host(&self) -> HostInfo {
        self.host.clone()
    }

    fn load_average(&self) -> Option<LoadAverage> {
        self.load_average
    }

    fn sessions(&self) -> Result<Vec<Session>, ProviderError> {
        self.sessions
            .clone()
            .ok_or(ProviderError::Unavailable("logged-in sessions"))
    }

    fn processes(&mut self) -> Vec<ProcessProbe> {
        self.processes.clone()
    }

    fn resolve_host(&self, hostname: &str) -> Result<IpAddr, ProviderError> {
        self.address
            .ok_or_else(|| ProviderError::NoAddress(hostname.to_string()))
    }

    fn route_probe_address(&self) -> Result<IpAddr, ProviderError> {
        self.route_address
            .ok_or(ProviderError::Unavailable("route probe"))
    }
}
