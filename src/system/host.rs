use std::net::{IpAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, ProcessRefreshKind, ProcessesToUpdate, System};

use super::platform;
use super::process::ProcessSample;
use super::provider::{
    CpuStats, HostInfo, LoadAverage, MemoryStats, MetricsProvider, ProcessProbe, Session,
};
use crate::error::ProviderError;

/// Public address used only to pick an outbound route; nothing is sent.
const ROUTE_PROBE_TARGET: &str = "8.8.8.8:80";

/// [`MetricsProvider`] backed by `sysinfo` and the platform extensions.
pub struct SysinfoProvider {
    sys: System,
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProvider {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        refresh_processes(&mut sys);
        SysinfoProvider { sys }
    }
}

fn refresh_processes(sys: &mut System) {
    sys.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing().with_memory().with_cpu(),
    );
}

impl MetricsProvider for SysinfoProvider {
    /// Process CPU shares are refreshed over the same window, so
    /// [`MetricsProvider::processes`] reports usage for this sample.
    fn sample_cpu(&mut self, window: Duration) -> CpuStats {
        self.sys.refresh_cpu_all();
        refresh_processes(&mut self.sys);
        std::thread::sleep(window.max(MINIMUM_CPU_UPDATE_INTERVAL));
        self.sys.refresh_cpu_all();
        refresh_processes(&mut self.sys);

        let cpus = self.sys.cpus();
        CpuStats {
            usage_percent: self.sys.global_cpu_usage(),
            per_core_percent: cpus.iter().map(|c| c.cpu_usage()).collect(),
            physical_cores: System::physical_core_count(),
            logical_cores: cpus.len(),
            frequency_mhz: cpus
                .first()
                .map(|c| c.frequency())
                .filter(|&mhz| mhz > 0)
                .map(|mhz| mhz as f64),
            max_frequency_mhz: platform::max_cpu_frequency_mhz(),
        }
    }

    fn memory(&mut self) -> Result<MemoryStats, ProviderError> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(ProviderError::Unavailable("memory"));
        }
        let used = self.sys.used_memory();
        Ok(MemoryStats {
            total_bytes: total,
            used_bytes: used,
            available_bytes: self.sys.available_memory(),
            percent: used as f64 / total as f64 * 100.0,
        })
    }

    fn host(&self) -> HostInfo {
        HostInfo {
            hostname: System::host_name(),
            os_name: System::name(),
            os_release: System::kernel_version(),
            os_long: System::long_os_version(),
            boot_time: Some(System::boot_time()).filter(|&t| t > 0),
        }
    }

    fn load_average(&self) -> Option<LoadAverage> {
        platform::load_average()
    }

    fn sessions(&self) -> Result<Vec<Session>, ProviderError> {
        platform::logged_in_sessions()
    }

    fn processes(&mut self) -> Vec<ProcessProbe> {
        let total_memory = self.sys.total_memory();
        let mut probes: Vec<ProcessProbe> = self
            .sys
            .processes()
            .iter()
            .map(|(pid, process)| {
                let memory_percent = (total_memory > 0)
                    .then(|| (process.memory() as f64 / total_memory as f64 * 100.0) as f32);
                ProcessProbe::Sample(ProcessSample {
                    pid: pid.as_u32(),
                    name: process.name().to_string_lossy().to_string(),
                    cpu_percent: Some(process.cpu_usage()),
                    memory_percent,
                })
            })
            .collect();
        // HashMap order is arbitrary; rank ties by pid instead.
        probes.sort_by_key(|probe| match probe {
            ProcessProbe::Sample(sample) => sample.pid,
            ProcessProbe::Vanished(pid) => *pid,
        });
        probes
    }

    fn resolve_host(&self, hostname: &str) -> Result<IpAddr, ProviderError> {
        let addrs: Vec<IpAddr> = (hostname, 0)
            .to_socket_addrs()
            .map_err(|source| ProviderError::Resolve {
                host: hostname.to_string(),
                source,
            })?
            .map(|addr| addr.ip())
            .collect();
        addrs
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| ProviderError::NoAddress(hostname.to_string()))
    }

    fn route_probe_address(&self) -> Result<IpAddr, ProviderError> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect(ROUTE_PROBE_TARGET)?;
        Ok(socket.local_addr()?.ip())
    }
}
