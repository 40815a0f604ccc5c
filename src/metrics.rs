use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;

/// Value used for any key a collector could not resolve.
pub const UNAVAILABLE: &str = "N/A";

/// Snapshot keys. Every key here is present in a seeded snapshot.
pub mod keys {
    pub const TIMESTAMP: &str = "timestamp";

    pub const HOSTNAME: &str = "hostname";
    pub const OS: &str = "os";
    pub const OS_LONG: &str = "os_long";
    pub const BOOT_TIME: &str = "boot_time";
    pub const UPTIME: &str = "uptime";
    pub const USER_COUNT: &str = "user_count";
    pub const USERS: &str = "users";
    pub const LOAD_AVERAGE: &str = "load_average";
    pub const IP_ADDRESS: &str = "ip_address";

    pub const CPU_PHYSICAL_CORES: &str = "cpu_physical_cores";
    pub const CPU_LOGICAL_CORES: &str = "cpu_logical_cores";
    pub const CPU_FREQUENCY: &str = "cpu_frequency";
    pub const CPU_PERCENT: &str = "cpu_percent";
    pub const CPU_PERCENT_DISPLAY: &str = "cpu_percent_display";

    pub const USED_MEMORY: &str = "used_memory";
    pub const TOTAL_MEMORY: &str = "total_memory";
    pub const AVAILABLE_MEMORY: &str = "available_memory";
    pub const RAM_PERCENTAGE: &str = "ram_percentage";

    pub const PROCESS_COUNT: &str = "process_count";
    pub const TOP_CPU_PROCESSES: &str = "top_cpu_processes";
    pub const TOP_MEMORY_PROCESSES: &str = "top_memory_processes";
    pub const TOP_COMBINED_PROCESSES: &str = "top_combined_processes";

    pub const FILE_CENSUS: &str = "file_census";

    // Names used by earlier `template.html` files.
    pub const NAME_PC: &str = "name_pc";
    pub const NAME_SYSTEME: &str = "name_systeme";
    pub const USER_NOMBER: &str = "user_nomber";
    pub const SYSTEM_LOAD: &str = "system_load";
    pub const CPU_COUNT: &str = "cpu_count";
    pub const FREQUENCY: &str = "frequency";
    pub const TOP_3_PROCESSES: &str = "top_3_processes";
    pub const POURCENTAGE: &str = "pourcentage";

    /// `(alias, key)` pairs. Each alias carries a copy of its key's value.
    pub const ALIASES: [(&str, &str); 8] = [
        (NAME_PC, HOSTNAME),
        (NAME_SYSTEME, OS),
        (USER_NOMBER, USER_COUNT),
        (SYSTEM_LOAD, LOAD_AVERAGE),
        (CPU_COUNT, CPU_PHYSICAL_CORES),
        (FREQUENCY, CPU_FREQUENCY),
        (TOP_3_PROCESSES, TOP_CPU_PROCESSES),
        (POURCENTAGE, FILE_CENSUS),
    ];

    pub const ALL: [&str; 32] = [
        TIMESTAMP,
        HOSTNAME,
        OS,
        OS_LONG,
        BOOT_TIME,
        UPTIME,
        USER_COUNT,
        USERS,
        LOAD_AVERAGE,
        IP_ADDRESS,
        CPU_PHYSICAL_CORES,
        CPU_LOGICAL_CORES,
        CPU_FREQUENCY,
        CPU_PERCENT,
        CPU_PERCENT_DISPLAY,
        USED_MEMORY,
        TOTAL_MEMORY,
        AVAILABLE_MEMORY,
        RAM_PERCENTAGE,
        PROCESS_COUNT,
        TOP_CPU_PROCESSES,
        TOP_MEMORY_PROCESSES,
        TOP_COMBINED_PROCESSES,
        FILE_CENSUS,
        NAME_PC,
        NAME_SYSTEME,
        USER_NOMBER,
        SYSTEM_LOAD,
        CPU_COUNT,
        FREQUENCY,
        TOP_3_PROCESSES,
        POURCENTAGE,
    ];
}

/// Flat key/value view of one collection cycle, consumed by the renderer
/// and the JSON printer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetricsSnapshot {
    values: BTreeMap<String, String>,
}

impl MetricsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot where every known key already maps to [`UNAVAILABLE`].
    pub fn seeded() -> Self {
        let mut snapshot = Self::new();
        for key in keys::ALL {
            snapshot.insert(key, UNAVAILABLE);
        }
        snapshot
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) {
        self.values.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Later values win.
    pub fn merge(&mut self, other: MetricsSnapshot) {
        self.values.extend(other.values);
    }

    /// Copies each key's current value onto its aliases.
    pub fn with_aliases(mut self) -> Self {
        let aliases: MetricsSnapshot = keys::ALIASES
            .iter()
            .filter_map(|&(alias, key)| self.get(key).map(|value| (alias, value.to_string())))
            .collect();
        self.merge(aliases);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for MetricsSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (key, value) in iter {
            snapshot.insert(key, value);
        }
        snapshot
    }
}
