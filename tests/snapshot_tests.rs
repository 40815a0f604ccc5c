use chrono::{Local, TimeZone};
use insta::assert_snapshot;
use sysglance::metrics::{MetricsSnapshot, keys};
use sysglance::system::collector::{CollectOptions, Collector};
use sysglance::system::fake::FakeProvider;
use sysglance::system::provider::LoadAverage;

/// Every key except the aliases and the two wall-clock values, which depend
/// on the local time zone.
fn stable_view(metrics: &MetricsSnapshot) -> String {
    keys::ALL
        .iter()
        .filter(|key| ![keys::TIMESTAMP, keys::BOOT_TIME].contains(*key))
        .filter(|key| !keys::ALIASES.iter().any(|(alias, _)| alias == *key))
        .map(|key| {
            let value = metrics.get(key).unwrap_or("<missing>");
            format!("{key}: {}", value.replace('\n', " | "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn healthy_cycle_snapshot() {
    let mut provider = FakeProvider::healthy();
    provider.load_average = Some(LoadAverage {
        one: 1.5,
        five: 0.75,
        fifteen: 0.4,
    });
    let mut collector = Collector::new(provider);
    let options = CollectOptions {
        cpu_window: std::time::Duration::ZERO,
        ..CollectOptions::default()
    };
    let now = Local.timestamp_opt(1_700_090_061, 0).unwrap();
    let metrics = collector.collect_at(&options, now).to_metrics();

    assert_snapshot!(stable_view(&metrics), @r"
    hostname: testbox
    os: Linux 6.1.0
    os_long: Linux 12 Debian GNU/Linux 12
    uptime: 1d 1h 1min
    user_count: 1
    users: alice (from local)
    load_average: 1.50, 0.75, 0.40
    ip_address: 192.168.1.20
    cpu_physical_cores: 2
    cpu_logical_cores: 4
    cpu_frequency: 2400.0 MHz
    cpu_percent: 23.0
    cpu_percent_display: 23.0%
    used_memory: 9.82 GB
    total_memory: 16.00 GB
    available_memory: 6.18 GB
    ram_percentage: 61.4
    process_count: 3
    top_cpu_processes: compiler (PID: 42) - 80.0% | database (PID: 77) - 10.0% | init (PID: 1) - 0.1%
    top_memory_processes: database (PID: 77) - 20.0% | compiler (PID: 42) - 4.0% | init (PID: 1) - 0.2%
    top_combined_processes: compiler (PID: 42) - CPU 80.0% / MEM 4.0% | database (PID: 77) - CPU 10.0% / MEM 20.0% | init (PID: 1) - CPU 0.1% / MEM 0.2%
    file_census: N/A
    ");
}

#[test]
fn empty_process_list_reads_none() {
    let provider = FakeProvider::healthy().with_processes(Vec::new());
    let mut collector = Collector::new(provider);
    let options = CollectOptions {
        cpu_window: std::time::Duration::ZERO,
        ..CollectOptions::default()
    };
    let metrics = collector.collect(&options).to_metrics();
    assert_eq!(metrics.get(keys::PROCESS_COUNT), Some("0"));
    assert_eq!(metrics.get(keys::TOP_CPU_PROCESSES), Some("none"));
    assert_eq!(metrics.get(keys::TOP_COMBINED_PROCESSES), Some("none"));
}
