use std::net::IpAddr;

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use super::provider::{LoadAverage, MetricsProvider, Session};
use crate::format::Uptime;
use crate::metrics::{MetricsSnapshot, UNAVAILABLE, keys};

pub const NO_LOAD_AVERAGE: &str = "N/A (not available on this platform)";
pub const NO_ADDRESS: &str = "unavailable";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct SystemReport {
    pub hostname: Option<String>,
    pub os: String,
    pub os_long: Option<String>,
    pub boot_time: Option<DateTime<Local>>,
    pub uptime: Option<Uptime>,
    pub sessions: Vec<Session>,
    pub load_average: Option<LoadAverage>,
    pub ip_address: Option<IpAddr>,
}

pub fn collect<P: MetricsProvider + ?Sized>(
    provider: &P,
    now: DateTime<Local>,
    route_probe: bool,
) -> SystemReport {
    let _span = tracing::debug_span!("collector.system").entered();

    let host = provider.host();
    let os = [host.os_name.as_deref(), host.os_release.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    let boot_time = host
        .boot_time
        .filter(|&secs| secs > 0)
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|utc| utc.with_timezone(&Local));
    let uptime = boot_time.map(|boot| {
        let elapsed = now.signed_duration_since(boot).num_seconds().max(0);
        Uptime::from_secs(elapsed as u64)
    });

    let sessions = provider.sessions().unwrap_or_else(|err| {
        warn!(%err, "could not enumerate logged-in sessions");
        Vec::new()
    });

    let ip_address = primary_address(provider, host.hostname.as_deref(), route_probe);

    SystemReport {
        hostname: host.hostname,
        os: if os.is_empty() {
            UNAVAILABLE.to_string()
        } else {
            os
        },
        os_long: host.os_long,
        boot_time,
        uptime,
        sessions,
        load_average: provider.load_average(),
        ip_address,
    }
}

/// Forward-resolves the hostname, optionally falling back to the local
/// address of the default route.
fn primary_address<P: MetricsProvider + ?Sized>(
    provider: &P,
    hostname: Option<&str>,
    route_probe: bool,
) -> Option<IpAddr> {
    if let Some(hostname) = hostname {
        match provider.resolve_host(hostname) {
            Ok(addr) => return Some(addr),
            Err(err) => debug!(%err, "hostname resolution failed"),
        }
    }
    if route_probe {
        match provider.route_probe_address() {
            Ok(addr) => return Some(addr),
            Err(err) => debug!(%err, "route probe failed"),
        }
    }
    None
}

impl SystemReport {
    pub fn hostname_label(&self) -> &str {
        self.hostname.as_deref().unwrap_or(UNAVAILABLE)
    }

    pub fn boot_time_label(&self) -> String {
        self.boot_time
            .map(|t| t.format(DATE_TIME_FORMAT).to_string())
            .unwrap_or_else(|| UNAVAILABLE.to_string())
    }

    pub fn load_average_label(&self) -> String {
        match self.load_average {
            Some(load) => format!("{:.2}, {:.2}, {:.2}", load.one, load.five, load.fifteen),
            None => NO_LOAD_AVERAGE.to_string(),
        }
    }

    pub fn ip_address_label(&self) -> String {
        self.ip_address
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| NO_ADDRESS.to_string())
    }

    pub fn session_lines(&self) -> Vec<String> {
        self.sessions
            .iter()
            .map(|s| format!("{} (from {})", s.name, s.origin()))
            .collect()
    }

    pub fn write_metrics(&self, out: &mut MetricsSnapshot) {
        out.insert(keys::HOSTNAME, self.hostname_label());
        out.insert(keys::OS, &self.os);
        out.insert(keys::OS_LONG, self.os_long.as_deref().unwrap_or(UNAVAILABLE));
        out.insert(keys::BOOT_TIME, self.boot_time_label());
        out.insert(
            keys::UPTIME,
            self.uptime
                .map(|u| u.short())
                .unwrap_or_else(|| UNAVAILABLE.to_string()),
        );
        out.insert(keys::USER_COUNT, self.sessions.len());
        let users = self.session_lines();
        out.insert(
            keys::USERS,
            if users.is_empty() {
                "none".to_string()
            } else {
                users.join("\n")
            },
        );
        out.insert(keys::LOAD_AVERAGE, self.load_average_label());
        out.insert(keys::IP_ADDRESS, self.ip_address_label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::fake::FakeProvider;
    use chrono::TimeZone;
    use std::net::Ipv4Addr;

    fn now() -> DateTime<Local> {
        Local.timestamp_opt(1_700_090_061, 0).unwrap()
    }

    #[test]
    fn uptime_is_now_minus_boot() {
        let provider = FakeProvider::healthy();
        let report = collect(&provider, now(), false);
        assert_eq!(report.uptime.map(|u| u.short()).as_deref(), Some("1d 1h 1min"));
        assert_eq!(report.os, "Linux 6.1.0");
    }

    #[test]
    fn boot_in_the_future_clamps_to_zero() {
        let mut provider = FakeProvider::healthy();
        provider.host.boot_time = Some(1_800_000_000);
        let report = collect(&provider, now(), false);
        assert_eq!(report.uptime, Some(Uptime::default()));
    }

    #[test]
    fn resolution_failure_reports_unavailable() {
        let mut provider = FakeProvider::healthy();
        provider.address = None;
        let report = collect(&provider, now(), false);
        let mut out = MetricsSnapshot::new();
        report.write_metrics(&mut out);
        assert_eq!(out.get(keys::IP_ADDRESS), Some(NO_ADDRESS));
        assert_eq!(out.get(keys::HOSTNAME), Some("testbox"));
    }

    #[test]
    fn route_probe_is_used_when_enabled() {
        let mut provider = FakeProvider::healthy();
        provider.address = None;
        provider.route_address = Some(IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)));
        assert_eq!(collect(&provider, now(), false).ip_address, None);
        assert_eq!(
            collect(&provider, now(), true).ip_address_label(),
            "10.1.2.3"
        );
    }

    #[test]
    fn session_failure_defaults_to_empty_list() {
        let mut provider = FakeProvider::healthy();
        provider.sessions = None;
        let report = collect(&provider, now(), false);
        let mut out = MetricsSnapshot::new();
        report.write_metrics(&mut out);
        assert_eq!(out.get(keys::USER_COUNT), Some("0"));
        assert_eq!(out.get(keys::USERS), Some("none"));
    }

    #[test]
    fn sessions_show_origin() {
        let mut provider = FakeProvider::healthy();
        provider.sessions = Some(vec![
            Session {
                name: "alice".into(),
                host: None,
            },
            Session {
                name: "bob".into(),
                host: Some("203.0.113.9".into()),
            },
        ]);
        let report = collect(&provider, now(), false);
        assert_eq!(
            report.session_lines(),
            vec!["alice (from local)", "bob (from 203.0.113.9)"]
        );
    }

    #[test]
    fn missing_load_average_uses_platform_sentinel() {
        let mut provider = FakeProvider::healthy();
        provider.load_average = None;
        let report = collect(&provider, now(), false);
        assert_eq!(report.load_average_label(), NO_LOAD_AVERAGE);

        provider.load_average = Some(LoadAverage {
            one: 1.0,
            five: 0.5,
            fifteen: 0.25,
        });
        let report = collect(&provider, now(), false);
        assert_eq!(report.load_average_label(), "1.00, 0.50, 0.25");
    }
}
