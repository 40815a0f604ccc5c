use std::fs;

use sysinfo::System;

use super::{PlatformExtensions, utmpx};
use crate::error::ProviderError;
use crate::system::provider::{LoadAverage, Session};

const CPU0_MAX_FREQ: &str = "/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq";

pub struct Platform;

impl PlatformExtensions for Platform {
    fn load_average() -> Option<LoadAverage> {
        // Backed by /proc/loadavg
        let load = System::load_average();
        Some(LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        })
    }

    fn logged_in_sessions() -> Result<Vec<Session>, ProviderError> {
        // glibc reads /var/run/utmp; containers often have none, which is an
        // empty list rather than an error.
        Ok(utmpx::read_user_sessions())
    }

    fn max_cpu_frequency_mhz() -> Option<f64> {
        // Absent in most VMs and containers.
        fs::read_to_string(CPU0_MAX_FREQ)
            .ok()
            .and_then(|raw| parse_khz(&raw))
    }
}

/// cpufreq sysfs values are in kHz.
fn parse_khz(raw: &str) -> Option<f64> {
    let khz: u64 = raw.trim().parse().ok()?;
    (khz > 0).then(|| khz as f64 / 1000.0)
}
