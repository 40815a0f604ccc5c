use super::provider::{LoadAverage, Session};
use crate::error::ProviderError;

pub trait PlatformExtensions {
    fn load_average() -> Option<LoadAverage>;
    fn logged_in_sessions() -> Result<Vec<Session>, ProviderError>;
    /// Rated maximum clock of the first CPU, when the OS publishes one.
    fn max_cpu_frequency_mhz() -> Option<f64>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(any(target_os = "linux", target_os = "macos"))]
mod utmpx;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn load_average() -> Option<LoadAverage> {
    platform_impl::Platform::load_average()
}

pub fn logged_in_sessions() -> Result<Vec<Session>, ProviderError> {
    platform_impl::Platform::logged_in_sessions()
}

pub fn max_cpu_frequency_mhz() -> Option<f64> {
    platform_impl::Platform::max_cpu_frequency_mhz()
}
