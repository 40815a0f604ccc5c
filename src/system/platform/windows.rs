use super::PlatformExtensions;
use crate::error::ProviderError;
use crate::system::provider::{LoadAverage, Session};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn load_average() -> Option<LoadAverage> {
        // Windows has no load-average counter; sysinfo reports zeros here.
        None
    }

    fn logged_in_sessions() -> Result<Vec<Session>, ProviderError> {
        Err(ProviderError::Unsupported("logged-in session enumeration"))
    }

    fn max_cpu_frequency_mhz() -> Option<f64> {
        None
    }
}
