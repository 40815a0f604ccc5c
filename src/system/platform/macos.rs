use sysinfo::System;

use super::{PlatformExtensions, utmpx};
use crate::error::ProviderError;
use crate::system::provider::{LoadAverage, Session};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn load_average() -> Option<LoadAverage> {
        let load = System::load_average();
        Some(LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        })
    }

    fn logged_in_sessions() -> Result<Vec<Session>, ProviderError> {
        Ok(utmpx::read_user_sessions())
    }

    fn max_cpu_frequency_mhz() -> Option<f64> {
        None
    }
}
