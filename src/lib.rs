pub mod app;
pub mod census;
pub mod config;
pub mod console;
pub mod error;
pub mod format;
pub mod logging;
pub mod metrics;
pub mod system;
pub mod template;
