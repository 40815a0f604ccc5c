pub mod collector;
pub mod cpu;
pub mod fake;
pub mod host;
pub mod identity;
pub mod memory;
pub mod platform;
pub mod process;
pub mod provider;
pub mod snapshot;
