use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use tracing::warn;

use crate::census::DEFAULT_EXTENSIONS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Collect once and print tables.
    #[default]
    Console,
    /// Render the template on a timer until interrupted.
    Render,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub processes: ProcessesConfig,
    pub census: CensusConfig,
    pub render: RenderConfig,
    pub network: NetworkConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub mode: Mode,
    pub interval_secs: u64,
    pub cpu_sample_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            mode: Mode::Console,
            interval_secs: 5,
            cpu_sample_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProcessesConfig {
    pub console_top_n: usize,
    pub render_top_n: usize,
    pub combined_top_n: usize,
    pub name_width: usize,
}

impl Default for ProcessesConfig {
    fn default() -> Self {
        ProcessesConfig {
            console_top_n: 10,
            render_top_n: 3,
            combined_top_n: 3,
            name_width: 29,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CensusConfig {
    /// Defaults to the home directory.
    pub root: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub render_enabled: bool,
}

impl Default for CensusConfig {
    fn default() -> Self {
        CensusConfig {
            root: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            render_enabled: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Defaults to `template.html` beside the executable.
    pub template: Option<PathBuf>,
    /// Defaults to `monitoring.html` beside the executable.
    pub output: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub ip_route_probe: bool,
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sysglance").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
            warn!(path = %path.display(), %err, "invalid config, using defaults");
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.mode, Mode::Console);
        assert_eq!(config.general.interval_secs, 5);
        assert_eq!(config.general.cpu_sample_ms, 1000);
        assert_eq!(config.processes.console_top_n, 10);
        assert_eq!(config.processes.render_top_n, 3);
        assert_eq!(config.census.extensions, vec![".txt", ".py", ".pdf", ".jpg"]);
        assert!(config.census.render_enabled);
        assert!(!config.network.ip_route_probe);
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[general]
interval_secs = 10
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.interval_secs, 10);
        // Other fields should be defaults
        assert_eq!(config.general.cpu_sample_ms, 1000);
        assert_eq!(config.processes.combined_top_n, 3);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
mode = "render"
interval_secs = 30
cpu_sample_ms = 500

[processes]
console_top_n = 5
name_width = 24

[census]
root = "/srv/data"
extensions = ["md", ".RS"]
render_enabled = false

[render]
template = "/etc/sysglance/template.html"
output = "/var/www/status.html"

[network]
ip_route_probe = true
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.mode, Mode::Render);
        assert_eq!(config.general.interval_secs, 30);
        assert_eq!(config.general.cpu_sample_ms, 500);
        assert_eq!(config.processes.console_top_n, 5);
        assert_eq!(config.processes.name_width, 24);
        assert_eq!(config.census.root, Some(PathBuf::from("/srv/data")));
        assert_eq!(config.census.extensions, vec!["md", ".RS"]);
        assert!(!config.census.render_enabled);
        assert_eq!(
            config.render.output,
            Some(PathBuf::from("/var/www/status.html"))
        );
        assert!(config.network.ip_route_probe);
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.general.interval_secs, 5);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&path);
        assert_eq!(config.general.interval_secs, 5);
    }
}
