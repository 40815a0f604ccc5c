use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use color_eyre::eyre::{Result, eyre};
use tracing::{info, warn};

use crate::census::{ExtensionCensus, run_census};
use crate::config::Config;
use crate::console;
use crate::error::{CensusError, RenderError};
use crate::metrics::{MetricsSnapshot, UNAVAILABLE, keys};
use crate::system::collector::{CensusRequest, CollectOptions, Collector};
use crate::system::provider::MetricsProvider;
use crate::system::snapshot::CycleReport;
use crate::template::{PlaceholderRenderer, render_to_file};

pub const DEFAULT_TEMPLATE_NAME: &str = "template.html";
pub const DEFAULT_OUTPUT_NAME: &str = "monitoring.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPaths {
    pub template: PathBuf,
    pub output: PathBuf,
}

impl RenderPaths {
    /// Configured paths, falling back to files beside the running executable.
    pub fn from_config(config: &Config) -> Result<Self> {
        let template = match &config.render.template {
            Some(path) => path.clone(),
            None => beside_executable(DEFAULT_TEMPLATE_NAME)?,
        };
        let output = match &config.render.output {
            Some(path) => path.clone(),
            None => beside_executable(DEFAULT_OUTPUT_NAME)?,
        };
        Ok(RenderPaths { template, output })
    }
}

fn beside_executable(name: &str) -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| eyre!("executable path {} has no parent", exe.display()))?;
    Ok(dir.join(name))
}

#[derive(Debug)]
pub enum CycleOutcome {
    Rendered(MetricsSnapshot),
    Failed(RenderError),
}

pub struct App<P> {
    collector: Collector<P>,
    config: Config,
    renderer: PlaceholderRenderer,
}

impl<P: MetricsProvider> App<P> {
    pub fn new(provider: P, config: Config) -> Self {
        App {
            collector: Collector::new(provider),
            config,
            renderer: PlaceholderRenderer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cpu_window(&self) -> Duration {
        Duration::from_millis(self.config.general.cpu_sample_ms)
    }

    /// Sleep between render cycles, never shorter than the CPU sample.
    pub fn cycle_interval(&self) -> Duration {
        let interval = Duration::from_secs(self.config.general.interval_secs);
        let window = self.cpu_window();
        if interval < window {
            warn!(
                ?interval,
                ?window,
                "interval shorter than the CPU sample window, using the window"
            );
            return window;
        }
        interval
    }

    pub fn default_census_root(&self) -> PathBuf {
        self.config
            .census
            .root
            .clone()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn census_request(&self, root: PathBuf) -> CensusRequest {
        CensusRequest {
            root,
            extensions: self.config.census.extensions.clone(),
        }
    }

    pub fn console_options(&self, census_root: Option<PathBuf>) -> CollectOptions {
        CollectOptions {
            cpu_window: self.cpu_window(),
            top_n: self.config.processes.console_top_n,
            combined_top_n: self.config.processes.combined_top_n,
            ip_route_probe: self.config.network.ip_route_probe,
            census: census_root.map(|root| self.census_request(root)),
        }
    }

    pub fn render_options(&self) -> CollectOptions {
        let census = self
            .config
            .census
            .render_enabled
            .then(|| self.census_request(self.default_census_root()));
        CollectOptions {
            cpu_window: self.cpu_window(),
            top_n: self.config.processes.render_top_n,
            combined_top_n: self.config.processes.combined_top_n,
            ip_route_probe: self.config.network.ip_route_probe,
            census,
        }
    }

    pub fn collect(&mut self, options: &CollectOptions) -> CycleReport {
        self.collector.collect(options)
    }

    pub fn census(&self, root: &Path) -> Result<ExtensionCensus, CensusError> {
        run_census(root, &self.config.census.extensions)
    }

    /// One-shot console report. The census, if any, is printed separately
    /// once the caller knows which directory to scan.
    pub fn run_console<W: Write>(&mut self, out: &mut W) -> Result<CycleReport> {
        let options = self.console_options(None);
        let report = self.collect(&options);
        console::write_report(out, &report, self.config.processes.name_width)?;
        Ok(report)
    }

    /// Collects, renders and reports one cycle. Render failures are reported
    /// on `out` and returned; they do not stop the loop.
    pub fn render_cycle<W: Write>(
        &mut self,
        out: &mut W,
        iteration: u64,
        paths: &RenderPaths,
    ) -> Result<CycleOutcome> {
        let _span = tracing::info_span!("cycle", iteration).entered();

        writeln!(
            out,
            "[{}] Update #{iteration}...",
            Local::now().format("%H:%M:%S")
        )?;
        let options = self.render_options();
        let metrics = self.collect(&options).to_metrics();

        match render_to_file(&self.renderer, &paths.template, &paths.output, &metrics) {
            Ok(()) => {
                writeln!(
                    out,
                    "  \u{2713} Page updated: CPU {}, RAM {}%",
                    metrics.get(keys::CPU_PERCENT_DISPLAY).unwrap_or(UNAVAILABLE),
                    metrics.get(keys::RAM_PERCENTAGE).unwrap_or(UNAVAILABLE)
                )?;
                Ok(CycleOutcome::Rendered(metrics))
            }
            Err(err) => {
                warn!(%err, "render failed");
                writeln!(out, "  \u{2717} {err}")?;
                Ok(CycleOutcome::Failed(err))
            }
        }
    }

    /// Renders until `max_cycles` is reached, or forever when `None`.
    /// Cancellation happens by dropping the future while it sleeps.
    pub async fn run_render<W: Write>(
        &mut self,
        out: &mut W,
        paths: &RenderPaths,
        max_cycles: Option<u64>,
    ) -> Result<u64> {
        let interval = self.cycle_interval();
        info!(
            template = %paths.template.display(),
            output = %paths.output.display(),
            ?interval,
            "render loop starting"
        );

        writeln!(out)?;
        console::write_banner(out, "REAL-TIME SYSTEM MONITOR")?;
        writeln!(out, "Press Ctrl+C to stop")?;
        writeln!(out)?;

        let mut iteration = 0;
        loop {
            iteration += 1;
            self.render_cycle(out, iteration, paths)?;
            if max_cycles.is_some_and(|max| iteration >= max) {
                break;
            }
            tokio::time::sleep(interval).await;
        }
        Ok(iteration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::fake::FakeProvider;

    fn quick_config() -> Config {
        let mut config = Config::default();
        config.general.interval_secs = 0;
        config.general.cpu_sample_ms = 0;
        config.census.render_enabled = false;
        config
    }

    #[test]
    fn interval_is_clamped_to_cpu_window() {
        let mut config = Config::default();
        config.general.interval_secs = 0;
        config.general.cpu_sample_ms = 1500;
        let app = App::new(FakeProvider::healthy(), config);
        assert_eq!(app.cycle_interval(), Duration::from_millis(1500));

        let app = App::new(FakeProvider::healthy(), Config::default());
        assert_eq!(app.cycle_interval(), Duration::from_secs(5));
    }

    #[test]
    fn mode_specific_top_n() {
        let app = App::new(FakeProvider::healthy(), Config::default());
        assert_eq!(app.console_options(None).top_n, 10);
        assert_eq!(app.render_options().top_n, 3);
        assert_eq!(app.render_options().combined_top_n, 3);
    }

    #[test]
    fn render_census_follows_config() {
        let mut config = Config::default();
        config.census.root = Some(PathBuf::from("/srv"));
        let app = App::new(FakeProvider::healthy(), config);
        let census = app.render_options().census.expect("census enabled");
        assert_eq!(census.root, PathBuf::from("/srv"));

        let app = App::new(FakeProvider::healthy(), quick_config());
        assert!(app.render_options().census.is_none());
    }

    #[test]
    fn configured_render_paths_win() {
        let mut config = Config::default();
        config.render.template = Some(PathBuf::from("in.html"));
        config.render.output = Some(PathBuf::from("out.html"));
        let paths = RenderPaths::from_config(&config).unwrap();
        assert_eq!(paths.template, PathBuf::from("in.html"));
        assert_eq!(paths.output, PathBuf::from("out.html"));

        let defaults = RenderPaths::from_config(&Config::default()).unwrap();
        assert!(defaults.template.ends_with(DEFAULT_TEMPLATE_NAME));
        assert!(defaults.output.ends_with(DEFAULT_OUTPUT_NAME));
    }

    #[test]
    fn missing_template_is_reported_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = RenderPaths {
            template: dir.path().join("missing.html"),
            output: dir.path().join("out.html"),
        };
        let mut app = App::new(FakeProvider::healthy(), quick_config());
        let mut out = Vec::new();
        let outcome = app.render_cycle(&mut out, 1, &paths).unwrap();

        assert!(matches!(
            outcome,
            CycleOutcome::Failed(RenderError::TemplateNotFound(_))
        ));
        assert!(!paths.output.exists());
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Update #1..."));
        assert!(printed.contains("not found"));
    }

    #[test]
    fn console_report_prints_every_section() {
        let mut app = App::new(FakeProvider::healthy(), quick_config());
        let mut out = Vec::new();
        app.run_console(&mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        for section in ["PROCESSOR", "MEMORY", "SYSTEM", "PROCESSES"] {
            assert!(printed.contains(section), "missing {section}");
        }
        assert!(printed.contains("compiler"));
        assert!(printed.contains("alice (from local)"));
    }
}
