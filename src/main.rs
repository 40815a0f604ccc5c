use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use sysglance::app::{App, RenderPaths};
use sysglance::config::{Config, Mode, load_config, load_config_from_path};
use sysglance::console;
use sysglance::logging;
use sysglance::system::host::SysinfoProvider;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "sysglance",
    about = "System metrics snapshots for the console or an HTML template"
)]
struct Cli {
    /// Run once in the console, or keep rendering the template
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds between render cycles
    #[arg(long)]
    interval: Option<u64>,

    /// Template with {{key}} placeholders
    #[arg(long)]
    template: Option<PathBuf>,

    /// File the rendered template is written to
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory for the file census; skips the interactive prompt
    #[arg(long)]
    census: Option<PathBuf>,

    /// Do not ask for a census directory in console mode
    #[arg(long, default_value_t = false)]
    no_prompt: bool,

    /// Print the console snapshot as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Stop rendering after this many cycles
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    cycles: Option<u64>,

    /// Emit logs on stderr as JSON lines
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init_tracing(cli.log_json)?;
    let config = load_config_for_cli(&cli);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(&cli, config));
    // A prompt may still be blocked on stdin.
    runtime.shutdown_background();
    result
}

async fn run(cli: &Cli, config: Config) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tokio::select! {
        biased;
        signal = &mut shutdown => {
            signal?;
            info!("interrupted, shutting down");
            console::write_shutdown(&mut io::stdout())?;
            Ok(())
        }
        result = run_mode(cli, config) => result,
    }
}

async fn run_mode(cli: &Cli, config: Config) -> Result<()> {
    let mode = config.general.mode;
    let mut app = App::new(SysinfoProvider::new(), config);
    let mut stdout = io::stdout();

    match mode {
        Mode::Console => run_console(cli, &mut app, &mut stdout).await,
        Mode::Render => {
            let paths = RenderPaths::from_config(app.config())?;
            app.run_render(&mut stdout, &paths, cli.cycles).await?;
            Ok(())
        }
    }
}

async fn run_console<W: Write>(
    cli: &Cli,
    app: &mut App<SysinfoProvider>,
    out: &mut W,
) -> Result<()> {
    if cli.json {
        let options = app.console_options(cli.census.clone());
        let metrics = app.collect(&options).to_metrics();
        writeln!(out, "{}", serde_json::to_string_pretty(&metrics)?)?;
        return Ok(());
    }

    app.run_console(out)?;
    out.flush()?;

    let root = match &cli.census {
        Some(path) => Some(path.clone()),
        None if cli.no_prompt => None,
        None => console::prompt_census_root(&app.default_census_root()).await?,
    };
    if let Some(root) = root {
        let result = app.census(&root);
        console::write_census(out, &result)?;
    }
    console::write_footer(out)?;
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(mode) = cli.mode {
        config.general.mode = mode;
    }
    if let Some(interval) = cli.interval {
        config.general.interval_secs = interval;
    }
    if let Some(ref template) = cli.template {
        config.render.template = Some(template.clone());
    }
    if let Some(ref output) = cli.output {
        config.render.output = Some(output.clone());
    }
    if let Some(ref root) = cli.census {
        config.census.root = Some(root.clone());
    }

    config
}
