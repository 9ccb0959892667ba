use anyhow::Context;
use clap::Parser;

mod app;
mod cli;
mod commands;
mod config;
mod table;
mod ui;
mod view;

fn main() {
    if let Err(error) = run() {
        eprintln!("fitlog error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = config::FitConfig::load().context("failed to load configuration")?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.storage.data_dir.clone());

    let store = fit_store::WorkoutStore::open(&data_dir)
        .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;

    let now = chrono::Local::now().naive_local();
    let mut app = app::App::bootstrap(
        ui::Console::new(),
        store,
        cli.user.clone(),
        &config.general.default_user,
        now,
    )?;
    app.run()
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("FITLOG_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
