use color_eyre::eyre::WrapErr;
use std::path::PathBuf;
use tennis_core::Config;

use crate::app::App;

pub mod app;
pub mod event;
pub mod ui;

/// Config path from the first argument, else `TENNIS_CONFIG`
fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("TENNIS_CONFIG"))
        .map(PathBuf::from)
}

fn load_config() -> color_eyre::Result<Config> {
    let Some(path) = config_path() else {
        return Ok(Config::default());
    };

    let json = std::fs::read_to_string(&path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    let config = Config::from_json(&json)
        .wrap_err_with(|| format!("invalid config {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Log to a file; the TUI owns the terminal
fn init_logging() -> color_eyre::Result<()> {
    let log_file = std::fs::File::create("tennis-terminal.log")
        .wrap_err("failed to create log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging()?;
    let config = load_config()?;

    let app = App::new(config)?;
    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}
