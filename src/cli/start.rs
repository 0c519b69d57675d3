use crate::cli::{Config, commands};
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

/// Map verbosity level to tracing level
pub const fn get_verbosity_level(verbosity: u8) -> tracing::Level {
    match verbosity {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Routes tracing output to `log_file`; the terminal belongs to the UI.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global
/// subscriber is already installed.
pub fn init_tracing(log_file: &Path, level: tracing::Level) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file));

    let subscriber = Registry::default().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;
    Ok(())
}

/// Parses arguments, installs logging and returns the configuration.
///
/// # Errors
///
/// Returns an error if the configuration is inconsistent or logging cannot
/// be initialized.
pub fn start() -> Result<Config> {
    let matches = commands::new().get_matches();
    let config = Config::from_matches(&matches)?;
    init_tracing(&config.log_file, config.log_level)?;
    tracing::info!(store = ?config.store, lockout = config.lockout.num_seconds(), "starting agrismart");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_verbosity_level() {
        assert_eq!(get_verbosity_level(0), tracing::Level::ERROR);
        assert_eq!(get_verbosity_level(2), tracing::Level::INFO);
        assert_eq!(get_verbosity_level(4), tracing::Level::TRACE);
        assert_eq!(get_verbosity_level(9), tracing::Level::TRACE);
    }

    #[test]
    fn test_init_tracing_rejects_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("agrismart.log");
        assert!(init_tracing(&path, tracing::Level::INFO).is_err());
    }
}
