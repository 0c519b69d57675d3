//! Command-line configuration and process setup for the `agrismart` binary.

pub mod commands;
pub mod start;

use crate::domain::FarmerStore;
use crate::infrastructure::{DocumentStore, FirebaseConfig, FirebaseStore};
use anyhow::{Context, Result, bail};
use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

pub use start::start;

/// Which backend serves credentials and farmer records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    File,
    Firebase,
}

impl std::str::FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(StoreKind::Memory),
            "file" => Ok(StoreKind::File),
            "firebase" => Ok(StoreKind::Firebase),
            other => Err(format!("unknown store: {other}")),
        }
    }
}

/// Settings extracted once from the command line and environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreKind,
    pub data_file: PathBuf,
    pub firebase: Option<FirebaseConfig>,
    pub timeout: Duration,
    pub lockout: chrono::Duration,
    pub log_file: PathBuf,
    pub log_level: tracing::Level,
}

impl Config {
    /// # Errors
    ///
    /// Returns an error if the firebase store is selected without a project
    /// id and API key.
    pub fn from_matches(matches: &clap::ArgMatches) -> Result<Self> {
        let store: StoreKind = matches
            .get_one::<String>(commands::ARG_STORE)
            .map_or("file", String::as_str)
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
        let timeout = Duration::from_secs(
            matches.get_one::<u64>(commands::ARG_TIMEOUT).copied().unwrap_or(10),
        );
        let lockout = chrono::Duration::seconds(i64::from(
            matches.get_one::<u32>(commands::ARG_LOCKOUT).copied().unwrap_or(300),
        ));

        let firebase = if store == StoreKind::Firebase {
            let project_id = matches
                .get_one::<String>(commands::ARG_FIREBASE_PROJECT)
                .cloned()
                .context("missing required argument: --firebase-project")?;
            let api_key = matches
                .get_one::<String>(commands::ARG_FIREBASE_API_KEY)
                .cloned()
                .context("missing required argument: --firebase-api-key")?;
            if project_id.trim().is_empty() {
                bail!("--firebase-project must not be empty");
            }
            Some(FirebaseConfig {
                project_id,
                api_key: SecretString::from(api_key),
                timeout,
            })
        } else {
            None
        };

        Ok(Self {
            store,
            data_file: matches
                .get_one::<String>(commands::ARG_DATA_FILE)
                .map_or_else(|| PathBuf::from("farmers.json"), PathBuf::from),
            firebase,
            timeout,
            lockout,
            log_file: matches
                .get_one::<String>(commands::ARG_LOG_FILE)
                .map_or_else(|| PathBuf::from("agrismart.log"), PathBuf::from),
            log_level: start::get_verbosity_level(
                matches.get_one::<u8>(commands::ARG_VERBOSITY).copied().unwrap_or(0),
            ),
        })
    }
}

/// Opens the configured backend.
///
/// # Errors
///
/// Returns an error if the data file cannot be read or the HTTP client
/// cannot be built.
pub fn build_store(config: &Config) -> Result<Box<dyn FarmerStore>> {
    let store: Box<dyn FarmerStore> = match config.store {
        StoreKind::Memory => Box::new(DocumentStore::in_memory()),
        StoreKind::File => Box::new(
            DocumentStore::open(&config.data_file)
                .with_context(|| format!("failed to open {}", config.data_file.display()))?,
        ),
        StoreKind::Firebase => {
            let firebase = config
                .firebase
                .clone()
                .context("firebase store selected without firebase settings")?;
            Box::new(FirebaseStore::new(firebase).context("failed to build HTTP client")?)
        }
    };
    tracing::info!(backend = %store.describe(), "store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(args: &[&str]) -> Result<Config> {
        let mut argv = vec!["agrismart"];
        argv.extend_from_slice(args);
        Config::from_matches(&commands::new().get_matches_from(argv))
    }

    #[test]
    fn test_store_kind_from_str() {
        assert_eq!("memory".parse::<StoreKind>(), Ok(StoreKind::Memory));
        assert_eq!("firebase".parse::<StoreKind>(), Ok(StoreKind::Firebase));
        assert!("redis".parse::<StoreKind>().is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.store, StoreKind::File);
        assert_eq!(config.data_file, PathBuf::from("farmers.json"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.lockout, chrono::Duration::minutes(5));
        assert_eq!(config.log_level, tracing::Level::ERROR);
        assert!(config.firebase.is_none());
    }

    #[test]
    fn test_firebase_requires_project_and_key() {
        assert!(config(&["--store", "firebase"]).is_err());
        assert!(config(&["--store", "firebase", "--firebase-project", "p"]).is_err());

        let config = config(&[
            "--store",
            "firebase",
            "--firebase-project",
            "agrismart-prod",
            "--firebase-api-key",
            "abc",
            "--timeout",
            "4",
        ])
        .unwrap();
        let firebase = config.firebase.unwrap();
        assert_eq!(firebase.project_id, "agrismart-prod");
        assert_eq!(firebase.timeout, Duration::from_secs(4));
    }

    #[test]
    fn test_build_file_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("farmers.json");
        let config = config(&["--data-file", path.to_str().unwrap()]).unwrap();

        let store = build_store(&config).unwrap();
        assert!(store.describe().contains("farmers.json"));
    }

    #[test]
    fn test_build_memory_store() {
        let config = config(&["--store", "memory"]).unwrap();
        assert_eq!(build_store(&config).unwrap().describe(), "in-memory store");
    }
}
