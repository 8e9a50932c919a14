//! Application configuration.
//!
//! Values come from `config.toml`, then `.env`/environment variables, then defaults.

use crate::clock::ClockMode;
use crate::error::Result;
use serde::Deserialize;
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_DATABASE_PATH: &str = "study_cards.sqlite3";
pub const DEFAULT_OWNER: &str = "local";
pub const DEFAULT_LOG_FILTER: &str = "study_cards=info";

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database: Option<DatabaseSection>,
    study: Option<StudySection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StudySection {
    owner: Option<String>,
    clock: Option<ClockMode>,
}

#[derive(Debug, Deserialize)]
struct LoggingSection {
    filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    /// Owner id every card created from this app is stored under
    pub owner: String,
    pub clock: ClockMode,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            owner: DEFAULT_OWNER.to_string(),
            clock: ClockMode::System,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Loads with priority: config.toml > .env / environment > default.
    /// An unreadable config.toml is reported and skipped.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();

        let file = match std::fs::read_to_string(CONFIG_FILE) {
            Ok(contents) => match Self::parse_file(&contents) {
                Ok(file) => Some(file),
                Err(e) => {
                    // Logging is not set up yet at this point
                    eprintln!("Ignoring {}: {}", CONFIG_FILE, e);
                    None
                }
            },
            Err(_) => None,
        };

        Self::resolve(file.unwrap_or_default(), |key| std::env::var(key).ok())
    }

    /// Parses a config.toml document on top of the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(Self::resolve(Self::parse_file(contents)?, |_| None))
    }

    fn parse_file(contents: &str) -> Result<FileConfig> {
        Ok(toml::from_str(contents)?)
    }

    fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let database_path = file
            .database
            .and_then(|db| db.path)
            .or_else(|| env("STUDY_CARDS_DB"))
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let (file_owner, file_clock) = match file.study {
            Some(study) => (study.owner, study.clock),
            None => (None, None),
        };

        let owner = file_owner
            .or_else(|| env("STUDY_CARDS_OWNER"))
            .filter(|owner| !owner.trim().is_empty())
            .unwrap_or(defaults.owner);

        let clock = file_clock
            .or_else(|| {
                let value = env("STUDY_CARDS_CLOCK")?;
                match value.parse::<ClockMode>() {
                    Ok(mode) => Some(mode),
                    Err(e) => {
                        // Logging is not set up yet at this point
                        eprintln!("Ignoring STUDY_CARDS_CLOCK: {}", e);
                        None
                    }
                }
            })
            .unwrap_or(defaults.clock);

        let log_filter = file
            .logging
            .and_then(|logging| logging.filter)
            .unwrap_or(defaults.log_filter);

        Self {
            database_path,
            owner,
            clock,
            log_filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_full_document() {
        let config = Config::from_toml_str(
            r#"
            [database]
            path = "data/cards.db"

            [study]
            owner = "ana"
            clock = "simulated"

            [logging]
            filter = "study_cards=debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("data/cards.db"));
        assert_eq!(config.owner, "ana");
        assert_eq!(config.clock, ClockMode::Simulated);
        assert_eq!(config.log_filter, "study_cards=debug");
    }

    #[test]
    fn test_bad_clock_is_config_error() {
        let result = Config::from_toml_str("[study]\nclock = \"lunar\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_file_wins_over_env() {
        let file = Config::parse_file("[database]\npath = \"from_file.db\"").unwrap();
        let config = Config::resolve(file, |key| match key {
            "STUDY_CARDS_DB" => Some("from_env.db".to_string()),
            "STUDY_CARDS_OWNER" => Some("ben".to_string()),
            "STUDY_CARDS_CLOCK" => Some("simulated".to_string()),
            _ => None,
        });

        assert_eq!(config.database_path, PathBuf::from("from_file.db"));
        assert_eq!(config.owner, "ben");
        assert_eq!(config.clock, ClockMode::Simulated);
    }

    #[test]
    fn test_bad_env_clock_falls_back_to_default() {
        let config = Config::resolve(FileConfig::default(), |key| {
            (key == "STUDY_CARDS_CLOCK").then(|| "lunar".to_string())
        });
        assert_eq!(config.clock, ClockMode::System);
    }

    #[test]
    fn test_blank_owner_falls_back_to_default() {
        let config = Config::resolve(FileConfig::default(), |key| {
            (key == "STUDY_CARDS_OWNER").then(|| "  ".to_string())
        });
        assert_eq!(config.owner, DEFAULT_OWNER);
    }
}
