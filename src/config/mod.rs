use std::path::PathBuf;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application. Every field has a default, so the app
/// runs with an empty environment.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Directory prefilled into the CSV export prompt
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    /// Days between a new invoice's date and its prefilled due date
    #[serde(default = "default_due_in_days")]
    pub due_in_days: i64,
    /// When set, tracing output is appended to this file
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_export_dir() -> String {
    ".".to_string()
}

fn default_due_in_days() -> i64 {
    30
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Parse environment variables into Config struct
        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Path suggested in the export prompt.
    pub fn default_export_path(&self) -> PathBuf {
        PathBuf::from(&self.export_dir).join("bizbooks_export.csv")
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    // Ensure .env file is loaded
    dotenv().ok();

    // Load the configuration
    let config = Config::load()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_the_environment_is_empty() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.export_dir, ".");
        assert_eq!(config.due_in_days, 30);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn environment_values_override_the_defaults() {
        let config: Config = envy::from_iter(vec![
            ("EXPORT_DIR".to_string(), "/tmp/books".to_string()),
            ("DUE_IN_DAYS".to_string(), "14".to_string()),
            ("LOG_FILE".to_string(), "books.log".to_string()),
        ])
        .unwrap();
        assert_eq!(config.export_dir, "/tmp/books");
        assert_eq!(config.due_in_days, 14);
        assert_eq!(config.log_file, Some(PathBuf::from("books.log")));
        assert_eq!(config.default_export_path(), PathBuf::from("/tmp/books/bizbooks_export.csv"));
    }
}
