use crate::error::{RecommendError, Result};
use serde::Deserialize;
use std::path::PathBuf;

const ENV_PREFIX: &str = "SONG_RECOMMENDER";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Ingestion
    pub dataset_path: PathBuf,
    /// First N records to read; 0 reads the whole file
    pub record_limit: usize,
    pub has_headers: bool,

    // Query defaults
    pub neighborhood_size: usize,

    // Observability
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl Config {
    /// Load configuration from defaults, `.env` and `SONG_RECOMMENDER_*`
    /// environment variables (e.g. `SONG_RECOMMENDER_RECORD_LIMIT=500`).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default(
                "dataset_path",
                "Dataset/Collaborative Filtering/Songs Dataset Truncated.csv",
            )?
            .set_default("record_limit", 10000)?
            .set_default("has_headers", true)?
            .set_default("neighborhood_size", 3)?
            .set_default("log_level", "info")?
            .set_default("log_format", "text")?
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dataset_path.as_os_str().is_empty() {
            return Err(RecommendError::Configuration(
                "dataset path is required".to_string(),
            ));
        }

        if self.neighborhood_size == 0 {
            return Err(RecommendError::Configuration(
                "default neighborhood size must be greater than 0".to_string(),
            ));
        }

        if self.log_level.trim().is_empty() {
            return Err(RecommendError::Configuration(
                "log level must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 6] = [
        "SONG_RECOMMENDER_DATASET_PATH",
        "SONG_RECOMMENDER_RECORD_LIMIT",
        "SONG_RECOMMENDER_HAS_HEADERS",
        "SONG_RECOMMENDER_NEIGHBORHOOD_SIZE",
        "SONG_RECOMMENDER_LOG_LEVEL",
        "SONG_RECOMMENDER_LOG_FORMAT",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_defaults() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.record_limit, 10000);
        assert_eq!(config.neighborhood_size, 3);
        assert!(config.has_headers);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config
            .dataset_path
            .ends_with("Songs Dataset Truncated.csv"));
    }

    #[test]
    #[serial_test::serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var("SONG_RECOMMENDER_RECORD_LIMIT", "500");
        std::env::set_var("SONG_RECOMMENDER_LOG_FORMAT", "json");
        std::env::set_var("SONG_RECOMMENDER_DATASET_PATH", "/data/ratings.csv");

        let config = Config::from_env().unwrap();
        assert_eq!(config.record_limit, 500);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.dataset_path, PathBuf::from("/data/ratings.csv"));

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_zero_neighborhood_rejected() {
        clear_env();
        std::env::set_var("SONG_RECOMMENDER_NEIGHBORHOOD_SIZE", "0");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, RecommendError::Configuration(_)));

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_unknown_log_format_rejected() {
        clear_env();
        std::env::set_var("SONG_RECOMMENDER_LOG_FORMAT", "xml");

        assert!(Config::from_env().is_err());

        clear_env();
    }
}
