use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::wizard::draft::DEFAULT_DRAFT_KEY;

/// Distinguishes runtime behavior for different stages of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application wizard.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub drafts: DraftConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let directory = env::var("WIZARD_DRAFT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DRAFT_DIR));

        let storage_key =
            env::var("WIZARD_DRAFT_KEY").unwrap_or_else(|_| DEFAULT_DRAFT_KEY.to_string());
        if storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyDraftKey);
        }

        let quota_bytes = match env::var("WIZARD_DRAFT_QUOTA_BYTES") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidQuota { value: raw.clone() })?,
            ),
            Err(_) => None,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            drafts: DraftConfig {
                directory,
                storage_key: storage_key.trim().to_string(),
                quota_bytes,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

pub const DEFAULT_DRAFT_DIR: &str = ".tenant-portal/drafts";

/// Where in-progress application drafts are kept between sessions.
#[derive(Debug, Clone)]
pub struct DraftConfig {
    pub directory: PathBuf,
    pub storage_key: String,
    pub quota_bytes: Option<usize>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyDraftKey,
    InvalidQuota { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyDraftKey => write!(f, "WIZARD_DRAFT_KEY must not be blank"),
            ConfigError::InvalidQuota { value } => write!(
                f,
                "WIZARD_DRAFT_QUOTA_BYTES must be a byte count, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
