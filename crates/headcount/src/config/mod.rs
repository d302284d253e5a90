use std::env;
use std::fmt;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};

/// Top-level configuration for one reporter process, resolved entirely from
/// the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub mail: MailConfig,
    pub report: ReportConfig,
    pub schedule: ScheduleConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load settings from the environment, reading a `.env` file first when
    /// one is present. Missing or malformed required values fail here,
    /// before any warehouse query or SMTP session is attempted.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port = match optional("DB_PORT") {
            None => 5432,
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw })?,
        };

        let database = DatabaseConfig {
            host: required("DB_HOST")?,
            port,
            name: required("DB_NAME")?,
            username: required_secret("DB_USERNAME")?,
            password: required_secret("DB_PASSWORD")?,
        };

        let recipients = required("REPORT_RECIPIENTS")?
            .split_whitespace()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mail = MailConfig {
            smtp_host: required("SMTP_HOST")?,
            smtp_username: required_secret("SMTP_USERNAME")?,
            smtp_password: required_secret("SMTP_PASSWORD")?,
            from: required("SMTP_FROM")?,
            recipients,
            ses_configuration_set: optional("AWS_SES_CONFIGURATION_SET"),
        };

        let report_date = match optional("REPORT_DATE") {
            None => None,
            Some(raw) => Some(parse_date("REPORT_DATE", &raw)?),
        };

        let report = ReportConfig {
            report_date,
            archive_dir: optional("REPORT_ARCHIVE_DIR").map(PathBuf::from),
        };

        let raw_hour = optional("RUN_HOUR").unwrap_or_else(|| "8".to_string());
        let hour = raw_hour
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidRunHour {
                value: raw_hour.clone(),
            })?;
        let run_at = NaiveTime::from_hms_opt(hour, 0, 0)
            .ok_or(ConfigError::InvalidRunHour { value: raw_hour })?;

        let schedule = ScheduleConfig {
            run_at,
            run_and_exit: optional("RUN_AND_EXIT")
                .map(|raw| parse_bool(&raw))
                .unwrap_or(false),
        };

        let telemetry = TelemetryConfig {
            log_level: optional("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        Ok(Self {
            database,
            mail,
            report,
            schedule,
            telemetry,
        })
    }
}

/// Warehouse connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub username: String,
    pub password: String,
}

/// SMTP delivery settings plus the report's addressing.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from: String,
    /// At least one recipient; REPORT_RECIPIENTS is split on whitespace.
    pub recipients: Vec<String>,
    /// Optional value for the `X-SES-CONFIGURATION-SET` header.
    pub ses_configuration_set: Option<String>,
}

/// Which date to report on and where to keep a copy of the rendered body.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Overrides "today" as the report date when set.
    pub report_date: Option<NaiveDate>,
    /// When set, each run writes the mailed HTML under this directory.
    pub archive_dir: Option<PathBuf>,
}

/// Daemon-mode controls.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Local wall-clock time of the daily run (RUN_HOUR, minutes zero).
    pub run_at: NaiveTime,
    /// When true the process performs a single run and exits.
    pub run_and_exit: bool,
}

/// Log filter controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing { key: &'static str },
    InvalidPort { value: String },
    InvalidDate { key: &'static str, value: String },
    InvalidRunHour { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing { key } => {
                write!(f, "required environment variable {} is not set", key)
            }
            ConfigError::InvalidPort { value } => {
                write!(f, "DB_PORT must be a valid port number, got '{}'", value)
            }
            ConfigError::InvalidDate { key, value } => {
                write!(f, "{} must be a YYYY-MM-DD date, got '{}'", key, value)
            }
            ConfigError::InvalidRunHour { value } => {
                write!(f, "RUN_HOUR must be an hour between 0 and 23, got '{}'", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing { key })
}

/// Credentials are read verbatim, no trimming; whitespace can be part of
/// the secret. Only a completely empty value counts as unset.
fn required_secret(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing { key })
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_date(key: &'static str, raw: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ConfigError::InvalidDate {
        key,
        value: raw.to_string(),
    })
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}
