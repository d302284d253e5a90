use std::fmt;

use crate::config::ConfigError;
use crate::directory::RetrievalError;
use crate::job::JobError;
use crate::mail::SendError;
use crate::telemetry::TelemetryError;

/// Binary-facing aggregate of everything that can fail between process
/// start and a finished run.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Directory(RetrievalError),
    Mail(SendError),
    Job(JobError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Directory(err) => write!(f, "snapshot source error: {}", err),
            AppError::Mail(err) => write!(f, "mail gateway error: {}", err),
            AppError::Job(err) => write!(f, "report job error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Directory(err) => Some(err),
            AppError::Mail(err) => Some(err),
            AppError::Job(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<RetrievalError> for AppError {
    fn from(value: RetrievalError) -> Self {
        Self::Directory(value)
    }
}

impl From<SendError> for AppError {
    fn from(value: SendError) -> Self {
        Self::Mail(value)
    }
}

impl From<JobError> for AppError {
    fn from(value: JobError) -> Self {
        Self::Job(value)
    }
}
