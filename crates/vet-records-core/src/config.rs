//! Runtime configuration.
//!
//! Resolved once at startup (by the CLI or the embedding app) and passed
//! into the core. Nothing in the core reads environment variables.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::reminders::DEFAULT_LEAD_DAYS;

/// Invalid configuration values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Reminder lead time must be at least one day, got {0}")]
    InvalidLeadDays(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration resolved at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    database_path: PathBuf,
    reminder_lead_days: u32,
    notifications_enabled: bool,
}

impl AppConfig {
    pub fn new(
        database_path: PathBuf,
        reminder_lead_days: u32,
        notifications_enabled: bool,
    ) -> ConfigResult<Self> {
        if database_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if reminder_lead_days < 1 {
            return Err(ConfigError::InvalidLeadDays(reminder_lead_days));
        }

        Ok(Self {
            database_path,
            reminder_lead_days,
            notifications_enabled,
        })
    }

    /// Defaults for a database path: 3-day reminders, notifications on.
    pub fn with_database(database_path: PathBuf) -> ConfigResult<Self> {
        Self::new(database_path, DEFAULT_LEAD_DAYS, true)
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn reminder_lead_days(&self) -> u32 {
        self.reminder_lead_days
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::with_database(PathBuf::from("/tmp/records.db")).unwrap();
        assert_eq!(config.reminder_lead_days(), 3);
        assert!(config.notifications_enabled());
        assert_eq!(config.database_path(), Path::new("/tmp/records.db"));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert_eq!(
            AppConfig::new(PathBuf::new(), 3, true),
            Err(ConfigError::EmptyDatabasePath)
        );
        assert_eq!(
            AppConfig::new(PathBuf::from("records.db"), 0, false),
            Err(ConfigError::InvalidLeadDays(0))
        );
    }
}
