//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

use super::types::{PayrollConfig, RegistrationConfig, WageTable};

const BUILTIN_WAGE_TABLE: &str = include_str!("../../config/hassi_berkane/wage_table.yaml");
const BUILTIN_REGISTRATION: &str = include_str!("../../config/hassi_berkane/registration.yaml");

/// Loads and provides access to the payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/hassi_berkane/
/// ├── wage_table.yaml    # Daily rate per job grade
/// └── registration.yaml  # Duty catalogue and registration defaults
/// ```
///
/// # Example
///
/// ```no_run
/// use agent_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/hassi_berkane").unwrap();
/// let rate = loader.daily_rate("Ouvrier Spécialisé");
/// println!("Daily rate: {:?}", rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - `ConfigNotFound` if a required file is missing
    /// - `ConfigParseError` if a file contains invalid YAML or misses fields
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let wage_table = Self::load_yaml::<WageTable>(&path.join("wage_table.yaml"))?;
        let registration =
            Self::load_yaml::<RegistrationConfig>(&path.join("registration.yaml"))?;

        Ok(Self {
            config: PayrollConfig::new(wage_table, registration),
        })
    }

    /// Returns the configuration compiled into the binary.
    ///
    /// This is the Hassi Berkane configuration shipped under
    /// `config/hassi_berkane`, available without touching the filesystem.
    pub fn builtin() -> EngineResult<Self> {
        let wage_table = Self::parse_yaml::<WageTable>("builtin:wage_table.yaml", BUILTIN_WAGE_TABLE)?;
        let registration = Self::parse_yaml::<RegistrationConfig>(
            "builtin:registration.yaml",
            BUILTIN_REGISTRATION,
        )?;

        Ok(Self {
            config: PayrollConfig::new(wage_table, registration),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&path_str, &content)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(path: &str, content: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the wage table.
    pub fn wage_table(&self) -> &WageTable {
        self.config.wage_table()
    }

    /// Returns the registration catalogue.
    pub fn registration(&self) -> &RegistrationConfig {
        self.config.registration()
    }

    /// Gets the daily rate for a grade.
    ///
    /// Unknown grades return `None`; the salary calculator turns that into
    /// a zero rate.
    pub fn daily_rate(&self, grade: &str) -> Option<Decimal> {
        self.wage_table().daily_rate(grade)
    }
}
