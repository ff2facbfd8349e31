//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML files of a configuration directory.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed mapping from job-grade label to daily rate (in dirhams).
///
/// Lookups are exact and case-sensitive: `"ouvrier spécialisé"` does not
/// match `"Ouvrier Spécialisé"`.
///
/// # Example
///
/// ```
/// use agent_payroll::config::WageTable;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let mut grades = BTreeMap::new();
/// grades.insert("Ouvrier Spécialisé".to_string(), Decimal::new(10040, 2));
/// let table = WageTable::new(grades);
///
/// assert_eq!(table.daily_rate("Ouvrier Spécialisé"), Some(Decimal::new(10040, 2)));
/// assert_eq!(table.daily_rate("Foo"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageTable {
    grades: BTreeMap<String, Decimal>,
}

impl WageTable {
    /// Creates a wage table from grade/rate pairs.
    pub fn new(grades: BTreeMap<String, Decimal>) -> Self {
        Self { grades }
    }

    /// Returns the daily rate for a grade, if the grade is known.
    pub fn daily_rate(&self, grade: &str) -> Option<Decimal> {
        self.grades.get(grade).copied()
    }

    /// Returns true if the grade is a key of the table.
    pub fn contains(&self, grade: &str) -> bool {
        self.grades.contains_key(grade)
    }

    /// Iterates over all grades and their daily rates, sorted by grade.
    pub fn grades(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.grades.iter().map(|(grade, rate)| (grade.as_str(), *rate))
    }
}

/// Values applied to the fields a new registration leaves out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDefaults {
    /// Bank holding the agent's account.
    pub bank_name: String,
    /// Budget line the wages are charged to.
    pub budget_code: String,
    /// Job grade, a key of the wage table.
    pub grade: String,
    /// Index into the duty catalogue.
    pub duty_index: usize,
    /// Whether the RCAR retention applies.
    pub rcar_enabled: bool,
}

/// Registration catalogue from registration.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Duty descriptions offered when registering an agent.
    pub duties: Vec<String>,
    /// Defaults for omitted registration fields.
    pub defaults: EmployeeDefaults,
}

impl RegistrationConfig {
    /// Returns the default duty description, or an empty string when the
    /// configured index is past the end of the catalogue.
    pub fn default_duty(&self) -> &str {
        self.duties
            .get(self.defaults.duty_index)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// The complete configuration loaded from a configuration directory.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    wage_table: WageTable,
    registration: RegistrationConfig,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    pub fn new(wage_table: WageTable, registration: RegistrationConfig) -> Self {
        Self {
            wage_table,
            registration,
        }
    }

    /// Returns the wage table.
    pub fn wage_table(&self) -> &WageTable {
        &self.wage_table
    }

    /// Returns the registration catalogue.
    pub fn registration(&self) -> &RegistrationConfig {
        &self.registration
    }
}
