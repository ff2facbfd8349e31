//! Employee model.
//!
//! This module defines the [`Employee`] struct for representing the agents
//! registered with the commune.

use serde::{Deserialize, Serialize};

/// A registered short-term municipal worker ("agent").
///
/// Legacy exports used French/camelCase keys; those are accepted as
/// aliases when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Family name, stored upper-cased.
    #[serde(alias = "nom")]
    pub last_name: String,
    /// Given name.
    #[serde(alias = "prenom")]
    pub first_name: String,
    /// National identity card number (CIN), stored upper-cased.
    #[serde(alias = "cin")]
    pub national_id: String,
    /// Name of the bank holding the account.
    #[serde(default, alias = "bankName")]
    pub bank_name: String,
    /// Bank account number (RIB).
    #[serde(alias = "rib")]
    pub account_number: String,
    /// Budget line code the wages are charged to.
    #[serde(alias = "codeBudget")]
    pub budget_code: String,
    /// Job grade label; should be a key of the wage table.
    #[serde(alias = "emploi")]
    pub grade: String,
    /// Free-text duty description.
    #[serde(alias = "fonction")]
    pub duty: String,
    /// Whether the 6% RCAR retention applies.
    #[serde(default, alias = "rcarEnabled")]
    pub rcar_enabled: bool,
}

impl Employee {
    /// Returns `"{last_name} {first_name}"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }

    /// Returns true if the agent matches a free-text search.
    ///
    /// The search is a case-insensitive substring match against
    /// `"{last_name} {first_name} {national_id}"`. An empty search matches
    /// everyone.
    ///
    /// # Example
    ///
    /// ```
    /// use agent_payroll::models::Employee;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     last_name: "BENALI".to_string(),
    ///     first_name: "Karim".to_string(),
    ///     national_id: "S123456".to_string(),
    ///     bank_name: "Al Barid Bank".to_string(),
    ///     account_number: "350810000000000000000000".to_string(),
    ///     budget_code: "1020201014".to_string(),
    ///     grade: "Ouvrier Spécialisé".to_string(),
    ///     duty: "Service de recette".to_string(),
    ///     rcar_enabled: false,
    /// };
    ///
    /// assert!(employee.matches_search("ali kar"));
    /// assert!(employee.matches_search("s1234"));
    /// assert!(!employee.matches_search("ahmed"));
    /// ```
    pub fn matches_search(&self, search: &str) -> bool {
        let haystack = format!("{} {} {}", self.last_name, self.first_name, self.national_id);
        haystack.to_lowercase().contains(&search.to_lowercase())
    }

    /// Applies the normalization performed on every save: last name and
    /// national ID are upper-cased.
    pub fn normalized(mut self) -> Self {
        self.last_name = self.last_name.to_uppercase();
        self.national_id = self.national_id.to_uppercase();
        self
    }
}
