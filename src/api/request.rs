//! Request types for the agent payroll API.
//!
//! This module defines the JSON bodies, path segments and query strings
//! accepted by the endpoints.

use serde::{Deserialize, Serialize};

use crate::calculation::set_manual_override;
use crate::config::RegistrationConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, MonthlyData, MonthlyKey, parse_calendar_date};

/// Request body for `POST /employees` and `PUT /employees/:id`.
///
/// Identity fields and the account number are required; every other
/// field falls back to the registration defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Family name.
    #[serde(default, alias = "nom")]
    pub last_name: String,
    /// Given name.
    #[serde(default, alias = "prenom")]
    pub first_name: String,
    /// National identity card number (CIN).
    #[serde(default, alias = "cin")]
    pub national_id: String,
    /// Bank account number (RIB).
    #[serde(default, alias = "rib")]
    pub account_number: String,
    /// Bank name; defaults to the configured bank.
    #[serde(default, alias = "bankName")]
    pub bank_name: Option<String>,
    /// Budget line code; defaults to the configured budget line.
    #[serde(default, alias = "codeBudget")]
    pub budget_code: Option<String>,
    /// Job grade; defaults to the configured grade.
    #[serde(default, alias = "emploi")]
    pub grade: Option<String>,
    /// Duty description; defaults to the configured catalogue entry.
    #[serde(default, alias = "fonction")]
    pub duty: Option<String>,
    /// RCAR retention flag; defaults to the configured flag.
    #[serde(default, alias = "rcarEnabled")]
    pub rcar_enabled: Option<bool>,
}

impl EmployeeRequest {
    /// Checks that the required fields are present.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEmployee` naming the first blank required field.
    pub fn validate(&self) -> EngineResult<()> {
        let required = [
            ("last_name", &self.last_name),
            ("first_name", &self.first_name),
            ("national_id", &self.national_id),
            ("account_number", &self.account_number),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(EngineError::InvalidEmployee {
                    field: field.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Builds the agent record, filling omitted fields from the
    /// registration defaults.
    ///
    /// An empty `id` lets the store generate one.
    pub fn into_employee(self, id: String, registration: &RegistrationConfig) -> Employee {
        let defaults = &registration.defaults;

        Employee {
            id,
            last_name: self.last_name.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            national_id: self.national_id.trim().to_string(),
            bank_name: self.bank_name.unwrap_or_else(|| defaults.bank_name.clone()),
            account_number: self.account_number.trim().to_string(),
            budget_code: self
                .budget_code
                .unwrap_or_else(|| defaults.budget_code.clone()),
            grade: self.grade.unwrap_or_else(|| defaults.grade.clone()),
            duty: self
                .duty
                .unwrap_or_else(|| registration.default_duty().to_string()),
            rcar_enabled: self.rcar_enabled.unwrap_or(defaults.rcar_enabled),
        }
    }
}

/// Request body for `PATCH /employees/:id/months/:year/:month`.
///
/// Only the fields present are changed. Dates are `YYYY-MM-DD`; an empty
/// string unsets a date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlyPatch {
    /// New manual day-count text; an empty string removes the override.
    #[serde(default, alias = "manualNbJours")]
    pub manual_day_count: Option<String>,
    /// New act number.
    #[serde(default, alias = "numActe")]
    pub act_number: Option<String>,
    /// New first day of service.
    #[serde(default, alias = "datePrise")]
    pub service_start: Option<String>,
    /// New last day of service.
    #[serde(default, alias = "dateFin")]
    pub service_end: Option<String>,
    /// New engagement letter date.
    #[serde(default, alias = "dateEng")]
    pub engagement_date: Option<String>,
}

impl MonthlyPatch {
    /// Applies the patch to a monthly record.
    ///
    /// All dates are validated before anything is changed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDate` for a date that is not `YYYY-MM-DD`.
    pub fn apply(&self, data: &mut MonthlyData) -> EngineResult<()> {
        let service_start = parse_date_field("service_start", self.service_start.as_deref())?;
        let service_end = parse_date_field("service_end", self.service_end.as_deref())?;
        let engagement_date = parse_date_field("engagement_date", self.engagement_date.as_deref())?;

        if let Some(text) = &self.manual_day_count {
            set_manual_override(data, text.as_str());
        }
        if let Some(act_number) = &self.act_number {
            data.act_number = act_number.clone();
        }
        if let Some(date) = service_start {
            data.service_start = date;
        }
        if let Some(date) = service_end {
            data.service_end = date;
        }
        if let Some(date) = engagement_date {
            data.engagement_date = date;
        }
        Ok(())
    }
}

fn parse_date_field(
    field: &str,
    value: Option<&str>,
) -> EngineResult<Option<Option<chrono::NaiveDate>>> {
    match value {
        None => Ok(None),
        Some(text) => parse_calendar_date(text)
            .map(Some)
            .map_err(|_| EngineError::InvalidDate {
                field: field.to_string(),
                value: text.to_string(),
            }),
    }
}

/// Query string of `GET /employees`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Free-text search over last name, first name and national ID.
    #[serde(default)]
    pub search: String,
}

/// Path of the per-month endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthPath {
    /// The agent.
    pub id: String,
    /// Calendar year.
    pub year: i32,
    /// Zero-based month index.
    pub month: u32,
}

impl MonthPath {
    /// Returns the key of the addressed monthly record.
    pub fn key(&self) -> EngineResult<MonthlyKey> {
        MonthlyKey::new(self.id.as_str(), self.year, self.month)
    }
}

/// Path of `POST /employees/:id/months/:year/:month/days/:day/toggle`.
#[derive(Debug, Clone, Deserialize)]
pub struct DayPath {
    /// The agent.
    pub id: String,
    /// Calendar year.
    pub year: i32,
    /// Zero-based month index.
    pub month: u32,
    /// Day of the month, starting at 1.
    pub day: u32,
}

impl DayPath {
    /// Returns the key of the addressed monthly record.
    pub fn key(&self) -> EngineResult<MonthlyKey> {
        MonthlyKey::new(self.id.as_str(), self.year, self.month)
    }
}

/// Path of `GET /employees/:id/months/:year/:month/documents/:kind`.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentPath {
    /// The agent.
    pub id: String,
    /// Calendar year.
    pub year: i32,
    /// Zero-based month index.
    pub month: u32,
    /// `decision`, `engagement` or `liquidation`.
    pub kind: String,
}

impl DocumentPath {
    /// Returns the key of the addressed monthly record.
    pub fn key(&self) -> EngineResult<MonthlyKey> {
        MonthlyKey::new(self.id.as_str(), self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use chrono::NaiveDate;

    fn create_test_request() -> EmployeeRequest {
        EmployeeRequest {
            last_name: "benali".to_string(),
            first_name: "Karim".to_string(),
            national_id: "s123456".to_string(),
            account_number: "350810000000000000000000".to_string(),
            ..EmployeeRequest::default()
        }
    }

    fn create_test_month() -> MonthlyData {
        let key = MonthlyKey::new("emp_001", 2024, 0).unwrap();
        MonthlyData::with_defaults(&key).unwrap()
    }

    #[test]
    fn test_omitted_fields_take_registration_defaults() {
        let loader = ConfigLoader::builtin().unwrap();

        let employee = create_test_request().into_employee(String::new(), loader.registration());

        assert_eq!(employee.bank_name, "Al Barid Bank");
        assert_eq!(employee.budget_code, "1020201014");
        assert_eq!(employee.grade, "Ouvrier Spécialisé");
        assert_eq!(employee.duty, loader.registration().duties[5]);
        assert!(!employee.rcar_enabled);
    }

    #[test]
    fn test_provided_fields_win_over_defaults() {
        let loader = ConfigLoader::builtin().unwrap();
        let request = EmployeeRequest {
            grade: Some("Ouvrière Qualifiée".to_string()),
            rcar_enabled: Some(true),
            duty: Some("Service de recette".to_string()),
            ..create_test_request()
        };

        let employee = request.into_employee("emp_001".to_string(), loader.registration());

        assert_eq!(employee.id, "emp_001");
        assert_eq!(employee.grade, "Ouvrière Qualifiée");
        assert_eq!(employee.duty, "Service de recette");
        assert!(employee.rcar_enabled);
    }

    #[test]
    fn test_legacy_keys_are_accepted() {
        let request: EmployeeRequest = serde_json::from_str(
            r#"{"nom": "BENALI", "prenom": "Karim", "cin": "S1", "rib": "0", "rcarEnabled": true}"#,
        )
        .unwrap();

        assert_eq!(request.last_name, "BENALI");
        assert_eq!(request.account_number, "0");
        assert_eq!(request.rcar_enabled, Some(true));
    }

    #[test]
    fn test_validate_rejects_blank_required_field() {
        let request = EmployeeRequest {
            national_id: "  ".to_string(),
            ..create_test_request()
        };

        match request.validate() {
            Err(EngineError::InvalidEmployee { field, .. }) => assert_eq!(field, "national_id"),
            other => panic!("Expected InvalidEmployee, got {:?}", other),
        }
        assert!(create_test_request().validate().is_ok());
    }

    #[test]
    fn test_patch_updates_only_present_fields() {
        let mut data = create_test_month();
        data.worked_days.insert(4);

        let patch = MonthlyPatch {
            manual_day_count: Some("20".to_string()),
            service_end: Some("2024-01-20".to_string()),
            engagement_date: Some(String::new()),
            ..MonthlyPatch::default()
        };
        patch.apply(&mut data).unwrap();

        assert_eq!(data.manual_day_count, "20");
        assert!(data.worked_days.contains(&4));
        assert_eq!(data.act_number, "33");
        assert_eq!(data.service_start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(data.service_end, NaiveDate::from_ymd_opt(2024, 1, 20));
        assert_eq!(data.engagement_date, None);
    }

    #[test]
    fn test_patch_with_bad_date_changes_nothing() {
        let mut data = create_test_month();
        let original = data.clone();

        let patch = MonthlyPatch {
            act_number: Some("40".to_string()),
            service_start: Some("01/01/2024".to_string()),
            ..MonthlyPatch::default()
        };

        match patch.apply(&mut data) {
            Err(EngineError::InvalidDate { field, value }) => {
                assert_eq!(field, "service_start");
                assert_eq!(value, "01/01/2024");
            }
            other => panic!("Expected InvalidDate, got {:?}", other),
        }
        assert_eq!(data, original);
    }

    #[test]
    fn test_month_path_rejects_month_twelve() {
        let path = MonthPath {
            id: "emp_001".to_string(),
            year: 2024,
            month: 12,
        };
        assert!(matches!(path.key(), Err(EngineError::InvalidMonth { month: 12 })));
    }
}
