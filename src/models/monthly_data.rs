//! Monthly attendance record.
//!
//! This module contains [`MonthlyData`], the per-agent, per-month record
//! holding the worked days, the manual day-count override and the
//! administrative act details printed on the documents, and
//! [`MonthlyKey`], the `(employee, year, month)` triple it is stored under.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calculation::days_in_month;
use crate::error::{EngineError, EngineResult};

/// Act number given to a record created with defaults.
pub const DEFAULT_ACT_NUMBER: &str = "33";

/// Identifies the monthly record of one agent.
///
/// `month` is zero-based (0 = January, 11 = December).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthlyKey {
    /// The agent the record belongs to.
    pub employee_id: String,
    /// Calendar year.
    pub year: i32,
    /// Zero-based month index.
    pub month: u32,
}

impl MonthlyKey {
    /// Creates a key, rejecting month indexes outside `0..=11`.
    pub fn new(employee_id: impl Into<String>, year: i32, month: u32) -> EngineResult<Self> {
        if month > 11 {
            return Err(EngineError::InvalidMonth { month });
        }
        Ok(Self {
            employee_id: employee_id.into(),
            year,
            month,
        })
    }

    /// The flat key used by the persisted store,
    /// e.g. `monthly_emp_001_2024_1`.
    pub fn storage_key(&self) -> String {
        format!("monthly_{}_{}_{}", self.employee_id, self.year, self.month)
    }
}

/// One attendance/administrative record per `(employee, year, month)`.
///
/// The worked-day set and the manual override coexist; when the override
/// is non-empty it is authoritative (see
/// [`resolve_day_count`](crate::calculation::resolve_day_count)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyData {
    /// The agent this record belongs to.
    #[serde(alias = "employeeId")]
    pub employee_id: String,
    /// Zero-based month index.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Worked day numbers, `1..=days_in_month`.
    #[serde(default, alias = "workedDays")]
    pub worked_days: BTreeSet<u32>,
    /// Manual day count; empty means "not set".
    #[serde(default, alias = "manualNbJours")]
    pub manual_day_count: String,
    /// Number of the hiring act.
    #[serde(default, alias = "numActe")]
    pub act_number: String,
    /// First day of service.
    #[serde(default, alias = "datePrise", with = "optional_date")]
    pub service_start: Option<NaiveDate>,
    /// Last day of service.
    #[serde(default, alias = "dateFin", with = "optional_date")]
    pub service_end: Option<NaiveDate>,
    /// Date of the engagement letter.
    #[serde(default, alias = "dateEng", with = "optional_date")]
    pub engagement_date: Option<NaiveDate>,
    /// When the record was last saved.
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MonthlyData {
    /// Builds the record a month starts with before any edit.
    ///
    /// Act number `"33"`, service from the 1st to the last day of the
    /// month, engagement dated the 2nd, no worked days, no override.
    ///
    /// # Example
    ///
    /// ```
    /// use agent_payroll::models::{MonthlyData, MonthlyKey};
    /// use chrono::NaiveDate;
    ///
    /// let key = MonthlyKey::new("emp_001", 2024, 1).unwrap();
    /// let data = MonthlyData::with_defaults(&key).unwrap();
    ///
    /// assert_eq!(data.act_number, "33");
    /// assert_eq!(data.service_start, NaiveDate::from_ymd_opt(2024, 2, 1));
    /// assert_eq!(data.service_end, NaiveDate::from_ymd_opt(2024, 2, 29));
    /// assert_eq!(data.engagement_date, NaiveDate::from_ymd_opt(2024, 2, 2));
    /// ```
    pub fn with_defaults(key: &MonthlyKey) -> EngineResult<Self> {
        let last_day = days_in_month(key.year, key.month)?;
        let month = key.month + 1;

        Ok(Self {
            employee_id: key.employee_id.clone(),
            month: key.month,
            year: key.year,
            worked_days: BTreeSet::new(),
            manual_day_count: String::new(),
            act_number: DEFAULT_ACT_NUMBER.to_string(),
            service_start: NaiveDate::from_ymd_opt(key.year, month, 1),
            service_end: NaiveDate::from_ymd_opt(key.year, month, last_day),
            engagement_date: NaiveDate::from_ymd_opt(key.year, month, 2),
            updated_at: None,
        })
    }

    /// Returns the key this record is stored under.
    pub fn key(&self) -> MonthlyKey {
        MonthlyKey {
            employee_id: self.employee_id.clone(),
            year: self.year,
            month: self.month,
        }
    }

    /// Checks that the month index is `0..=11` and every worked day lies
    /// within the month.
    ///
    /// # Errors
    ///
    /// - `InvalidMonth` for a month index outside `0..=11`
    /// - `InvalidDay` for the first worked day outside the month
    pub fn validate(&self) -> EngineResult<()> {
        let last_day = days_in_month(self.year, self.month)?;
        match self
            .worked_days
            .iter()
            .find(|&&day| day == 0 || day > last_day)
        {
            Some(&day) => Err(EngineError::InvalidDay {
                day,
                days_in_month: last_day,
            }),
            None => Ok(()),
        }
    }
}

/// Parses a `YYYY-MM-DD` calendar date; blank text means "unset".
pub fn parse_calendar_date(text: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map(Some)
}

/// Serializes optional dates as `YYYY-MM-DD`, with `""` for unset.
mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(text) => super::parse_calendar_date(&text).map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_rejects_month_twelve() {
        match MonthlyKey::new("emp_001", 2024, 12) {
            Err(EngineError::InvalidMonth { month }) => assert_eq!(month, 12),
            other => panic!("Expected InvalidMonth, got {:?}", other),
        }
    }

    #[test]
    fn test_storage_key_format() {
        let key = MonthlyKey::new("emp_001", 2024, 0).unwrap();
        assert_eq!(key.storage_key(), "monthly_emp_001_2024_0");
    }

    #[test]
    fn test_defaults_for_non_leap_february() {
        let key = MonthlyKey::new("emp_001", 2023, 1).unwrap();
        let data = MonthlyData::with_defaults(&key).unwrap();

        assert_eq!(data.service_end, NaiveDate::from_ymd_opt(2023, 2, 28));
        assert!(data.worked_days.is_empty());
        assert_eq!(data.manual_day_count, "");
        assert_eq!(data.updated_at, None);
    }

    #[test]
    fn test_defaults_for_december() {
        let key = MonthlyKey::new("emp_001", 2024, 11).unwrap();
        let data = MonthlyData::with_defaults(&key).unwrap();

        assert_eq!(data.service_start, NaiveDate::from_ymd_opt(2024, 12, 1));
        assert_eq!(data.service_end, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(data.key(), key);
    }

    #[test]
    fn test_serialize_uses_iso_dates() {
        let key = MonthlyKey::new("emp_001", 2024, 2).unwrap();
        let mut data = MonthlyData::with_defaults(&key).unwrap();
        data.engagement_date = None;

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["service_start"], "2024-03-01");
        assert_eq!(json["service_end"], "2024-03-31");
        assert_eq!(json["engagement_date"], "");
        assert!(json.get("updated_at").is_none());
    }

    #[test]
    fn test_deserialize_legacy_record() {
        let json = r#"{
            "employeeId": "1717171717",
            "month": 1,
            "year": 2024,
            "workedDays": [5, 1, 3, 1],
            "manualNbJours": "",
            "numActe": "33",
            "datePrise": "2024-02-01",
            "dateFin": "2024-02-29",
            "dateEng": "",
            "updatedAt": "2024-02-10T09:30:00.000Z"
        }"#;

        let data: MonthlyData = serde_json::from_str(json).unwrap();
        assert_eq!(data.employee_id, "1717171717");
        assert_eq!(data.worked_days.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(data.service_end, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(data.engagement_date, None);
        assert!(data.updated_at.is_some());
    }

    #[test]
    fn test_validate_rejects_days_outside_month() {
        let key = MonthlyKey::new("emp_001", 2023, 1).unwrap();
        let mut data = MonthlyData::with_defaults(&key).unwrap();
        data.worked_days.extend([1, 28]);
        assert!(data.validate().is_ok());

        data.worked_days.insert(29);
        match data.validate() {
            Err(EngineError::InvalidDay { day, days_in_month }) => {
                assert_eq!(day, 29);
                assert_eq!(days_in_month, 28);
            }
            other => panic!("Expected InvalidDay, got {:?}", other),
        }

        data.worked_days = [0].into_iter().collect();
        assert!(matches!(data.validate(), Err(EngineError::InvalidDay { day: 0, .. })));
    }

    #[test]
    fn test_validate_rejects_month_twelve() {
        let json = r#"{ "employee_id": "emp_001", "month": 12, "year": 2024 }"#;
        let data: MonthlyData = serde_json::from_str(json).unwrap();

        assert!(matches!(data.validate(), Err(EngineError::InvalidMonth { month: 12 })));
    }

    #[test]
    fn test_deserialize_rejects_malformed_date() {
        let json = r#"{
            "employee_id": "emp_001",
            "month": 0,
            "year": 2024,
            "service_start": "01/01/2024"
        }"#;

        assert!(serde_json::from_str::<MonthlyData>(json).is_err());
    }

    #[test]
    fn test_parse_calendar_date() {
        assert_eq!(parse_calendar_date("").unwrap(), None);
        assert_eq!(parse_calendar_date("  ").unwrap(), None);
        assert_eq!(
            parse_calendar_date("2024-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert!(parse_calendar_date("15-03-2024").is_err());
    }
}
