//! Salary calculation result.
//!
//! [`SalaryCalculation`] is derived on every read and never stored. Money
//! fields are already formatted to two decimals so every rendering of the
//! same record shows the same text.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Text rendered for a value that is not a number.
pub const NOT_A_NUMBER: &str = "NaN";

/// The resolved number of worked days for a month.
///
/// A manual override that does not parse as a number yields
/// [`DayCount::NotANumber`], which propagates through the money fields
/// and renders as `NaN` so the bad input stays visible.
///
/// # Example
///
/// ```
/// use agent_payroll::models::DayCount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(DayCount::Days(Decimal::new(25, 1)).to_string(), "2.5");
/// assert_eq!(DayCount::Days(Decimal::new(2200, 2)).to_string(), "22");
/// assert_eq!(DayCount::NotANumber.to_string(), "NaN");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCount {
    /// A numeric day count, possibly fractional.
    Days(Decimal),
    /// The manual override did not parse.
    NotANumber,
}

impl DayCount {
    /// No days.
    pub const ZERO: DayCount = DayCount::Days(Decimal::ZERO);

    /// Returns the numeric value, or `None` for not-a-number.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            DayCount::Days(days) => Some(*days),
            DayCount::NotANumber => None,
        }
    }
}

impl From<usize> for DayCount {
    fn from(days: usize) -> Self {
        DayCount::Days(Decimal::from(days))
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayCount::Days(days) => write!(f, "{}", days.normalize()),
            DayCount::NotANumber => f.write_str(NOT_A_NUMBER),
        }
    }
}

impl FromStr for DayCount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == NOT_A_NUMBER {
            return Ok(DayCount::NotANumber);
        }
        Decimal::from_str(s).map(DayCount::Days)
    }
}

impl Serialize for DayCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

/// Monthly wage breakdown for one agent.
///
/// # Example
///
/// ```
/// use agent_payroll::models::SalaryCalculation;
///
/// let zero = SalaryCalculation::zeroed();
/// assert_eq!(zero.gross_total, "0.00");
/// assert_eq!(zero.net_total, "0.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryCalculation {
    /// Resolved number of worked days.
    pub day_count: DayCount,
    /// Daily rate of the agent's grade; zero for unknown grades.
    pub daily_rate: Decimal,
    /// `day_count × daily_rate`, two decimals.
    pub gross_total: String,
    /// RCAR retention (6% of gross, or zero), two decimals.
    pub retention_amount: String,
    /// `gross − retention`, two decimals.
    pub net_total: String,
}

impl SalaryCalculation {
    /// The result for a missing agent or a missing monthly record.
    pub fn zeroed() -> Self {
        Self {
            day_count: DayCount::ZERO,
            daily_rate: Decimal::ZERO,
            gross_total: "0.00".to_string(),
            retention_amount: "0.00".to_string(),
            net_total: "0.00".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_day_count_display_strips_trailing_zeros() {
        assert_eq!(DayCount::Days(dec!(5)).to_string(), "5");
        assert_eq!(DayCount::Days(dec!(22.0)).to_string(), "22");
        assert_eq!(DayCount::Days(dec!(0.5)).to_string(), "0.5");
        assert_eq!(DayCount::from(31usize).to_string(), "31");
    }

    #[test]
    fn test_day_count_serializes_as_string() {
        let json = serde_json::to_string(&DayCount::Days(dec!(2.5))).unwrap();
        assert_eq!(json, "\"2.5\"");

        let json = serde_json::to_string(&DayCount::NotANumber).unwrap();
        assert_eq!(json, "\"NaN\"");

        let back: DayCount = serde_json::from_str("\"NaN\"").unwrap();
        assert_eq!(back, DayCount::NotANumber);
    }

    #[test]
    fn test_value_of_not_a_number_is_none() {
        assert_eq!(DayCount::NotANumber.value(), None);
        assert_eq!(DayCount::ZERO.value(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_zeroed_salary_serialization() {
        let json = serde_json::to_value(SalaryCalculation::zeroed()).unwrap();
        assert_eq!(json["day_count"], "0");
        assert_eq!(json["daily_rate"], "0");
        assert_eq!(json["gross_total"], "0.00");
        assert_eq!(json["retention_amount"], "0.00");
        assert_eq!(json["net_total"], "0.00");
    }
}
