//! Attendance tracking.
//!
//! A month's worked-day count comes from one of two sources: the set of
//! ticked days, or a manual override typed by the operator. The override
//! wins whenever it is non-empty. Ticking a day, or selecting/clearing the
//! whole month, switches the record back to the ticked-day count by
//! clearing the override; editing the override leaves the ticked days
//! alone.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{DayCount, MonthlyData};

/// Returns the number of days of a month (its last calendar day).
///
/// `month` is zero-based. Leap years are accounted for.
///
/// # Errors
///
/// - `InvalidMonth` if `month` is greater than 11
/// - `CalculationError` if the year is outside the supported calendar
///
/// # Example
///
/// ```
/// use agent_payroll::calculation::days_in_month;
///
/// assert_eq!(days_in_month(2024, 1).unwrap(), 29);
/// assert_eq!(days_in_month(2023, 1).unwrap(), 28);
/// assert_eq!(days_in_month(2024, 11).unwrap(), 31);
/// ```
pub fn days_in_month(year: i32, month: u32) -> EngineResult<u32> {
    if month > 11 {
        return Err(EngineError::InvalidMonth { month });
    }

    let (next_year, next_month) = if month == 11 {
        (year + 1, 1)
    } else {
        (year, month + 2)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last_day| last_day.day())
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("year {} is outside the supported calendar", year),
        })
}

/// Ticks or unticks a day and clears the manual override.
///
/// Returns `true` if the day is worked after the toggle.
///
/// # Errors
///
/// Returns `InvalidDay` if `day` is not a day of the record's month.
///
/// # Example
///
/// ```
/// use agent_payroll::calculation::toggle_day;
/// use agent_payroll::models::{MonthlyData, MonthlyKey};
///
/// let key = MonthlyKey::new("emp_001", 2024, 0).unwrap();
/// let mut data = MonthlyData::with_defaults(&key).unwrap();
/// data.manual_day_count = "22".to_string();
///
/// assert!(toggle_day(&mut data, 3).unwrap());
/// assert!(data.worked_days.contains(&3));
/// assert_eq!(data.manual_day_count, "");
///
/// assert!(!toggle_day(&mut data, 3).unwrap());
/// assert!(data.worked_days.is_empty());
/// ```
pub fn toggle_day(data: &mut MonthlyData, day: u32) -> EngineResult<bool> {
    let last_day = days_in_month(data.year, data.month)?;
    if day == 0 || day > last_day {
        return Err(EngineError::InvalidDay {
            day,
            days_in_month: last_day,
        });
    }

    let worked = if data.worked_days.remove(&day) {
        false
    } else {
        data.worked_days.insert(day);
        true
    };
    data.manual_day_count.clear();

    Ok(worked)
}

/// Marks every day `1..=days_in_month` as worked and clears the override.
pub fn select_all_days(data: &mut MonthlyData, days_in_month: u32) {
    data.worked_days = (1..=days_in_month).collect();
    data.manual_day_count.clear();
}

/// Unticks every day and clears the override.
pub fn clear_all_days(data: &mut MonthlyData) {
    data.worked_days.clear();
    data.manual_day_count.clear();
}

/// Stores the manual day-count text. The ticked days are kept.
pub fn set_manual_override(data: &mut MonthlyData, text: impl Into<String>) {
    data.manual_day_count = text.into();
}

/// Resolves the authoritative day count of a record.
///
/// A non-empty override is parsed with [`parse_day_override`]; otherwise
/// the count is the number of ticked days.
pub fn resolve_day_count(data: &MonthlyData) -> DayCount {
    if data.manual_day_count.is_empty() {
        DayCount::from(data.worked_days.len())
    } else {
        parse_day_override(&data.manual_day_count)
    }
}

/// Parses a manual day count.
///
/// Leading whitespace is skipped, then the longest prefix of the form
/// `[+-]digits[.digits][(e|E)[+-]digits]` is read; anything after it is
/// ignored. Text with no such prefix is not a number, and so is a value
/// outside the decimal range (`"Infinity"`, `"1e40"`, `"1e-40"`).
///
/// # Example
///
/// ```
/// use agent_payroll::calculation::parse_day_override;
/// use agent_payroll::models::DayCount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_day_override("22"), DayCount::Days(Decimal::new(22, 0)));
/// assert_eq!(parse_day_override(" 2.5j"), DayCount::Days(Decimal::new(25, 1)));
/// assert_eq!(parse_day_override("1e1"), DayCount::Days(Decimal::new(10, 0)));
/// assert_eq!(parse_day_override("abc"), DayCount::NotANumber);
/// ```
pub fn parse_day_override(text: &str) -> DayCount {
    let text = text.trim_start();
    let bytes = text.as_bytes();

    let (negative, mut pos) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };

    let int_start = pos;
    pos = skip_digits(bytes, pos);
    let integer = &text[int_start..pos];

    let mut fraction = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        pos = skip_digits(bytes, frac_start);
        fraction = &text[frac_start..pos];
    }

    if integer.is_empty() && fraction.is_empty() {
        return DayCount::NotANumber;
    }

    // an exponent counts only when at least one digit follows the marker
    let mut exponent = "";
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let sign_len = usize::from(matches!(bytes.get(pos + 1), Some(b'+' | b'-')));
        let digits_start = pos + 1 + sign_len;
        let digits_end = skip_digits(bytes, digits_start);
        if digits_end > digits_start {
            exponent = &text[pos + 1..digits_end];
        }
    }

    let literal = format!(
        "{}.{}",
        if integer.is_empty() { "0" } else { integer },
        if fraction.is_empty() { "0" } else { fraction }
    );

    let parsed = if exponent.is_empty() {
        Decimal::from_str(&literal)
    } else {
        Decimal::from_scientific(&format!("{}e{}", literal, exponent))
    };

    match parsed {
        Ok(value) if value.is_zero() => DayCount::ZERO,
        Ok(value) if negative => DayCount::Days(-value),
        Ok(value) => DayCount::Days(value),
        Err(_) => DayCount::NotANumber,
    }
}

fn skip_digits(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthlyKey;
    use rust_decimal_macros::dec;

    fn create_test_month(year: i32, month: u32) -> MonthlyData {
        let key = MonthlyKey::new("emp_001", year, month).unwrap();
        MonthlyData::with_defaults(&key).unwrap()
    }

    #[test]
    fn test_days_in_month_leap_february() {
        assert_eq!(days_in_month(2024, 1).unwrap(), 29);
        assert_eq!(days_in_month(2000, 1).unwrap(), 29);
    }

    #[test]
    fn test_days_in_month_common_february() {
        assert_eq!(days_in_month(2023, 1).unwrap(), 28);
        assert_eq!(days_in_month(1900, 1).unwrap(), 28);
    }

    #[test]
    fn test_days_in_month_all_months_of_2025() {
        let expected = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (month, days) in expected.iter().enumerate() {
            assert_eq!(days_in_month(2025, month as u32).unwrap(), *days);
        }
    }

    #[test]
    fn test_days_in_month_rejects_month_twelve() {
        assert!(matches!(
            days_in_month(2025, 12),
            Err(EngineError::InvalidMonth { month: 12 })
        ));
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut data = create_test_month(2024, 0);

        assert!(toggle_day(&mut data, 15).unwrap());
        assert_eq!(data.worked_days.len(), 1);
        assert!(!toggle_day(&mut data, 15).unwrap());
        assert!(data.worked_days.is_empty());
    }

    #[test]
    fn test_toggle_clears_manual_override() {
        let mut data = create_test_month(2024, 0);
        data.manual_day_count = "22".to_string();

        toggle_day(&mut data, 1).unwrap();

        assert_eq!(data.manual_day_count, "");
        assert_eq!(resolve_day_count(&data), DayCount::Days(dec!(1)));
    }

    #[test]
    fn test_toggle_rejects_day_outside_month() {
        let mut data = create_test_month(2023, 1);

        match toggle_day(&mut data, 29) {
            Err(EngineError::InvalidDay { day, days_in_month }) => {
                assert_eq!(day, 29);
                assert_eq!(days_in_month, 28);
            }
            other => panic!("Expected InvalidDay, got {:?}", other),
        }
        assert!(toggle_day(&mut data, 0).is_err());
        assert!(data.worked_days.is_empty());
    }

    #[test]
    fn test_select_all_then_clear_all() {
        let mut data = create_test_month(2024, 1);
        data.manual_day_count = "3".to_string();

        select_all_days(&mut data, 29);
        assert_eq!(data.worked_days.len(), 29);
        assert_eq!(data.worked_days.first(), Some(&1));
        assert_eq!(data.worked_days.last(), Some(&29));
        assert_eq!(data.manual_day_count, "");

        data.manual_day_count = "3".to_string();
        clear_all_days(&mut data);
        assert!(data.worked_days.is_empty());
        assert_eq!(data.manual_day_count, "");
    }

    #[test]
    fn test_select_all_replaces_existing_days() {
        let mut data = create_test_month(2024, 3);
        data.worked_days.insert(31);

        select_all_days(&mut data, 30);
        assert!(!data.worked_days.contains(&31));
        assert_eq!(data.worked_days.len(), 30);
    }

    #[test]
    fn test_set_manual_override_keeps_worked_days() {
        let mut data = create_test_month(2024, 0);
        select_all_days(&mut data, 31);

        set_manual_override(&mut data, "10");

        assert_eq!(data.worked_days.len(), 31);
        assert_eq!(resolve_day_count(&data), DayCount::Days(dec!(10)));
    }

    #[test]
    fn test_resolve_uses_worked_days_when_override_empty() {
        let mut data = create_test_month(2024, 0);
        data.worked_days.extend([5, 1, 3]);

        assert_eq!(resolve_day_count(&data), DayCount::Days(dec!(3)));
    }

    #[test]
    fn test_parse_override_variants() {
        assert_eq!(parse_day_override("22"), DayCount::Days(dec!(22)));
        assert_eq!(parse_day_override("21.5"), DayCount::Days(dec!(21.5)));
        assert_eq!(parse_day_override(".5"), DayCount::Days(dec!(0.5)));
        assert_eq!(parse_day_override("5."), DayCount::Days(dec!(5)));
        assert_eq!(parse_day_override("+4"), DayCount::Days(dec!(4)));
        assert_eq!(parse_day_override("-2"), DayCount::Days(dec!(-2)));
        assert_eq!(parse_day_override("  7  "), DayCount::Days(dec!(7)));
        assert_eq!(parse_day_override("12abc"), DayCount::Days(dec!(12)));
        assert_eq!(parse_day_override("-0"), DayCount::ZERO);
    }

    #[test]
    fn test_parse_override_exponent() {
        assert_eq!(parse_day_override("1e1"), DayCount::Days(dec!(10)));
        assert_eq!(parse_day_override("2.5E+1"), DayCount::Days(dec!(25)));
        assert_eq!(parse_day_override("25e-1"), DayCount::Days(dec!(2.5)));
        assert_eq!(parse_day_override("-1e1"), DayCount::Days(dec!(-10)));
        assert_eq!(parse_day_override("3e"), DayCount::Days(dec!(3)));
        assert_eq!(parse_day_override("3e+j"), DayCount::Days(dec!(3)));
    }

    #[test]
    fn test_parse_override_out_of_range_is_not_a_number() {
        assert_eq!(parse_day_override("Infinity"), DayCount::NotANumber);
        assert_eq!(parse_day_override("-Infinity"), DayCount::NotANumber);
        assert_eq!(parse_day_override("1e40"), DayCount::NotANumber);
    }

    #[test]
    fn test_parse_override_not_a_number() {
        assert_eq!(parse_day_override("abc"), DayCount::NotANumber);
        assert_eq!(parse_day_override(" "), DayCount::NotANumber);
        assert_eq!(parse_day_override("."), DayCount::NotANumber);
        assert_eq!(parse_day_override("-"), DayCount::NotANumber);
        assert_eq!(parse_day_override("j22"), DayCount::NotANumber);
    }
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;
    use crate::models::MonthlyKey;

    fn arb_month() -> impl Strategy<Value = MonthlyData> {
        (1990i32..2100, 0u32..12).prop_map(|(year, month)| {
            let key = MonthlyKey::new("emp_prop", year, month).unwrap();
            MonthlyData::with_defaults(&key).unwrap()
        })
    }

    proptest! {
        #[test]
        fn toggle_twice_restores_worked_days(
            mut data in arb_month(),
            initial in proptest::collection::btree_set(1u32..=28, 0..28),
            day in 1u32..=28,
            manual in "[0-9]{0,2}",
        ) {
            data.worked_days = initial.clone();
            data.manual_day_count = manual;

            toggle_day(&mut data, day).unwrap();
            toggle_day(&mut data, day).unwrap();

            prop_assert_eq!(&data.worked_days, &initial);
            prop_assert_eq!(data.manual_day_count.as_str(), "");
        }

        #[test]
        fn empty_override_counts_worked_days(
            mut data in arb_month(),
            days in proptest::collection::vec(1u32..=28, 0..40),
        ) {
            data.worked_days.extend(days.iter().copied());
            data.manual_day_count.clear();

            prop_assert_eq!(resolve_day_count(&data), DayCount::from(data.worked_days.len()));
        }

        #[test]
        fn numeric_override_wins_over_worked_days(
            mut data in arb_month(),
            days in proptest::collection::btree_set(1u32..=28, 1..28),
            manual in 0u32..=31,
        ) {
            data.worked_days = days;
            data.manual_day_count = manual.to_string();

            prop_assert_eq!(resolve_day_count(&data), DayCount::Days(Decimal::from(manual)));
        }

        #[test]
        fn select_all_then_clear_all_is_empty(mut data in arb_month()) {
            let last_day = days_in_month(data.year, data.month).unwrap();

            select_all_days(&mut data, last_day);
            prop_assert_eq!(data.worked_days.len() as u32, last_day);

            clear_all_days(&mut data);
            prop_assert!(data.worked_days.is_empty());
        }
    }
}
