//! French locale formatting shared by the salary calculator and the
//! document derivers.
//!
//! Money is printed with exactly two decimals, rounded half away from zero.
//! The liquidation statement swaps the decimal point for a comma; the other
//! documents keep the point.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::NOT_A_NUMBER;

/// Month names as printed on the documents, January first.
pub const MONTH_NAMES_FR: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

/// Returns the French name of a zero-based month index.
pub fn month_name_fr(month: u32) -> Option<&'static str> {
    MONTH_NAMES_FR.get(month as usize).copied()
}

/// Formats a decimal with exactly two fraction digits.
///
/// # Example
///
/// ```
/// use agent_payroll::format::two_decimals;
/// use rust_decimal::Decimal;
///
/// assert_eq!(two_decimals(Decimal::new(502, 0)), "502.00");
/// assert_eq!(two_decimals(Decimal::new(30120, 3)), "30.12");
/// assert_eq!(two_decimals(Decimal::new(125, 3)), "0.13");
/// ```
pub fn two_decimals(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(2);
    rounded.to_string()
}

/// Formats an amount that may be not-a-number.
pub fn format_amount(value: Option<Decimal>) -> String {
    value.map(two_decimals).unwrap_or_else(|| NOT_A_NUMBER.to_string())
}

/// Replaces the decimal point with a comma (`"502.00"` → `"502,00"`).
pub fn with_decimal_comma(text: &str) -> String {
    text.replacen('.', ",", 1)
}

/// Date layout of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `DD-MM-YYYY`, used by the decision.
    Dashed,
    /// `DD/MM/YYYY`, used by the engagement letter and the liquidation.
    Slashed,
}

impl DateStyle {
    fn separator(self) -> char {
        match self {
            DateStyle::Dashed => '-',
            DateStyle::Slashed => '/',
        }
    }

    /// Text printed in place of a missing date.
    pub fn placeholder(self) -> &'static str {
        match self {
            DateStyle::Dashed => "XX-XX-XXXX",
            DateStyle::Slashed => "XX/XX/XXXX",
        }
    }
}

/// Formats an optional date, printing the placeholder when it is unset.
///
/// # Example
///
/// ```
/// use agent_payroll::format::{DateStyle, format_date};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 2, 29);
/// assert_eq!(format_date(date, DateStyle::Dashed), "29-02-2024");
/// assert_eq!(format_date(date, DateStyle::Slashed), "29/02/2024");
/// assert_eq!(format_date(None, DateStyle::Slashed), "XX/XX/XXXX");
/// ```
pub fn format_date(date: Option<NaiveDate>, style: DateStyle) -> String {
    match date {
        Some(date) => {
            let sep = style.separator();
            format!("{:02}{sep}{:02}{sep}{}", date.day(), date.month(), date.year())
        }
        None => style.placeholder().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_two_decimals_pads_and_rounds() {
        assert_eq!(two_decimals(dec!(0)), "0.00");
        assert_eq!(two_decimals(dec!(2208.8)), "2208.80");
        assert_eq!(two_decimals(dec!(471.88)), "471.88");
        assert_eq!(two_decimals(dec!(6.024)), "6.02");
        assert_eq!(two_decimals(dec!(99.076)), "99.08");
        assert_eq!(two_decimals(dec!(-301.2)), "-301.20");
    }

    #[test]
    fn test_two_decimals_never_prints_negative_zero() {
        assert_eq!(two_decimals(dec!(-0.001)), "0.00");
        assert_eq!(two_decimals(-Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_format_amount_not_a_number() {
        assert_eq!(format_amount(None), "NaN");
        assert_eq!(format_amount(Some(dec!(1.5))), "1.50");
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(with_decimal_comma("502.00"), "502,00");
        assert_eq!(with_decimal_comma("NaN"), "NaN");
        assert_eq!(with_decimal_comma("22"), "22");
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name_fr(0), Some("Janvier"));
        assert_eq!(month_name_fr(7), Some("Août"));
        assert_eq!(month_name_fr(11), Some("Décembre"));
        assert_eq!(month_name_fr(12), None);
    }

    #[test]
    fn test_single_digit_day_and_month_are_padded() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4);
        assert_eq!(format_date(date, DateStyle::Dashed), "04-03-2025");
    }

    #[test]
    fn test_placeholders_match_style() {
        assert_eq!(format_date(None, DateStyle::Dashed), "XX-XX-XXXX");
        assert_eq!(DateStyle::Slashed.placeholder(), "XX/XX/XXXX");
    }
}
