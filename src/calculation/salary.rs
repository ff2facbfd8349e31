//! Monthly salary calculation.
//!
//! Wages are `days × daily rate`, with the optional 6% RCAR retention
//! deducted from the gross. Arithmetic is exact decimal; the two-decimal
//! rounding only happens when the result is formatted.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::calculation::resolve_day_count;
use crate::config::WageTable;
use crate::format::format_amount;
use crate::models::{DayCount, Employee, MonthlyData, SalaryCalculation};

/// The RCAR pension retention rate applied to the gross wage.
pub const RCAR_RATE: Decimal = dec!(0.06);

/// Calculates the wage breakdown of one agent for one month.
///
/// # Arguments
///
/// * `employee` - The agent, or `None` if no agent is selected
/// * `monthly` - The agent's monthly record, or `None` if not loaded yet
/// * `wage_table` - The grade to daily rate mapping
///
/// # Returns
///
/// A [`SalaryCalculation`]. This function never fails:
/// - a missing agent or record yields [`SalaryCalculation::zeroed`]
/// - a grade missing from the wage table yields a zero daily rate
/// - a manual override that is not a number yields `NaN` money fields,
///   except the retention, which stays `0.00` when RCAR is off
///
/// # Example
///
/// ```
/// use agent_payroll::calculation::calculate_salary;
/// use agent_payroll::config::ConfigLoader;
/// use agent_payroll::models::{Employee, MonthlyData, MonthlyKey};
///
/// let loader = ConfigLoader::builtin().unwrap();
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
///     rcar_enabled: true,
/// };
/// let key = MonthlyKey::new("emp_001", 2024, 0).unwrap();
/// let mut monthly = MonthlyData::with_defaults(&key).unwrap();
/// monthly.worked_days.extend(1..=5);
///
/// let salary = calculate_salary(Some(&employee), Some(&monthly), loader.wage_table());
/// assert_eq!(salary.gross_total, "502.00");
/// assert_eq!(salary.retention_amount, "30.12");
/// assert_eq!(salary.net_total, "471.88");
/// ```
pub fn calculate_salary(
    employee: Option<&Employee>,
    monthly: Option<&MonthlyData>,
    wage_table: &WageTable,
) -> SalaryCalculation {
    let (employee, monthly) = match (employee, monthly) {
        (Some(employee), Some(monthly)) => (employee, monthly),
        _ => return SalaryCalculation::zeroed(),
    };

    let day_count = resolve_day_count(monthly);
    if day_count == DayCount::NotANumber {
        debug!(
            employee_id = %employee.id,
            manual_day_count = %monthly.manual_day_count,
            "Manual day count is not a number"
        );
    }

    let daily_rate = wage_table.daily_rate(&employee.grade).unwrap_or(Decimal::ZERO);

    let gross = day_count.value().and_then(|days| days.checked_mul(daily_rate));
    let retention = if employee.rcar_enabled {
        gross.and_then(|gross| gross.checked_mul(RCAR_RATE))
    } else {
        Some(Decimal::ZERO)
    };
    let net = match (gross, retention) {
        (Some(gross), Some(retention)) => gross.checked_sub(retention),
        _ => None,
    };

    SalaryCalculation {
        day_count,
        daily_rate,
        gross_total: format_amount(gross),
        retention_amount: format_amount(retention),
        net_total: format_amount(net),
    }
}
