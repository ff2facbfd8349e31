//! Calculation logic for the agent payroll engine.
//!
//! This module contains the attendance operations (ticking days, the
//! manual day-count override and its resolution) and the monthly salary
//! calculation with the RCAR retention.

mod attendance;
mod salary;

pub use attendance::{
    clear_all_days, days_in_month, parse_day_override, resolve_day_count, select_all_days,
    set_manual_override, toggle_day,
};
pub use salary::{RCAR_RATE, calculate_salary};
