//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod document;
mod employee;
mod monthly_data;
mod salary;

pub use document::{Document, DocumentField, DocumentKind};
pub use employee::Employee;
pub use monthly_data::{DEFAULT_ACT_NUMBER, MonthlyData, MonthlyKey, parse_calendar_date};
pub use salary::{DayCount, NOT_A_NUMBER, SalaryCalculation};
