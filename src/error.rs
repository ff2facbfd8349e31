//! Error types for the agent payroll engine.
//!
//! The payroll core never fails: missing inputs, unknown grades, bad manual
//! overrides and missing dates all degrade into a still-renderable result.
//! The errors below only occur at the edges of the crate: configuration
//! loading, record storage and request validation.

use thiserror::Error;

/// The main error type for the agent payroll engine.
///
/// # Example
///
/// ```
/// use agent_payroll::error::EngineError;
///
/// let error = EngineError::EmployeeNotFound {
///     id: "emp_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: emp_404");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No employee is registered under the given identifier.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The identifier that was looked up.
        id: String,
    },

    /// A month index outside `0..=11` was supplied.
    #[error("Invalid month {month}: expected a value between 0 and 11")]
    InvalidMonth {
        /// The rejected month index.
        month: u32,
    },

    /// A day number outside the month was supplied.
    #[error("Invalid day {day}: the month has {days_in_month} days")]
    InvalidDay {
        /// The rejected day number.
        day: u32,
        /// The number of days in the targeted month.
        days_in_month: u32,
    },

    /// An employee record was invalid or contained inconsistent data.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The requested document type does not exist.
    #[error("Unknown document type: {kind}")]
    UnknownDocument {
        /// The document type that was requested.
        kind: String,
    },

    /// A calendar computation fell outside the supported range.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },

    /// A date field could not be parsed.
    #[error("Invalid date for '{field}': {value}")]
    InvalidDate {
        /// The field that carried the date.
        field: String,
        /// The rejected text.
        value: String,
    },

    /// The record store failed to read or write.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
