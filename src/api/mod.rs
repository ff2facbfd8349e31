//! HTTP API module for the agent payroll engine.
//!
//! This module provides the REST endpoints for the agent register, the
//! monthly attendance records, the salary breakdown, the administrative
//! documents and the export/import of the whole store.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DayPath, DocumentPath, EmployeeRequest, MonthPath, MonthlyPatch, SearchParams};
pub use response::{
    ApiError, ApiErrorResponse, DutiesResponse, GradeRate, ImportSummary, MonthResponse,
    WageTableResponse,
};
pub use state::AppState;
