//! HTTP request handlers for the agent payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    calculate_salary, clear_all_days, days_in_month, select_all_days, toggle_day,
};
use crate::documents::derive_document;
use crate::error::{EngineError, EngineResult};
use crate::models::{DocumentKind, Employee, MonthlyData, MonthlyKey};
use crate::store::{StoreSnapshot, load_monthly_or_default, search_employees};

use super::request::{
    DayPath, DocumentPath, EmployeeRequest, MonthPath, MonthlyPatch, SearchParams,
};
use super::response::{
    ApiError, ApiErrorResponse, DutiesResponse, ImportSummary, MonthResponse, WageTableResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/wage-table", get(wage_table_handler))
        .route("/duties", get(duties_handler))
        .route(
            "/employees",
            get(list_employees_handler).post(create_employee_handler),
        )
        .route(
            "/employees/:id",
            get(get_employee_handler)
                .put(update_employee_handler)
                .delete(delete_employee_handler),
        )
        .route(
            "/employees/:id/months/:year/:month",
            get(get_month_handler).patch(patch_month_handler),
        )
        .route(
            "/employees/:id/months/:year/:month/days/:day/toggle",
            post(toggle_day_handler),
        )
        .route(
            "/employees/:id/months/:year/:month/days",
            post(select_all_days_handler).delete(clear_all_days_handler),
        )
        .route(
            "/employees/:id/months/:year/:month/salary",
            get(salary_handler),
        )
        .route(
            "/employees/:id/months/:year/:month/documents/:kind",
            get(document_handler),
        )
        .route("/export", get(export_handler))
        .route("/import", post(import_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, error: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %error,
        "Request failed"
    );
    ApiErrorResponse::from(error).into_response()
}

/// Converts a JSON body rejection into a 400 response.
fn json_rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::new(StatusCode::BAD_REQUEST, error).into_response()
}

/// Converts a path rejection (e.g. a non-numeric year) into a 400 response.
fn path_rejection_response(correlation_id: Uuid, rejection: PathRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Invalid path parameters"
    );
    ApiErrorResponse::new(StatusCode::BAD_REQUEST, ApiError::validation_error(body_text))
        .into_response()
}

fn require_employee(state: &AppState, id: &str) -> EngineResult<Employee> {
    state
        .store()
        .get_employee(id)?
        .ok_or_else(|| EngineError::EmployeeNotFound { id: id.to_string() })
}

/// Loads the agent and the addressed monthly record (defaults if never
/// saved).
fn load_month(state: &AppState, key: &MonthlyKey) -> EngineResult<(Employee, MonthlyData)> {
    let employee = require_employee(state, &key.employee_id)?;
    let monthly = load_monthly_or_default(state.store(), key)?;
    Ok((employee, monthly))
}

fn month_response(
    state: &AppState,
    employee: &Employee,
    monthly: MonthlyData,
) -> EngineResult<MonthResponse> {
    let salary = calculate_salary(Some(employee), Some(&monthly), state.config().wage_table());
    Ok(MonthResponse {
        days_in_month: days_in_month(monthly.year, monthly.month)?,
        record: monthly,
        salary,
    })
}

/// Applies an edit to a month of an existing agent and returns the new
/// month view.
///
/// The edit runs inside the store's atomic update, so concurrent edits of
/// the same month are all kept.
fn edit_month<F>(state: &AppState, key: &MonthlyKey, mut edit: F) -> EngineResult<MonthResponse>
where
    F: FnMut(&mut MonthlyData) -> EngineResult<()>,
{
    let employee = require_employee(state, &key.employee_id)?;
    let saved = state.store().update_monthly(key, &mut edit)?;
    month_response(state, &employee, saved)
}

/// Handler for GET /wage-table.
async fn wage_table_handler(State(state): State<AppState>) -> Response {
    json_response(
        StatusCode::OK,
        WageTableResponse::from(state.config().wage_table()),
    )
}

/// Handler for GET /duties.
async fn duties_handler(State(state): State<AppState>) -> Response {
    let registration = state.config().registration();
    json_response(
        StatusCode::OK,
        DutiesResponse {
            duties: registration.duties.clone(),
            default_duty: registration.default_duty().to_string(),
            defaults: registration.defaults.clone(),
        },
    )
}

/// Handler for GET /employees.
async fn list_employees_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    match search_employees(state.store(), &params.search) {
        Ok(employees) => {
            info!(
                correlation_id = %correlation_id,
                search = %params.search,
                count = employees.len(),
                "Listed employees"
            );
            json_response(StatusCode::OK, employees)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /employees.
///
/// Registers a new agent under a generated id.
async fn create_employee_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing employee registration");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let result = request.validate().and_then(|()| {
        let employee = request.into_employee(String::new(), state.config().registration());
        warn_on_unknown_grade(&state, correlation_id, &employee);
        state.store().save_employee(employee)
    });

    match result {
        Ok(employee) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee.id,
                "Employee registered"
            );
            json_response(StatusCode::CREATED, employee)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /employees/:id.
async fn get_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    match require_employee(&state, &id) {
        Ok(employee) => json_response(StatusCode::OK, employee),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for PUT /employees/:id.
///
/// Replaces an existing agent; omitted optional fields take the
/// registration defaults, as on creation.
async fn update_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %id, "Processing employee update");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let result = request.validate().and_then(|()| {
        require_employee(&state, &id)?;
        let employee = request.into_employee(id.clone(), state.config().registration());
        warn_on_unknown_grade(&state, correlation_id, &employee);
        state.store().save_employee(employee)
    });

    match result {
        Ok(employee) => json_response(StatusCode::OK, employee),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for DELETE /employees/:id.
async fn delete_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    match state.store().delete_employee(&id) {
        Ok(true) => {
            info!(correlation_id = %correlation_id, employee_id = %id, "Employee deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => error_response(correlation_id, EngineError::EmployeeNotFound { id }),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /employees/:id/months/:year/:month.
async fn get_month_handler(
    State(state): State<AppState>,
    path: Result<Path<MonthPath>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(path) = match path {
        Ok(path) => path,
        Err(rejection) => return path_rejection_response(correlation_id, rejection),
    };

    let result = path.key().and_then(|key| {
        let (employee, monthly) = load_month(&state, &key)?;
        month_response(&state, &employee, monthly)
    });

    match result {
        Ok(month) => json_response(StatusCode::OK, month),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for PATCH /employees/:id/months/:year/:month.
async fn patch_month_handler(
    State(state): State<AppState>,
    path: Result<Path<MonthPath>, PathRejection>,
    payload: Result<Json<MonthlyPatch>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(path) = match path {
        Ok(path) => path,
        Err(rejection) => return path_rejection_response(correlation_id, rejection),
    };
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let result = path
        .key()
        .and_then(|key| edit_month(&state, &key, |monthly| patch.apply(monthly)));

    match result {
        Ok(month) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %path.id,
                year = path.year,
                month = path.month,
                "Monthly record updated"
            );
            json_response(StatusCode::OK, month)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /employees/:id/months/:year/:month/days/:day/toggle.
async fn toggle_day_handler(
    State(state): State<AppState>,
    path: Result<Path<DayPath>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(path) = match path {
        Ok(path) => path,
        Err(rejection) => return path_rejection_response(correlation_id, rejection),
    };

    let result = path.key().and_then(|key| {
        edit_month(&state, &key, |monthly| {
            toggle_day(monthly, path.day).map(|_| ())
        })
    });

    match result {
        Ok(month) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %path.id,
                day = path.day,
                worked_days = month.record.worked_days.len(),
                "Day toggled"
            );
            json_response(StatusCode::OK, month)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /employees/:id/months/:year/:month/days.
///
/// Marks every day of the month as worked.
async fn select_all_days_handler(
    State(state): State<AppState>,
    path: Result<Path<MonthPath>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(path) = match path {
        Ok(path) => path,
        Err(rejection) => return path_rejection_response(correlation_id, rejection),
    };

    let result = path.key().and_then(|key| {
        edit_month(&state, &key, |monthly| {
            let last_day = days_in_month(monthly.year, monthly.month)?;
            select_all_days(monthly, last_day);
            Ok(())
        })
    });

    match result {
        Ok(month) => json_response(StatusCode::OK, month),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for DELETE /employees/:id/months/:year/:month/days.
async fn clear_all_days_handler(
    State(state): State<AppState>,
    path: Result<Path<MonthPath>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(path) = match path {
        Ok(path) => path,
        Err(rejection) => return path_rejection_response(correlation_id, rejection),
    };

    let result = path.key().and_then(|key| {
        edit_month(&state, &key, |monthly| {
            clear_all_days(monthly);
            Ok(())
        })
    });

    match result {
        Ok(month) => json_response(StatusCode::OK, month),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /employees/:id/months/:year/:month/salary.
async fn salary_handler(
    State(state): State<AppState>,
    path: Result<Path<MonthPath>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(path) = match path {
        Ok(path) => path,
        Err(rejection) => return path_rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = path.key().and_then(|key| {
        let (employee, monthly) = load_month(&state, &key)?;
        Ok(calculate_salary(
            Some(&employee),
            Some(&monthly),
            state.config().wage_table(),
        ))
    });

    match result {
        Ok(salary) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %path.id,
                day_count = %salary.day_count,
                gross_total = %salary.gross_total,
                duration_us = start_time.elapsed().as_micros(),
                "Salary calculated"
            );
            json_response(StatusCode::OK, salary)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /employees/:id/months/:year/:month/documents/:kind.
async fn document_handler(
    State(state): State<AppState>,
    path: Result<Path<DocumentPath>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let Path(path) = match path {
        Ok(path) => path,
        Err(rejection) => return path_rejection_response(correlation_id, rejection),
    };

    let result = path.kind.parse::<DocumentKind>().and_then(|kind| {
        let key = path.key()?;
        let (employee, monthly) = load_month(&state, &key)?;
        let salary = calculate_salary(Some(&employee), Some(&monthly), state.config().wage_table());
        Ok(derive_document(kind, &employee, &monthly, &salary))
    });

    match result {
        Ok(document) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %path.id,
                kind = %document.kind,
                "Document derived"
            );
            json_response(StatusCode::OK, document)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /export.
async fn export_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();

    match state.store().snapshot() {
        Ok(snapshot) => {
            info!(
                correlation_id = %correlation_id,
                employees = snapshot.employees.len(),
                monthly_records = snapshot.monthly_records.len(),
                "Store exported"
            );
            json_response(StatusCode::OK, snapshot)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /import.
///
/// Replaces the whole content of the store.
async fn import_handler(
    State(state): State<AppState>,
    payload: Result<Json<StoreSnapshot>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing import");

    let snapshot = match payload {
        Ok(Json(snapshot)) => snapshot,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let summary = ImportSummary {
        employees: snapshot.employees.len(),
        monthly_records: snapshot.monthly_records.len(),
    };

    match state.store().restore(snapshot) {
        Ok(()) => {
            info!(
                correlation_id = %correlation_id,
                employees = summary.employees,
                monthly_records = summary.monthly_records,
                "Store imported"
            );
            json_response(StatusCode::OK, summary)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

fn warn_on_unknown_grade(state: &AppState, correlation_id: Uuid, employee: &Employee) {
    if !state.config().wage_table().contains(&employee.grade) {
        warn!(
            correlation_id = %correlation_id,
            grade = %employee.grade,
            "Grade is not in the wage table; its daily rate will be zero"
        );
    }
}
