// ABOUTME: Employee directory API handlers
// ABOUTME: Lists every employee and adds new ones with generated EMP identifiers

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use crate::entities::employee;
use crate::error::Result;
use crate::extract::JsonBody;
use crate::types::{CreateEmployeeRequest, EmployeeCreatedResponse, NewEmployee};
use crate::AppState;

pub async fn list_employees(State(state): State<AppState>) -> Result<Json<Vec<employee::Model>>> {
    let employees = state.storage.list_employees().await?;
    Ok(Json(employees))
}

pub async fn add_employee(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<EmployeeCreatedResponse>)> {
    let new_employee = NewEmployee::try_from(payload)?;
    let created = state.storage.create_employee(new_employee).await?;

    Ok((
        StatusCode::CREATED,
        Json(EmployeeCreatedResponse {
            message: "Employee added successfully".to_string(),
            employee_id: created.employee_id,
        }),
    ))
}
