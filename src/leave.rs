// ABOUTME: Leave request API handlers: search and paging, creation, approval and yearly statistics
// ABOUTME: Statistics measure approved days against a fixed annual entitlement pool

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use chrono::NaiveDate;

use crate::entities::leave_request::LeaveStatus;
use crate::error::{AppError, Result};
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::types::{
    CreateLeaveRequest, LeaveCreatedResponse, LeaveFilter, LeaveListQuery, LeaveListResponse,
    LeaveRequestView, LeaveStats, MessageResponse, NewLeaveRequest, StatusUpdateRequest,
};
use crate::AppState;

pub async fn list_leave_requests(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<LeaveListQuery>,
) -> Result<Json<LeaveListResponse>> {
    let filter = LeaveFilter::try_from(query)?;
    let (items, total) = state.storage.list_leave_requests(&filter).await?;

    Ok(Json(LeaveListResponse {
        requests: items.into_iter().map(LeaveRequestView::from).collect(),
        total,
        page: filter.page,
        per_page: filter.per_page,
    }))
}

pub async fn create_leave_request(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateLeaveRequest>,
) -> Result<(StatusCode, Json<LeaveCreatedResponse>)> {
    let new_request = NewLeaveRequest::try_from(payload)?;
    let created = state.storage.create_leave_request(new_request).await?;

    Ok((
        StatusCode::CREATED,
        Json(LeaveCreatedResponse {
            message: "Leave request created successfully".to_string(),
            request_id: created.request_id,
        }),
    ))
}

pub async fn update_leave_request(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(body): JsonBody<StatusUpdateRequest>,
) -> Result<Json<MessageResponse>> {
    let status: LeaveStatus = body
        .status
        .as_deref()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| AppError::BadRequest("Invalid status".to_string()))?;

    let updated = state.storage.update_leave_status(id, status).await?;
    tracing::info!(request_id = %updated.request_id, %status, "leave request updated");
    Ok(Json(MessageResponse::new("Leave request updated successfully")))
}

pub fn remaining_leaves(pool: i64, taken: i64) -> i64 {
    (pool - taken).max(0)
}

pub async fn leave_stats(State(state): State<AppState>) -> Result<Json<LeaveStats>> {
    let year = state.config.leave_year();
    let (year_start, year_end) = NaiveDate::from_ymd_opt(year, 1, 1)
        .zip(NaiveDate::from_ymd_opt(year, 12, 31))
        .ok_or_else(|| AppError::Internal(format!("year {year} is out of range")))?;

    let total_leaves = state.config.total_leave_pool();
    let leaves_taken = state
        .storage
        .approved_leave_days(year_start, year_end)
        .await?;
    let pending_requests = state
        .storage
        .count_leave_requests_with_status(LeaveStatus::Pending)
        .await?;

    Ok(Json(LeaveStats {
        total_leaves,
        leaves_taken,
        pending_requests,
        remaining_leaves: remaining_leaves(total_leaves, leaves_taken),
    }))
}
