// ABOUTME: Attendance API handlers: windowed listing, status edits, CSV export and statistics
// ABOUTME: Every window is resolved against the configured reference date

use axum::{
    Json,
    extract::State,
    http::header,
    response::IntoResponse,
};
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::entities::attendance::{self, AttendanceStatus};
use crate::error::{AppError, Result};
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::types::{
    AttendanceOverview, AttendanceQuery, AttendanceRecordView, AttendanceStats, FilterQuery,
    MessageResponse, PresentStats, StatusStats, StatusUpdateRequest,
};
use crate::window::{DateRange, FilterWindow, format_display_date, percentage};
use crate::AppState;

pub const CSV_HEADER: [&str; 7] = [
    "Employee ID",
    "Name",
    "Department",
    "Date",
    "Status",
    "Clock In",
    "Clock Out",
];

const MISSING_CLOCK: &str = "--:--";

/// Share of `present` rows for each day of `range`, in date order.
pub fn daily_presence(
    range: DateRange,
    counts: &HashMap<NaiveDate, HashMap<AttendanceStatus, u64>>,
) -> Vec<(NaiveDate, f64)> {
    range
        .days()
        .map(|day| {
            let (present, total) = counts
                .get(&day)
                .map(|by_status| {
                    let present = by_status
                        .get(&AttendanceStatus::Present)
                        .copied()
                        .unwrap_or(0);
                    (present, by_status.values().sum())
                })
                .unwrap_or((0, 0));
            (day, percentage(present, total))
        })
        .collect()
}

pub fn build_stats(counts: &HashMap<AttendanceStatus, u64>, total_employees: u64) -> AttendanceStats {
    let total: u64 = counts.values().sum();
    let count = |status: AttendanceStatus| counts.get(&status).copied().unwrap_or(0);
    let status_stats = |status: AttendanceStatus| StatusStats {
        count: count(status),
        percentage: percentage(count(status), total),
    };

    AttendanceStats {
        present: PresentStats {
            count: count(AttendanceStatus::Present),
            total,
            percentage: percentage(count(AttendanceStatus::Present), total),
        },
        late: status_stats(AttendanceStatus::Late),
        leave: status_stats(AttendanceStatus::Leave),
        remote: status_stats(AttendanceStatus::Remote),
        total_employees,
    }
}

/// Renders records as CSV bytes, header first, one line per record.
pub fn render_csv(records: &[attendance::Model]) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new().from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;

    for record in records {
        let date = format_display_date(record.date);
        wtr.write_record([
            record.employee_id.as_str(),
            record.name.as_str(),
            record.department.as_str(),
            date.as_str(),
            record.status.label(),
            record.clock_in.as_deref().unwrap_or(MISSING_CLOCK),
            record.clock_out.as_deref().unwrap_or(MISSING_CLOCK),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Csv(e.to_string()))
}

pub async fn list_attendance(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<AttendanceQuery>,
) -> Result<Json<AttendanceOverview>> {
    let window = FilterWindow::from_query(query.filter.as_deref())?;
    let range = window.resolve(state.config.reference_date);

    let counts = state.storage.attendance_counts_by_day(range).await?;
    let (dates, percentages) = daily_presence(range, &counts)
        .into_iter()
        .map(|(day, pct)| (format_display_date(day), pct))
        .unzip();

    let records = state
        .storage
        .attendance_in_range(range, query.limit)
        .await?
        .into_iter()
        .map(AttendanceRecordView::from)
        .collect();

    Ok(Json(AttendanceOverview {
        dates,
        percentages,
        records,
    }))
}

fn parse_status(body: StatusUpdateRequest) -> Result<AttendanceStatus> {
    body.status
        .as_deref()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| AppError::BadRequest("Invalid status".to_string()))
}

pub async fn update_attendance(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(body): JsonBody<StatusUpdateRequest>,
) -> Result<Json<MessageResponse>> {
    let status = parse_status(body)?;
    state.storage.update_attendance_status(id, status).await?;
    tracing::info!(id, %status, "attendance status updated");
    Ok(Json(MessageResponse::new("Status updated successfully")))
}

pub async fn delete_attendance(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<MessageResponse>> {
    state.storage.delete_attendance(id).await?;
    tracing::info!(id, "attendance record deleted");
    Ok(Json(MessageResponse::new("Record deleted successfully")))
}

pub async fn export_attendance(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<FilterQuery>,
) -> Result<impl IntoResponse> {
    let window = FilterWindow::from_query(query.filter.as_deref())?;
    let reference = state.config.reference_date;
    let records = state
        .storage
        .attendance_in_range(window.resolve(reference), None)
        .await?;

    let body = render_csv(&records)?;
    let disposition = format!(
        "attachment; filename=attendance_{}_{}.csv",
        window,
        reference.format("%Y-%m-%d")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

pub async fn attendance_stats(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<FilterQuery>,
) -> Result<Json<AttendanceStats>> {
    let window = FilterWindow::from_query(query.filter.as_deref())?;
    let range = window.resolve(state.config.reference_date);

    let counts = state.storage.attendance_counts(range).await?;
    let total_employees = state.storage.count_employees().await?;

    Ok(Json(build_stats(&counts, total_employees)))
}
