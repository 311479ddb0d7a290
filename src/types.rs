// ABOUTME: Type definitions for API requests, responses, and validated domain inputs
// ABOUTME: Raw request bodies are converted into validated inputs before reaching storage

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::attendance::AttendanceStatus;
use crate::entities::leave_request::LeaveStatus;
use crate::entities::{attendance, employee, leave_request};
use crate::error::AppError;
use crate::window::{INPUT_DATE_FORMAT, format_display_date};

// Auth forms
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Returns the trimmed value when present and non-blank.
fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn missing_fields() -> AppError {
    AppError::BadRequest("Missing required fields".to_string())
}

// Employee directory
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub title: String,
    pub email: String,
    pub department: String,
    pub location: String,
    pub avatar: String,
}

impl TryFrom<CreateEmployeeRequest> for NewEmployee {
    type Error = AppError;

    fn try_from(req: CreateEmployeeRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required(req.name).ok_or_else(missing_fields)?,
            title: required(req.title).ok_or_else(missing_fields)?,
            email: required(req.email).ok_or_else(missing_fields)?,
            department: required(req.department).ok_or_else(missing_fields)?,
            location: required(req.location).ok_or_else(missing_fields)?,
            avatar: required(req.avatar).unwrap_or_else(|| employee::DEFAULT_AVATAR.to_string()),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmployeeCreatedResponse {
    pub message: String,
    pub employee_id: String,
}

// Attendance
#[derive(Debug, Default, Deserialize)]
pub struct AttendanceQuery {
    pub filter: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub clock_in: Option<String>,
    pub clock_out: Option<String>,
    pub status: AttendanceStatus,
    pub date: NaiveDate,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttendanceRecordView {
    pub id: i32,
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub date: String,
    pub status: String,
    pub clock_in: Option<String>,
    pub clock_out: Option<String>,
    pub image: Option<String>,
}

impl From<attendance::Model> for AttendanceRecordView {
    fn from(record: attendance::Model) -> Self {
        Self {
            id: record.id,
            employee_id: record.employee_id,
            name: record.name,
            department: record.department,
            date: format_display_date(record.date),
            status: record.status.label().to_string(),
            clock_in: record.clock_in,
            clock_out: record.clock_out,
            image: record.image,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttendanceOverview {
    pub dates: Vec<String>,
    pub percentages: Vec<f64>,
    pub records: Vec<AttendanceRecordView>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PresentStats {
    pub count: u64,
    pub total: u64,
    pub percentage: f64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusStats {
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AttendanceStats {
    pub present: PresentStats,
    pub late: StatusStats,
    pub leave: StatusStats,
    pub remote: StatusStats,
    pub total_employees: u64,
}

// Leave requests
#[derive(Debug, Default, Deserialize)]
pub struct LeaveListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

pub const DEFAULT_PER_PAGE: u64 = 10;
pub const MAX_PER_PAGE: u64 = 100;

/// Validated listing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveFilter {
    pub search: Option<String>,
    pub status: Option<LeaveStatus>,
    pub page: u64,
    pub per_page: u64,
}

impl Default for LeaveFilter {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl LeaveFilter {
    /// Rows to skip for the requested page; pages past what SQL can address are rejected.
    pub fn offset(&self) -> Result<u64, AppError> {
        (self.page - 1)
            .checked_mul(self.per_page)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| AppError::BadRequest("Page out of range".to_string()))
    }
}

impl TryFrom<LeaveListQuery> for LeaveFilter {
    type Error = AppError;

    fn try_from(query: LeaveListQuery) -> Result<Self, Self::Error> {
        let status = match query.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(
                raw.parse::<LeaveStatus>()
                    .map_err(|_| AppError::BadRequest("Invalid status".to_string()))?,
            ),
        };

        Ok(Self {
            search: required(query.search),
            status,
            page: query.page.unwrap_or(1).max(1),
            per_page: query
                .per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateLeaveRequest {
    pub employee_name: Option<String>,
    pub department: Option<String>,
    pub leave_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub employee_image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub employee_name: String,
    pub department: String,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub employee_image: Option<String>,
}

impl NewLeaveRequest {
    /// Inclusive length of the leave in days.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

fn parse_input_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, INPUT_DATE_FORMAT)
        .map_err(|_| AppError::BadRequest(format!("Invalid date: {raw}")))
}

impl TryFrom<CreateLeaveRequest> for NewLeaveRequest {
    type Error = AppError;

    fn try_from(req: CreateLeaveRequest) -> Result<Self, Self::Error> {
        let employee_name = required(req.employee_name).ok_or_else(missing_fields)?;
        let department = required(req.department).ok_or_else(missing_fields)?;
        let leave_type = required(req.leave_type).ok_or_else(missing_fields)?;
        let start_raw = required(req.start_date).ok_or_else(missing_fields)?;
        let end_raw = required(req.end_date).ok_or_else(missing_fields)?;

        let start_date = parse_input_date(&start_raw)?;
        let end_date = parse_input_date(&end_raw)?;
        if start_date > end_date {
            return Err(AppError::BadRequest(
                "Start date must be before end date".to_string(),
            ));
        }

        Ok(Self {
            employee_name,
            department,
            leave_type,
            start_date,
            end_date,
            employee_image: required(req.employee_image),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaveCreatedResponse {
    pub message: String,
    pub request_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaveEmployeeView {
    pub name: String,
    pub department: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaveRequestView {
    pub id: i32,
    pub request_id: String,
    pub employee: LeaveEmployeeView,
    pub leave_type: String,
    pub from: String,
    pub to: String,
    pub days: i32,
    pub status: LeaveStatus,
}

impl From<leave_request::Model> for LeaveRequestView {
    fn from(leave: leave_request::Model) -> Self {
        Self {
            id: leave.id,
            request_id: leave.request_id,
            employee: LeaveEmployeeView {
                name: leave.employee_name,
                department: leave.department,
                image: leave.employee_image,
            },
            leave_type: leave.leave_type,
            from: format_display_date(leave.start_date),
            to: format_display_date(leave.end_date),
            days: leave.days,
            status: leave.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaveListResponse {
    pub requests: Vec<LeaveRequestView>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LeaveStats {
    pub total_leaves: i64,
    pub leaves_taken: i64,
    pub pending_requests: u64,
    pub remaining_leaves: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leave_body(start: &str, end: &str) -> CreateLeaveRequest {
        CreateLeaveRequest {
            employee_name: Some("Aarav Sharma".to_string()),
            department: Some("IT".to_string()),
            leave_type: Some("Casual Leave".to_string()),
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
            employee_image: None,
        }
    }

    #[test]
    fn test_leave_days_are_inclusive() {
        let single = NewLeaveRequest::try_from(leave_body("2025-03-17", "2025-03-17")).unwrap();
        assert_eq!(single.days(), 1);

        let span = NewLeaveRequest::try_from(leave_body("2025-02-27", "2025-03-02")).unwrap();
        assert_eq!(span.days(), 4);
    }

    #[test]
    fn test_leave_rejects_reversed_and_malformed_dates() {
        let reversed = NewLeaveRequest::try_from(leave_body("2025-05-12", "2025-05-10"));
        assert!(
            matches!(reversed, Err(AppError::BadRequest(msg)) if msg == "Start date must be before end date")
        );

        let malformed = NewLeaveRequest::try_from(leave_body("12/05/2025", "2025-05-10"));
        assert!(matches!(malformed, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_leave_rejects_blank_fields() {
        let mut body = leave_body("2025-05-10", "2025-05-12");
        body.leave_type = Some("   ".to_string());
        assert!(
            matches!(NewLeaveRequest::try_from(body), Err(AppError::BadRequest(msg)) if msg == "Missing required fields")
        );
    }

    #[test]
    fn test_employee_defaults_avatar() {
        let employee = NewEmployee::try_from(CreateEmployeeRequest {
            name: Some("Ishaan Kapoor".to_string()),
            title: Some("QA Engineer".to_string()),
            email: Some("ishaan.kapoor@company.in".to_string()),
            department: Some("IT".to_string()),
            location: Some("Pune".to_string()),
            avatar: None,
        })
        .unwrap();
        assert_eq!(employee.avatar, employee::DEFAULT_AVATAR);
    }

    #[test]
    fn test_employee_requires_all_fields() {
        let request = CreateEmployeeRequest {
            name: Some("Ishaan Kapoor".to_string()),
            ..Default::default()
        };
        assert!(NewEmployee::try_from(request).is_err());
    }

    #[test]
    fn test_leave_filter_normalization() {
        let filter = LeaveFilter::try_from(LeaveListQuery {
            search: Some("  ".to_string()),
            status: Some("all".to_string()),
            page: Some(0),
            per_page: Some(1000),
        })
        .unwrap();
        assert_eq!(filter.search, None);
        assert_eq!(filter.status, None);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.per_page, MAX_PER_PAGE);

        let approved = LeaveFilter::try_from(LeaveListQuery {
            status: Some("approved".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(approved.status, Some(LeaveStatus::Approved));

        assert!(
            LeaveFilter::try_from(LeaveListQuery {
                status: Some("cancelled".to_string()),
                ..Default::default()
            })
            .is_err()
        );
    }

    #[test]
    fn test_leave_filter_offset_bounds() {
        let third_page = LeaveFilter {
            page: 3,
            per_page: 10,
            ..Default::default()
        };
        assert_eq!(third_page.offset().unwrap(), 20);
        assert_eq!(LeaveFilter::default().offset().unwrap(), 0);

        let far_page = LeaveFilter {
            page: 100_000_000_000_000_000,
            per_page: 10,
            ..Default::default()
        };
        assert_eq!(far_page.offset().unwrap(), 999_999_999_999_999_990);

        let overflowing = LeaveFilter {
            page: u64::MAX,
            per_page: 10,
            ..Default::default()
        };
        assert!(matches!(overflowing.offset(), Err(AppError::BadRequest(_))));

        let past_sql_range = LeaveFilter {
            page: u64::MAX / 100,
            per_page: 100,
            ..Default::default()
        };
        assert!(past_sql_range.offset().is_err());
    }
}
