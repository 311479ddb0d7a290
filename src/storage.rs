// ABOUTME: SeaORM storage layer for users, employees, attendance and leave requests
// ABOUTME: Owns the connection, runs migrations and allocates sequential business identifiers

use anyhow::Context;
use chrono::NaiveDate;
use sea_orm::sea_query::{Condition, Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::entities::attendance::AttendanceStatus;
use crate::entities::leave_request::LeaveStatus;
use crate::entities::{attendance, employee, leave_request, user};
use crate::error::{AppError, Result};
use crate::types::{LeaveFilter, NewAttendance, NewEmployee, NewLeaveRequest};
use crate::window::DateRange;

pub struct Storage {
    pub db: DatabaseConnection,
    // Serializes "read highest suffix, insert next" so two writers never get the same id.
    sequence_lock: Mutex<()>,
}

/// Next identifier after the highest numeric suffix among `existing`, zero-padded to three digits.
///
/// Values that do not carry `prefix` or whose suffix is not numeric are ignored.
pub fn next_sequence_id<'a>(prefix: &str, existing: impl IntoIterator<Item = &'a str>) -> String {
    let highest = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{}{:03}", prefix, highest + 1)
}

const LIKE_ESCAPE: char = '\\';

/// Escapes LIKE wildcards so user input matches as a literal substring.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

impl Storage {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let db = Database::connect(database_url)
            .await
            .with_context(|| format!("failed to connect to {database_url}"))?;

        crate::migration::Migrator::up(&db, None)
            .await
            .context("failed to run migrations")?;

        Ok(Self::from_connection(db))
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            db,
            sequence_lock: Mutex::new(()),
        }
    }

    // Users

    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<user::Model> {
        let txn = self.db.begin().await?;

        if find_user(&txn, email).await?.is_some() {
            return Err(AppError::BadRequest("Email already registered!".to_string()));
        }

        let created = user::ActiveModel {
            email: Set(email.to_string()),
            password: Set(password_hash.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(created)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        Ok(find_user(&self.db, email).await?)
    }

    // Employees

    pub async fn list_employees(&self) -> Result<Vec<employee::Model>> {
        Ok(employee::Entity::find()
            .order_by_asc(employee::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn count_employees(&self) -> Result<u64> {
        Ok(employee::Entity::find().count(&self.db).await?)
    }

    pub async fn create_employee(&self, new: NewEmployee) -> Result<employee::Model> {
        let _sequence = self.sequence_lock.lock().await;
        let txn = self.db.begin().await?;

        let duplicate = employee::Entity::find()
            .filter(employee::Column::Email.eq(new.email.as_str()))
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Err(AppError::BadRequest("Email already exists".to_string()));
        }

        let existing: Vec<String> = employee::Entity::find()
            .select_only()
            .column(employee::Column::EmployeeId)
            .into_tuple()
            .all(&txn)
            .await?;
        let employee_id =
            next_sequence_id(employee::ID_PREFIX, existing.iter().map(String::as_str));

        let created = employee::ActiveModel {
            employee_id: Set(employee_id),
            name: Set(new.name),
            title: Set(new.title),
            email: Set(new.email),
            department: Set(new.department),
            location: Set(new.location),
            avatar: Set(Some(new.avatar)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        tracing::info!(employee_id = %created.employee_id, "employee added");
        Ok(created)
    }

    // Attendance

    pub async fn insert_attendance(&self, new: NewAttendance) -> Result<attendance::Model> {
        Ok(attendance::ActiveModel {
            employee_id: Set(new.employee_id),
            name: Set(new.name),
            department: Set(new.department),
            clock_in: Set(new.clock_in),
            clock_out: Set(new.clock_out),
            status: Set(new.status),
            date: Set(new.date),
            image: Set(new.image),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Rows dated inside `range`, ordered by date then id, capped at `limit` when given.
    pub async fn attendance_in_range(
        &self,
        range: DateRange,
        limit: Option<u64>,
    ) -> Result<Vec<attendance::Model>> {
        let mut query = attendance::Entity::find()
            .filter(attendance::Column::Date.between(range.start, range.end))
            .order_by_asc(attendance::Column::Date)
            .order_by_asc(attendance::Column::Id);
        if let Some(limit) = limit.filter(|l| *l > 0) {
            query = query.limit(limit);
        }
        Ok(query.all(&self.db).await?)
    }

    /// Row counts per (date, status) inside `range`.
    pub async fn attendance_counts_by_day(
        &self,
        range: DateRange,
    ) -> Result<HashMap<NaiveDate, HashMap<AttendanceStatus, u64>>> {
        let rows: Vec<(NaiveDate, AttendanceStatus, i64)> = attendance::Entity::find()
            .select_only()
            .column(attendance::Column::Date)
            .column(attendance::Column::Status)
            .column_as(Expr::col(attendance::Column::Id).count(), "count")
            .filter(attendance::Column::Date.between(range.start, range.end))
            .group_by(attendance::Column::Date)
            .group_by(attendance::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut by_day: HashMap<NaiveDate, HashMap<AttendanceStatus, u64>> = HashMap::new();
        for (date, status, count) in rows {
            by_day
                .entry(date)
                .or_default()
                .insert(status, count.max(0) as u64);
        }
        Ok(by_day)
    }

    /// Row counts per status across the whole of `range`.
    pub async fn attendance_counts(
        &self,
        range: DateRange,
    ) -> Result<HashMap<AttendanceStatus, u64>> {
        let rows: Vec<(AttendanceStatus, i64)> = attendance::Entity::find()
            .select_only()
            .column(attendance::Column::Status)
            .column_as(Expr::col(attendance::Column::Id).count(), "count")
            .filter(attendance::Column::Date.between(range.start, range.end))
            .group_by(attendance::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(status, count)| (status, count.max(0) as u64))
            .collect())
    }

    pub async fn update_attendance_status(
        &self,
        id: i32,
        status: AttendanceStatus,
    ) -> Result<attendance::Model> {
        let txn = self.db.begin().await?;
        let record = attendance::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("attendance record {id}")))?;

        let mut active: attendance::ActiveModel = record.into();
        active.status = Set(status);
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    pub async fn delete_attendance(&self, id: i32) -> Result<()> {
        let result = attendance::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("attendance record {id}")));
        }
        Ok(())
    }

    // Leave requests

    /// One page of requests matching `filter`, newest first, plus the total match count.
    pub async fn list_leave_requests(
        &self,
        filter: &LeaveFilter,
    ) -> Result<(Vec<leave_request::Model>, u64)> {
        let mut query = leave_request::Entity::find();

        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
            let matches = |column: leave_request::Column| {
                Expr::expr(Func::lower(Expr::col(column)))
                    .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE))
            };
            query = query.filter(
                Condition::any()
                    .add(matches(leave_request::Column::EmployeeName))
                    .add(matches(leave_request::Column::RequestId))
                    .add(matches(leave_request::Column::Department)),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(leave_request::Column::Status.eq(status));
        }

        let offset = filter.offset()?;
        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(leave_request::Column::CreatedAt)
            .order_by_desc(leave_request::Column::Id)
            .offset(offset)
            .limit(filter.per_page)
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    pub async fn create_leave_request(
        &self,
        new: NewLeaveRequest,
    ) -> Result<leave_request::Model> {
        let days = i32::try_from(new.days())
            .map_err(|_| AppError::BadRequest("Leave period is too long".to_string()))?;

        let _sequence = self.sequence_lock.lock().await;
        let txn = self.db.begin().await?;

        let existing: Vec<String> = leave_request::Entity::find()
            .select_only()
            .column(leave_request::Column::RequestId)
            .into_tuple()
            .all(&txn)
            .await?;
        let request_id =
            next_sequence_id(leave_request::ID_PREFIX, existing.iter().map(String::as_str));

        let created = leave_request::ActiveModel {
            request_id: Set(request_id),
            employee_name: Set(new.employee_name),
            department: Set(new.department),
            employee_image: Set(new.employee_image),
            leave_type: Set(new.leave_type),
            start_date: Set(new.start_date),
            end_date: Set(new.end_date),
            days: Set(days),
            status: Set(LeaveStatus::Pending),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        tracing::info!(request_id = %created.request_id, days, "leave request created");
        Ok(created)
    }

    pub async fn update_leave_status(
        &self,
        id: i32,
        status: LeaveStatus,
    ) -> Result<leave_request::Model> {
        let txn = self.db.begin().await?;
        let leave = leave_request::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("leave request {id}")))?;

        let mut active: leave_request::ActiveModel = leave.into();
        active.status = Set(status);
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Sum of `days` over approved requests lying entirely within `[from, to]`.
    pub async fn approved_leave_days(&self, from: NaiveDate, to: NaiveDate) -> Result<i64> {
        let total: Option<Option<i64>> = leave_request::Entity::find()
            .select_only()
            .column_as(Expr::col(leave_request::Column::Days).sum(), "total")
            .filter(leave_request::Column::Status.eq(LeaveStatus::Approved))
            .filter(leave_request::Column::StartDate.gte(from))
            .filter(leave_request::Column::EndDate.lte(to))
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(total.flatten().unwrap_or(0))
    }

    pub async fn count_leave_requests_with_status(&self, status: LeaveStatus) -> Result<u64> {
        Ok(leave_request::Entity::find()
            .filter(leave_request::Column::Status.eq(status))
            .count(&self.db)
            .await?)
    }
}

async fn find_user<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> std::result::Result<Option<user::Model>, sea_orm::DbErr> {
    user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(conn)
        .await
}
