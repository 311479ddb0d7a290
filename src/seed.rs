// ABOUTME: Idempotent fixture seeding for employees, attendance and leave requests
// ABOUTME: Each table is filled only when it is empty, inside its own transaction

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue::NotSet, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
    TransactionTrait,
};

use crate::entities::attendance::AttendanceStatus;
use crate::entities::leave_request::LeaveStatus;
use crate::entities::{attendance, employee, leave_request};
use crate::error::{AppError, Result};

const THUMBNAIL: &str = "https://via.placeholder.com/32";

// (name, title, email, department, location)
const EMPLOYEES: [(&str, &str, &str, &str, &str); 12] = [
    ("Aarav Sharma", "Software Engineer", "aarav.sharma@company.in", "IT", "Bengaluru"),
    ("Priya Patel", "Product Manager", "priya.patel@company.in", "Product Management", "Mumbai"),
    ("Rohan Gupta", "HR Specialist", "rohan.gupta@company.in", "Human Resources", "Delhi"),
    ("Ananya Reddy", "Marketing Specialist", "ananya.reddy@company.in", "Marketing", "Hyderabad"),
    ("Vikram Singh", "Data Analyst", "vikram.singh@company.in", "Analytics", "Pune"),
    ("Sneha Nair", "Financial Analyst", "sneha.nair@company.in", "Finance", "Chennai"),
    ("Rahul Verma", "DevOps Engineer", "rahul.verma@company.in", "IT", "Bengaluru"),
    ("Meena Kumari", "Business Analyst", "meena.kumari@company.in", "Operations", "Ahmedabad"),
    ("Amit Joshi", "Sales Manager", "amit.joshi@company.in", "Sales", "Kolkata"),
    ("Riya Malhotra", "Customer Support Lead", "riya.malhotra@company.in", "Customer Service", "Gurugram"),
    ("Karan Mehra", "Project Coordinator", "karan.mehra@company.in", "Project Management", "Noida"),
    ("Pooja Desai", "Content Writer", "pooja.desai@company.in", "Marketing", "Jaipur"),
];

// (employee, department, leave type, start, end, status)
type LeaveFixture = (&'static str, &'static str, &'static str, (i32, u32, u32), (i32, u32, u32), LeaveStatus);

const LEAVE_REQUESTS: [LeaveFixture; 16] = [
    ("Aarav Sharma", "IT", "Diwali Leave", (2025, 11, 12), (2025, 11, 15), LeaveStatus::Pending),
    ("Priya Patel", "Product Management", "Personal Leave", (2025, 4, 28), (2025, 4, 30), LeaveStatus::Approved),
    ("Rohan Gupta", "Human Resources", "Holi Leave", (2025, 3, 17), (2025, 3, 18), LeaveStatus::Pending),
    ("Ananya Reddy", "Marketing", "Sick Leave", (2025, 5, 10), (2025, 5, 12), LeaveStatus::Approved),
    ("Vikram Singh", "Analytics", "Republic Day", (2025, 1, 25), (2025, 1, 26), LeaveStatus::Rejected),
    ("Sneha Nair", "Finance", "Annual Leave", (2025, 6, 15), (2025, 6, 20), LeaveStatus::Approved),
    ("Rahul Verma", "IT", "Personal Leave", (2025, 7, 1), (2025, 7, 2), LeaveStatus::Pending),
    ("Meena Kumari", "Operations", "Sick Leave", (2025, 2, 10), (2025, 2, 11), LeaveStatus::Approved),
    ("Amit Joshi", "Sales", "Raksha Bandhan", (2025, 8, 9), (2025, 8, 10), LeaveStatus::Rejected),
    ("Riya Malhotra", "Customer Service", "Casual Leave", (2025, 9, 5), (2025, 9, 6), LeaveStatus::Approved),
    ("Karan Mehra", "Project Management", "Diwali Leave", (2025, 11, 13), (2025, 11, 14), LeaveStatus::Pending),
    ("Pooja Desai", "Marketing", "Holi Leave", (2025, 3, 17), (2025, 3, 17), LeaveStatus::Approved),
    ("Aarav Sharma", "IT", "Casual Leave", (2025, 10, 10), (2025, 10, 11), LeaveStatus::Rejected),
    ("Priya Patel", "Product Management", "Annual Leave", (2025, 12, 20), (2025, 12, 21), LeaveStatus::Pending),
    ("Rohan Gupta", "Human Resources", "Sick Leave", (2025, 4, 15), (2025, 4, 16), LeaveStatus::Approved),
    ("Ananya Reddy", "Marketing", "Ganesh Chaturthi", (2025, 8, 27), (2025, 8, 28), LeaveStatus::Approved),
];

fn date((year, month, day): (i32, u32, u32)) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| AppError::Internal(format!("invalid fixture date {year}-{month}-{day}")))
}

/// Status cycle for the seeded attendance day: present, late, leave, remote, ...
pub fn seeded_status(index: usize) -> AttendanceStatus {
    AttendanceStatus::ALL[index % AttendanceStatus::ALL.len()]
}

fn seeded_clock(status: AttendanceStatus) -> (Option<String>, Option<String>) {
    match status {
        AttendanceStatus::Present => (Some("09:00".to_string()), Some("17:30".to_string())),
        AttendanceStatus::Late => (Some("09:45".to_string()), Some("17:30".to_string())),
        AttendanceStatus::Leave | AttendanceStatus::Remote => (None, None),
    }
}

/// Seeds every empty table; `attendance_date` is the day the attendance rows are written for.
pub async fn run(db: &DatabaseConnection, attendance_date: NaiveDate) -> Result<()> {
    seed_employees(db).await?;
    seed_attendance(db, attendance_date).await?;
    seed_leave_requests(db).await?;
    Ok(())
}

async fn seed_employees(db: &DatabaseConnection) -> Result<()> {
    if employee::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let rows = EMPLOYEES
        .iter()
        .enumerate()
        .map(|(i, (name, title, email, department, location))| employee::ActiveModel {
            id: NotSet,
            employee_id: Set(format!("{}{:03}", employee::ID_PREFIX, i + 1)),
            name: Set(name.to_string()),
            title: Set(title.to_string()),
            email: Set(email.to_string()),
            department: Set(department.to_string()),
            location: Set(location.to_string()),
            avatar: Set(Some(employee::DEFAULT_AVATAR.to_string())),
        });

    let txn = db.begin().await?;
    employee::Entity::insert_many(rows).exec(&txn).await?;
    txn.commit().await?;
    tracing::info!(count = EMPLOYEES.len(), "Employee data seeded successfully");
    Ok(())
}

async fn seed_attendance(db: &DatabaseConnection, day: NaiveDate) -> Result<()> {
    if attendance::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let employees = employee::Entity::find()
        .order_by_asc(employee::Column::Id)
        .all(db)
        .await?;
    if employees.is_empty() {
        return Ok(());
    }

    let rows = employees.into_iter().map(|emp| {
        let index = emp
            .employee_id
            .strip_prefix(employee::ID_PREFIX)
            .and_then(|suffix| suffix.parse::<usize>().ok())
            .map(|n| n.saturating_sub(1))
            .unwrap_or(0);
        let status = seeded_status(index);
        let (clock_in, clock_out) = seeded_clock(status);
        attendance::ActiveModel {
            id: NotSet,
            employee_id: Set(emp.employee_id),
            name: Set(emp.name),
            department: Set(emp.department),
            clock_in: Set(clock_in),
            clock_out: Set(clock_out),
            status: Set(status),
            date: Set(day),
            image: Set(Some(THUMBNAIL.to_string())),
        }
    });

    let txn = db.begin().await?;
    attendance::Entity::insert_many(rows).exec(&txn).await?;
    txn.commit().await?;
    tracing::info!("Attendance data seeded successfully");
    Ok(())
}

async fn seed_leave_requests(db: &DatabaseConnection) -> Result<()> {
    if leave_request::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let created_at = chrono::Utc::now().naive_utc();
    let mut rows = Vec::with_capacity(LEAVE_REQUESTS.len());
    for (i, (name, department, leave_type, start, end, status)) in LEAVE_REQUESTS.iter().enumerate() {
        let start_date = date(*start)?;
        let end_date = date(*end)?;
        rows.push(leave_request::ActiveModel {
            id: NotSet,
            request_id: Set(format!("{}{:03}", leave_request::ID_PREFIX, i + 1)),
            employee_name: Set(name.to_string()),
            department: Set(department.to_string()),
            employee_image: Set(Some(THUMBNAIL.to_string())),
            leave_type: Set(leave_type.to_string()),
            start_date: Set(start_date),
            end_date: Set(end_date),
            days: Set(((end_date - start_date).num_days() + 1) as i32),
            status: Set(*status),
            created_at: Set(created_at),
        });
    }

    let txn = db.begin().await?;
    leave_request::Entity::insert_many(rows).exec(&txn).await?;
    txn.commit().await?;
    tracing::info!(count = LEAVE_REQUESTS.len(), "Leave request data seeded successfully");
    Ok(())
}
