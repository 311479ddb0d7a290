// ABOUTME: Initial migration creating users, employees, attendance and leave_requests tables
// ABOUTME: Attendance references employees by value, so no foreign keys are declared

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string_len(120).not_null().unique_key())
                    .col(ColumnDef::new(Users::Password).string_len(255).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Employees::EmployeeId)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Employees::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Employees::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Employees::Email).string_len(120).not_null())
                    .col(ColumnDef::new(Employees::Department).string_len(50).not_null())
                    .col(ColumnDef::new(Employees::Location).string_len(50).not_null())
                    .col(ColumnDef::new(Employees::Avatar).string_len(255))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::EmployeeId).string_len(10).not_null())
                    .col(ColumnDef::new(Attendance::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Attendance::Department).string_len(50).not_null())
                    .col(ColumnDef::new(Attendance::ClockIn).string_len(10))
                    .col(ColumnDef::new(Attendance::ClockOut).string_len(10))
                    .col(ColumnDef::new(Attendance::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Attendance::Date).date().not_null())
                    .col(ColumnDef::new(Attendance::Image).string_len(255))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_date_status")
                    .table(Attendance::Table)
                    .col(Attendance::Date)
                    .col(Attendance::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LeaveRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeaveRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LeaveRequests::RequestId)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LeaveRequests::EmployeeName).string_len(100).not_null())
                    .col(ColumnDef::new(LeaveRequests::Department).string_len(50).not_null())
                    .col(ColumnDef::new(LeaveRequests::EmployeeImage).string_len(255))
                    .col(ColumnDef::new(LeaveRequests::LeaveType).string_len(50).not_null())
                    .col(ColumnDef::new(LeaveRequests::StartDate).date().not_null())
                    .col(ColumnDef::new(LeaveRequests::EndDate).date().not_null())
                    .col(ColumnDef::new(LeaveRequests::Days).integer().not_null())
                    .col(
                        ColumnDef::new(LeaveRequests::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(LeaveRequests::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LeaveRequests::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Password,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    EmployeeId,
    Name,
    Title,
    Email,
    Department,
    Location,
    Avatar,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    EmployeeId,
    Name,
    Department,
    ClockIn,
    ClockOut,
    Status,
    Date,
    Image,
}

#[derive(DeriveIden)]
enum LeaveRequests {
    Table,
    Id,
    RequestId,
    EmployeeName,
    Department,
    EmployeeImage,
    LeaveType,
    StartDate,
    EndDate,
    Days,
    Status,
    CreatedAt,
}
