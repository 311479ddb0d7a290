// ABOUTME: SeaORM entities module for the HR dashboard tables
// ABOUTME: Exports users, employees, attendance and leave request models

pub mod attendance;
pub mod employee;
pub mod leave_request;
pub mod user;
