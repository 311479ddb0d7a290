// ABOUTME: Server-rendered pages: the login screen and the signed-in dashboard sections
// ABOUTME: Templates are compiled into the binary and rendered with tera

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::Html,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::session;
use crate::AppState;

pub fn load_templates() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../templates/base.html")),
        ("login.html", include_str!("../templates/login.html")),
        ("page.html", include_str!("../templates/page.html")),
    ])?;
    Ok(tera)
}

#[derive(Serialize)]
struct DataSource {
    label: &'static str,
    url: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Attendance,
    Leave,
    Directory,
    Salary,
}

impl Section {
    fn heading(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Attendance => "Attendance",
            Section::Leave => "Leave Management",
            Section::Directory => "Employee Directory",
            Section::Salary => "Salary",
        }
    }

    fn sources(&self) -> Vec<DataSource> {
        match self {
            Section::Dashboard => vec![
                DataSource { label: "Attendance today", url: "/api/attendance_stats?filter=today" },
                DataSource { label: "Leave balance", url: "/api/leave_stats" },
            ],
            Section::Attendance => vec![
                DataSource { label: "This week", url: "/api/attendance?filter=week" },
                DataSource { label: "Statistics", url: "/api/attendance_stats?filter=week" },
            ],
            Section::Leave => vec![
                DataSource { label: "Requests", url: "/api/leave_requests" },
                DataSource { label: "Statistics", url: "/api/leave_stats" },
            ],
            Section::Directory => vec![DataSource { label: "Employees", url: "/api/employees" }],
            Section::Salary => vec![],
        }
    }
}

fn render_section(state: &AppState, user: &CurrentUser, section: Section) -> Result<Html<String>> {
    let mut context = Context::new();
    context.insert("heading", section.heading());
    context.insert("user_email", user.email());
    context.insert("sources", &section.sources());
    Ok(Html(state.templates.render("page.html", &context)?))
}

pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>)> {
    let (jar, flash) = session::take_flash(jar);
    let mut context = Context::new();
    context.insert("flash", &flash);
    let body = state.templates.render("login.html", &context)?;
    Ok((jar, Html(body)))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>> {
    render_section(&state, &user, Section::Dashboard)
}

pub async fn attendance(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>> {
    render_section(&state, &user, Section::Attendance)
}

pub async fn leave(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>> {
    render_section(&state, &user, Section::Leave)
}

pub async fn directory(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>> {
    render_section(&state, &user, Section::Directory)
}

pub async fn salary(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>> {
    render_section(&state, &user, Section::Salary)
}

pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
