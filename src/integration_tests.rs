// ABOUTME: Integration tests for the HTTP surface
// ABOUTME: Drives the full router, session guard included, with axum-test

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::entities::attendance::AttendanceStatus;
    use crate::types::{CredentialsForm, NewAttendance};
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    struct TestApp {
        server: TestServer,
        storage: Arc<Storage>,
        _temp_dir: TempDir,
    }

    async fn create_test_app(seed_data: bool) -> TestApp {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            database_url: format!("sqlite:{}?mode=rwc", db_path.display()),
            seed_data,
            ..Config::default()
        };

        let storage = Arc::new(Storage::new(&config.database_url).await.unwrap());
        if config.seed_data {
            seed::run(&storage.db, config.reference_date).await.unwrap();
        }

        let state = AppState::new(config, storage.clone()).unwrap();
        let server = TestServer::new(build_router(state)).unwrap();

        TestApp {
            server,
            storage,
            _temp_dir: temp_dir,
        }
    }

    fn credentials(email: &str, password: &str) -> CredentialsForm {
        CredentialsForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    /// Signs up and logs in, returning the session cookie.
    async fn login(server: &TestServer) -> Cookie<'static> {
        let form = credentials("admin@company.in", "correct horse battery");
        server.post("/signup").form(&form).await;

        let response = server.post("/login").form(&form).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/dashboard");
        response.cookie(session::SESSION_COOKIE_NAME)
    }

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()
    }

    #[tokio::test]
    async fn test_login_page_loads() {
        let app = create_test_app(false).await;

        let response = app.server.get("/").await;
        response.assert_status_ok();
        assert!(response.text().contains("Sign in"));
        assert_eq!(response.header("x-frame-options"), "DENY");
        assert_eq!(response.header("x-content-type-options"), "nosniff");
    }

    #[tokio::test]
    async fn test_signup_then_login_establishes_session() {
        let app = create_test_app(false).await;
        let cookie = login(&app.server).await;

        let cookie_line = cookie.to_string();
        assert!(cookie_line.contains("HttpOnly"));
        assert!(cookie_line.contains("SameSite=Lax"));
        assert!(cookie_line.contains("Max-Age=1800"));

        let response = app.server.get("/dashboard").add_cookie(cookie).await;
        response.assert_status_ok();
        assert!(response.text().contains("admin@company.in"));
    }

    #[tokio::test]
    async fn test_signup_success_and_duplicate() {
        let app = create_test_app(false).await;
        let form = credentials("new@company.in", "pw123456");

        let first = app.server.post("/signup").form(&form).await;
        first.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(first.header("location"), "/");
        assert!(first.cookie(session::FLASH_COOKIE_NAME).value().starts_with("success"));

        let second = app.server.post("/signup").form(&form).await;
        second.assert_status(StatusCode::SEE_OTHER);
        let flash = second.cookie(session::FLASH_COOKIE_NAME);
        assert!(flash.value().starts_with("error"));
        assert!(flash.value().contains("already"));
    }

    #[tokio::test]
    async fn test_invalid_credentials_share_one_message() {
        let app = create_test_app(false).await;
        app.server
            .post("/signup")
            .form(&credentials("real@company.in", "right-password"))
            .await;

        let wrong_password = app
            .server
            .post("/login")
            .form(&credentials("real@company.in", "wrong-password"))
            .await;
        let unknown_email = app
            .server
            .post("/login")
            .form(&credentials("ghost@company.in", "right-password"))
            .await;

        for response in [wrong_password, unknown_email] {
            response.assert_status(StatusCode::SEE_OTHER);
            assert_eq!(response.header("location"), "/");
            let flash = response.cookie(session::FLASH_COOKIE_NAME);
            assert!(flash.value().starts_with("error"));
            assert!(flash.value().contains("Invalid"));
        }
    }

    #[tokio::test]
    async fn test_flash_is_shown_once_on_login_page() {
        let app = create_test_app(false).await;
        let flash = Cookie::new(session::FLASH_COOKIE_NAME, "error:Please%20log%20in%20first%21");

        let response = app.server.get("/").add_cookie(flash).await;
        response.assert_status_ok();
        assert!(response.text().contains("Please log in first!"));
        assert_eq!(response.cookie(session::FLASH_COOKIE_NAME).value(), "");
    }

    #[tokio::test]
    async fn test_guard_on_api_and_pages() {
        let app = create_test_app(true).await;

        let api = app.server.get("/api/employees").await;
        api.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = api.json();
        assert_eq!(body["status"], 401);

        for page in ["/dashboard", "/attendance", "/leave", "/directory", "/salary"] {
            let response = app.server.get(page).await;
            response.assert_status(StatusCode::SEE_OTHER);
            assert_eq!(response.header("location"), "/");
        }

        let forged = Cookie::new(session::SESSION_COOKIE_NAME, "not-a-session");
        app.server
            .get("/api/leave_stats")
            .add_cookie(forged)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_cookie_is_refreshed() {
        let app = create_test_app(true).await;
        let cookie = login(&app.server).await;

        let response = app.server.get("/api/leave_stats").add_cookie(cookie.clone()).await;
        response.assert_status_ok();
        let refreshed = response.cookie(session::SESSION_COOKIE_NAME);
        assert_eq!(refreshed.value(), cookie.value());
        assert_eq!(refreshed.max_age(), Some(time::Duration::seconds(1800)));
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = create_test_app(true).await;
        let cookie = login(&app.server).await;

        let response = app.server.get("/logout").add_cookie(cookie.clone()).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/");

        app.server
            .get("/api/employees")
            .add_cookie(cookie)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_employee_directory() {
        let app = create_test_app(true).await;
        let cookie = login(&app.server).await;

        let list = app.server.get("/api/employees").add_cookie(cookie.clone()).await;
        list.assert_status_ok();
        let employees: Vec<Value> = list.json();
        assert_eq!(employees.len(), 12);
        assert_eq!(employees[0]["employee_id"], "EMP001");
        assert_eq!(employees[11]["name"], "Pooja Desai");

        let created = app
            .server
            .post("/api/employees")
            .add_cookie(cookie.clone())
            .json(&json!({
                "name": "Ishaan Kapoor",
                "title": "QA Engineer",
                "email": "ishaan.kapoor@company.in",
                "department": "IT",
                "location": "Pune"
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let body: Value = created.json();
        assert_eq!(body["employee_id"], "EMP013");

        let duplicate = app
            .server
            .post("/api/employees")
            .add_cookie(cookie.clone())
            .json(&json!({
                "name": "Someone Else",
                "title": "QA Engineer",
                "email": "ishaan.kapoor@company.in",
                "department": "IT",
                "location": "Pune"
            }))
            .await;
        duplicate.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(duplicate.json::<Value>()["error"], "Email already exists");

        let missing = app
            .server
            .post("/api/employees")
            .add_cookie(cookie)
            .json(&json!({ "name": "Half Filled" }))
            .await;
        missing.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(missing.json::<Value>()["error"], "Missing required fields");
    }

    #[tokio::test]
    async fn test_attendance_listing() {
        let app = create_test_app(true).await;
        let cookie = login(&app.server).await;

        let today = app.server.get("/api/attendance").add_cookie(cookie.clone()).await;
        today.assert_status_ok();
        let body: Value = today.json();
        assert_eq!(body["dates"], json!(["30-04-2025"]));
        // EMP001, EMP005 and EMP009 are present out of twelve rows
        assert_eq!(body["percentages"], json!([25.0]));
        assert_eq!(body["records"].as_array().unwrap().len(), 12);
        assert_eq!(body["records"][1]["status"], "Late");
        assert_eq!(body["records"][0]["date"], "30-04-2025");

        let week = app
            .server
            .get("/api/attendance?filter=week&limit=5")
            .add_cookie(cookie.clone())
            .await;
        week.assert_status_ok();
        let body: Value = week.json();
        assert_eq!(body["dates"].as_array().unwrap().len(), 7);
        assert_eq!(body["dates"][0], "24-04-2025");
        assert_eq!(body["percentages"], json!([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 25.0]));
        assert_eq!(body["records"].as_array().unwrap().len(), 5);

        let month: Value = app
            .server
            .get("/api/attendance?filter=month")
            .add_cookie(cookie.clone())
            .await
            .json();
        assert_eq!(month["percentages"].as_array().unwrap().len(), 30);

        let bad = app
            .server
            .get("/api/attendance?filter=year")
            .add_cookie(cookie)
            .await;
        bad.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(bad.json::<Value>()["error"], "Invalid filter type");
    }

    #[tokio::test]
    async fn test_attendance_update_and_delete() {
        let app = create_test_app(true).await;
        let cookie = login(&app.server).await;

        app.server
            .put("/api/attendance/1")
            .add_cookie(cookie.clone())
            .json(&json!({ "status": "remote" }))
            .await
            .assert_status_ok();

        let records: Value = app.server.get("/api/attendance").add_cookie(cookie.clone()).await.json();
        assert_eq!(records["records"][0]["status"], "Remote");

        app.server
            .put("/api/attendance/1")
            .add_cookie(cookie.clone())
            .json(&json!({ "status": "sick" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        app.server
            .put("/api/attendance/999")
            .add_cookie(cookie.clone())
            .json(&json!({ "status": "late" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        app.server
            .delete("/api/attendance/2")
            .add_cookie(cookie.clone())
            .await
            .assert_status_ok();
        app.server
            .delete("/api/attendance/2")
            .add_cookie(cookie)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_attendance_export() {
        let app = create_test_app(true).await;
        let cookie = login(&app.server).await;

        let response = app
            .server
            .get("/api/attendance/export?filter=today")
            .add_cookie(cookie.clone())
            .await;
        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "text/csv");
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=attendance_today_2025-04-30.csv"
        );

        let text = response.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "Employee ID,Name,Department,Date,Status,Clock In,Clock Out");
        assert_eq!(lines[1], "EMP001,Aarav Sharma,IT,30-04-2025,Present,09:00,17:30");
        assert_eq!(lines[3], "EMP003,Rohan Gupta,Human Resources,30-04-2025,Leave,--:--,--:--");

        app.server
            .get("/api/attendance/export?filter=decade")
            .add_cookie(cookie)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_attendance_stats_present_and_leave() {
        let app = create_test_app(false).await;
        let cookie = login(&app.server).await;

        for (employee_id, status) in [
            ("EMP001", AttendanceStatus::Present),
            ("EMP002", AttendanceStatus::Leave),
        ] {
            app.storage
                .insert_attendance(NewAttendance {
                    employee_id: employee_id.to_string(),
                    name: "Someone".to_string(),
                    department: "IT".to_string(),
                    clock_in: None,
                    clock_out: None,
                    status,
                    date: reference(),
                    image: None,
                })
                .await
                .unwrap();
        }

        let response = app
            .server
            .get("/api/attendance_stats?filter=today")
            .add_cookie(cookie)
            .await;
        response.assert_status_ok();
        let stats: Value = response.json();
        assert_eq!(stats["present"], json!({ "count": 1, "total": 2, "percentage": 50.0 }));
        assert_eq!(stats["leave"], json!({ "count": 1, "percentage": 50.0 }));
        assert_eq!(stats["late"], json!({ "count": 0, "percentage": 0.0 }));
        assert_eq!(stats["remote"], json!({ "count": 0, "percentage": 0.0 }));
        assert_eq!(stats["total_employees"], 0);
    }

    #[tokio::test]
    async fn test_leave_listing() {
        let app = create_test_app(true).await;
        let cookie = login(&app.server).await;

        let response = app.server.get("/api/leave_requests").add_cookie(cookie.clone()).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["total"], 16);
        assert_eq!(body["page"], 1);
        assert_eq!(body["per_page"], 10);
        assert_eq!(body["requests"].as_array().unwrap().len(), 10);

        let filtered: Value = app
            .server
            .get("/api/leave_requests?search=priya&status=approved")
            .add_cookie(cookie.clone())
            .await
            .json();
        assert_eq!(filtered["total"], 1);
        let request = &filtered["requests"][0];
        assert_eq!(request["request_id"], "LR002");
        assert_eq!(request["employee"]["name"], "Priya Patel");
        assert_eq!(request["from"], "28-04-2025");
        assert_eq!(request["to"], "30-04-2025");
        assert_eq!(request["days"], 3);
        assert_eq!(request["status"], "approved");

        let paged: Value = app
            .server
            .get("/api/leave_requests?status=all&page=4&per_page=5")
            .add_cookie(cookie.clone())
            .await
            .json();
        assert_eq!(paged["requests"].as_array().unwrap().len(), 1);

        app.server
            .get("/api/leave_requests?status=cancelled")
            .add_cookie(cookie)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_leave_creation_and_approval() {
        let app = create_test_app(true).await;
        let cookie = login(&app.server).await;

        let created = app
            .server
            .post("/api/leave_requests")
            .add_cookie(cookie.clone())
            .json(&json!({
                "employee_name": "Pooja Desai",
                "department": "Marketing",
                "leave_type": "Casual Leave",
                "start_date": "2025-10-01",
                "end_date": "2025-10-03"
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        assert_eq!(created.json::<Value>()["request_id"], "LR017");

        let reversed = app
            .server
            .post("/api/leave_requests")
            .add_cookie(cookie.clone())
            .json(&json!({
                "employee_name": "Pooja Desai",
                "department": "Marketing",
                "leave_type": "Casual Leave",
                "start_date": "2025-10-05",
                "end_date": "2025-10-03"
            }))
            .await;
        reversed.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(reversed.json::<Value>()["error"], "Start date must be before end date");

        app.server
            .post("/api/leave_requests")
            .add_cookie(cookie.clone())
            .json(&json!({ "employee_name": "Pooja Desai" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let stats_before: Value = app.server.get("/api/leave_stats").add_cookie(cookie.clone()).await.json();
        assert_eq!(stats_before["pending_requests"], 6);

        app.server
            .put("/api/leave_requests/17")
            .add_cookie(cookie.clone())
            .json(&json!({ "status": "approved" }))
            .await
            .assert_status_ok();

        app.server
            .put("/api/leave_requests/17")
            .add_cookie(cookie.clone())
            .json(&json!({ "status": "maybe" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        app.server
            .put("/api/leave_requests/999")
            .add_cookie(cookie.clone())
            .json(&json!({ "status": "rejected" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let stats_after: Value = app.server.get("/api/leave_stats").add_cookie(cookie).await.json();
        assert_eq!(stats_after["leaves_taken"], 24);
        assert_eq!(stats_after["pending_requests"], 5);
        assert_eq!(stats_after["remaining_leaves"], 216);
    }

    #[tokio::test]
    async fn test_leave_stats() {
        let seeded = create_test_app(true).await;
        let cookie = login(&seeded.server).await;
        let stats: Value = seeded.server.get("/api/leave_stats").add_cookie(cookie).await.json();
        assert_eq!(
            stats,
            json!({
                "total_leaves": 240,
                "leaves_taken": 21,
                "pending_requests": 5,
                "remaining_leaves": 219
            })
        );

        let empty = create_test_app(false).await;
        let cookie = login(&empty.server).await;
        let stats: Value = empty.server.get("/api/leave_stats").add_cookie(cookie).await.json();
        assert_eq!(stats["remaining_leaves"], 240);
        assert_eq!(stats["leaves_taken"], 0);
    }

    #[tokio::test]
    async fn test_leave_page_past_range() {
        let app = create_test_app(true).await;
        let cookie = login(&app.server).await;

        let far: Value = app
            .server
            .get("/api/leave_requests?page=100000000000000000")
            .add_cookie(cookie.clone())
            .await
            .json();
        assert_eq!(far["total"], 16);
        assert_eq!(far["requests"], json!([]));

        let response = app
            .server
            .get("/api/leave_requests?page=18446744073709551615")
            .add_cookie(cookie)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Page out of range");
        assert_eq!(body["status"], 400);
    }

    fn assert_json_bad_request(response: &axum_test::TestResponse) {
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["status"], 400);
        assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));
    }

    #[tokio::test]
    async fn test_malformed_input_gets_json_errors() {
        let app = create_test_app(true).await;
        let cookie = login(&app.server).await;

        let wrong_type = app
            .server
            .post("/api/employees")
            .add_cookie(cookie.clone())
            .json(&json!({
                "name": 5,
                "title": "QA Engineer",
                "email": "five@company.in",
                "department": "IT",
                "location": "Pune"
            }))
            .await;
        assert_json_bad_request(&wrong_type);

        let plain_text = app
            .server
            .put("/api/attendance/1")
            .add_cookie(cookie.clone())
            .text("status=late")
            .await;
        assert_json_bad_request(&plain_text);

        let broken_json = app
            .server
            .post("/api/leave_requests")
            .add_cookie(cookie.clone())
            .content_type("application/json")
            .bytes("{\"employee_name\": ".into())
            .await;
        assert_json_bad_request(&broken_json);

        let bad_limit = app
            .server
            .get("/api/attendance?limit=abc")
            .add_cookie(cookie.clone())
            .await;
        assert_json_bad_request(&bad_limit);

        let bad_page = app
            .server
            .get("/api/leave_requests?page=-1")
            .add_cookie(cookie.clone())
            .await;
        assert_json_bad_request(&bad_page);

        let bad_id = app
            .server
            .delete("/api/attendance/abc")
            .add_cookie(cookie)
            .await;
        assert_json_bad_request(&bad_id);
    }

    #[tokio::test]
    async fn test_favicon_is_empty() {
        let app = create_test_app(false).await;
        app.server
            .get("/favicon.ico")
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }
}
