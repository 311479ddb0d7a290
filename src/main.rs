// ABOUTME: Main entry point for the HR dashboard web service
// ABOUTME: Loads configuration, prepares the database and serves pages and JSON APIs

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tera::Tera;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod attendance;
mod auth;
mod config;
mod employees;
mod entities;
mod error;
mod extract;
mod leave;
mod middleware;
mod migration;
mod pages;
mod seed;
mod session;
mod storage;
mod types;
mod window;

#[cfg(test)]
mod integration_tests;

use config::Config;
use session::SessionStore;
use storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub sessions: SessionStore,
    pub config: Arc<Config>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<Storage>) -> anyhow::Result<Self> {
        let templates = pages::load_templates()?;
        Ok(Self {
            storage,
            sessions: SessionStore::new(config.session_ttl_seconds),
            config: Arc::new(config),
            templates: Arc::new(templates),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(pages::dashboard))
        .route("/attendance", get(pages::attendance))
        .route("/leave", get(pages::leave))
        .route("/directory", get(pages::directory))
        .route("/salary", get(pages::salary))
        .route(
            "/api/employees",
            get(employees::list_employees).post(employees::add_employee),
        )
        .route("/api/attendance", get(attendance::list_attendance))
        .route("/api/attendance/export", get(attendance::export_attendance))
        .route(
            "/api/attendance/:id",
            put(attendance::update_attendance).delete(attendance::delete_attendance),
        )
        .route("/api/attendance_stats", get(attendance::attendance_stats))
        .route(
            "/api/leave_requests",
            get(leave::list_leave_requests).post(leave::create_leave_request),
        )
        .route("/api/leave_requests/:id", put(leave::update_leave_request))
        .route("/api/leave_stats", get(leave::leave_stats))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ));

    Router::new()
        .route("/", get(pages::login_page))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/favicon.ico", get(pages::favicon))
        .merge(protected)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hr_dashboard=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(reference_date = %config.reference_date, "Starting HR dashboard");

    let storage = Arc::new(Storage::new(&config.database_url).await?);
    if config.seed_data {
        seed::run(&storage.db, config.reference_date).await?;
    }

    let addr = config.bind_address();
    let app = build_router(AppState::new(config, storage)?);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("HR dashboard listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
