// ABOUTME: Runtime configuration loaded from environment variables
// ABOUTME: Covers the listener, database, session lifetime and the fixed reporting anchors

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use std::str::FromStr;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SeaORM connection URL (env: DATABASE_URL)
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Mark the session cookie `Secure` (env: SECURE_COOKIES)
    pub secure_cookies: bool,
    /// Sliding session lifetime in seconds (env: SESSION_TTL_SECONDS)
    pub session_ttl_seconds: i64,
    /// Day every attendance filter window is anchored at (env: REFERENCE_DATE, YYYY-MM-DD)
    pub reference_date: NaiveDate,
    /// Headcount used for the annual leave pool (env: LEAVE_POOL_EMPLOYEES)
    pub leave_pool_employees: i64,
    /// Yearly leave entitlement per employee (env: LEAVE_DAYS_PER_EMPLOYEE)
    pub leave_days_per_employee: i64,
    /// Insert fixture rows into empty tables at startup (env: SEED_DATA)
    pub seed_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:hr_dashboard.db?mode=rwc".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            secure_cookies: false,
            session_ttl_seconds: 30 * 60,
            reference_date: default_reference_date(),
            leave_pool_employees: 12,
            leave_days_per_employee: 20,
            seed_data: true,
        }
    }
}

fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 30).unwrap_or_default()
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        _ => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let reference_date = match std::env::var("REFERENCE_DATE") {
            Ok(raw) if !raw.trim().is_empty() => {
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .with_context(|| format!("REFERENCE_DATE must be YYYY-MM-DD, got {raw}"))?
            }
            _ => defaults.reference_date,
        };

        let config = Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port)?,
            secure_cookies: env_or("SECURE_COOKIES", defaults.secure_cookies)?,
            session_ttl_seconds: env_or("SESSION_TTL_SECONDS", defaults.session_ttl_seconds)?,
            reference_date,
            leave_pool_employees: env_or("LEAVE_POOL_EMPLOYEES", defaults.leave_pool_employees)?,
            leave_days_per_employee: env_or(
                "LEAVE_DAYS_PER_EMPLOYEE",
                defaults.leave_days_per_employee,
            )?,
            seed_data: env_or("SEED_DATA", defaults.seed_data)?,
        };

        if config.session_ttl_seconds <= 0 {
            anyhow::bail!("SESSION_TTL_SECONDS must be positive");
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Calendar year whose approved leave counts against the pool.
    pub fn leave_year(&self) -> i32 {
        self.reference_date.year()
    }

    pub fn total_leave_pool(&self) -> i64 {
        self.leave_pool_employees * self.leave_days_per_employee
    }
}
