// ABOUTME: Server-side session store with HttpOnly cookies and sliding expiry
// ABOUTME: Also carries one-shot flash messages for the login page across redirects

use crate::error::{AppError, Result};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

pub const SESSION_COOKIE_NAME: &str = "hr_session";
pub const FLASH_COOKIE_NAME: &str = "hr_flash";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub email: String,
    pub created_at: i64,
    pub last_seen: i64,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    ttl_seconds: i64,
}

impl SessionStore {
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    pub fn create_session(&self, email: String) -> String {
        self.cleanup_expired_sessions();

        let session_id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();
        let session_data = SessionData {
            email,
            created_at: now,
            last_seen: now,
        };

        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(session_id.clone(), session_data);
        }

        session_id
    }

    /// Returns the live session and pushes its expiry forward; expired sessions are dropped.
    pub fn touch_session(&self, session_id: &str) -> Option<SessionData> {
        self.touch_session_at(session_id, chrono::Utc::now().timestamp())
    }

    fn touch_session_at(&self, session_id: &str, now: i64) -> Option<SessionData> {
        let mut sessions = self.sessions.write().ok()?;
        let expired = match sessions.get_mut(session_id) {
            None => return None,
            Some(session) if now - session.last_seen > self.ttl_seconds => true,
            Some(session) => {
                session.last_seen = now;
                return Some(session.clone());
            }
        };
        if expired {
            sessions.remove(session_id);
        }
        None
    }

    pub fn remove_session(&self, session_id: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(session_id);
        }
    }

    pub fn cleanup_expired_sessions(&self) {
        let cutoff = chrono::Utc::now().timestamp() - self.ttl_seconds;

        if let Ok(mut sessions) = self.sessions.write() {
            sessions.retain(|_, session| session.last_seen >= cutoff);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }
}

pub fn create_session_cookie(session_id: String, ttl_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl_seconds))
        .path("/")
        .build()
}

pub fn create_logout_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(0))
        .path("/")
        .build()
}

pub fn extract_session_from_jar(
    jar: &CookieJar,
    session_store: &SessionStore,
) -> Result<(String, SessionData)> {
    let session_cookie = jar
        .get(SESSION_COOKIE_NAME)
        .ok_or_else(|| AppError::Unauthorized("No session cookie found".to_string()))?;

    let session_id = session_cookie.value().to_string();
    let session_data = session_store
        .touch_session(&session_id)
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))?;

    Ok((session_id, session_data))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    fn encode(&self) -> String {
        let kind = match self.kind {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        };
        format!("{}:{}", kind, urlencoding::encode(&self.message))
    }

    fn decode(raw: &str) -> Option<Self> {
        let (kind, message) = raw.split_once(':')?;
        let kind = match kind {
            "success" => FlashKind::Success,
            "error" => FlashKind::Error,
            _ => return None,
        };
        let message = urlencoding::decode(message).ok()?.into_owned();
        Some(Self { kind, message })
    }
}

pub fn set_flash(jar: CookieJar, flash: Flash) -> CookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE_NAME, flash.encode()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(60))
            .path("/")
            .build(),
    )
}

/// Reads the pending flash message and clears it from the jar.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let flash = jar
        .get(FLASH_COOKIE_NAME)
        .and_then(|cookie| Flash::decode(cookie.value()));
    let jar = jar.remove(Cookie::build(FLASH_COOKIE_NAME).path("/"));
    (jar, flash)
}
