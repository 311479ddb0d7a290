// ABOUTME: Request middleware for the session guard and common security headers
// ABOUTME: The guard runs before every protected handler and refreshes the sliding session cookie

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::session::{self, Flash, SessionData};
use crate::AppState;

/// Signed-in user, placed in request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionData);

impl CurrentUser {
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let (session_id, session_data) = match session::extract_session_from_jar(&jar, &state.sessions)
    {
        Ok(found) => found,
        Err(err) => {
            if request.uri().path().starts_with("/api/") {
                return err.into_response();
            }
            tracing::debug!("Redirecting unauthenticated page request: {}", err);
            let jar = session::set_flash(jar, Flash::error("Please log in first!"));
            return (jar, Redirect::to("/")).into_response();
        }
    };

    request.extensions_mut().insert(CurrentUser(session_data));
    let response = next.run(request).await;

    let refreshed = session::create_session_cookie(
        session_id,
        state.sessions.ttl_seconds(),
        state.config.secure_cookies,
    );
    (jar.add(refreshed), response).into_response()
}

pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self' 'unsafe-inline'; \
             style-src 'self' 'unsafe-inline'; \
             img-src 'self' data: https://via.placeholder.com; \
             connect-src 'self'; \
             frame-ancestors 'none'; \
             base-uri 'self'; \
             form-action 'self'",
        ),
    );

    // Prevent clickjacking
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    // Prevent MIME type sniffing
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("same-origin"),
    );

    response
}
