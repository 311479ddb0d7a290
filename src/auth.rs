// ABOUTME: Email and password authentication with argon2 hashing and cookie sessions
// ABOUTME: Handles signup, login and logout form posts, answering with redirects and flash messages

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    extract::{Form, State},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;

use crate::error::{AppError, Result};
use crate::session::{self, Flash};
use crate::types::CredentialsForm;
use crate::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password!";

/// Hashes a password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            tracing::error!("Stored password hash is malformed: {}", err);
            false
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> (CookieJar, Redirect) {
    let email = normalize_email(&form.email);
    if email.is_empty() || form.password.is_empty() {
        let jar = session::set_flash(jar, Flash::error("Email and password are required!"));
        return (jar, Redirect::to("/"));
    }

    let flash = match register_user(&state, &email, &form.password).await {
        Ok(()) => {
            tracing::info!(%email, "user signed up");
            Flash::success("Account created successfully! Please sign in.")
        }
        Err(AppError::BadRequest(msg)) => Flash::error(msg),
        Err(err) => {
            tracing::error!("Error during signup: {}", err);
            Flash::error("Error creating account. Please try again.")
        }
    };

    (session::set_flash(jar, flash), Redirect::to("/"))
}

async fn register_user(state: &AppState, email: &str, password: &str) -> Result<()> {
    if state.storage.get_user_by_email(email).await?.is_some() {
        return Err(AppError::BadRequest("Email already registered!".to_string()));
    }
    let password_hash = hash_password(password)?;
    state.storage.create_user(email, &password_hash).await?;
    Ok(())
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> (CookieJar, Redirect) {
    let email = normalize_email(&form.email);

    let user = match state.storage.get_user_by_email(&email).await {
        Ok(user) => user,
        Err(err) => {
            tracing::error!("Error during login: {}", err);
            let jar = session::set_flash(jar, Flash::error("Error logging in. Please try again."));
            return (jar, Redirect::to("/"));
        }
    };

    // Unknown email and wrong password take the same path
    let authenticated = user
        .map(|u| verify_password(&form.password, &u.password))
        .unwrap_or(false);
    if !authenticated {
        tracing::warn!(%email, "failed login attempt");
        let jar = session::set_flash(jar, Flash::error(INVALID_CREDENTIALS));
        return (jar, Redirect::to("/"));
    }

    let session_id = state.sessions.create_session(email.clone());
    let cookie = session::create_session_cookie(
        session_id,
        state.sessions.ttl_seconds(),
        state.config.secure_cookies,
    );
    tracing::info!(%email, "user logged in");

    let jar = session::set_flash(jar.add(cookie), Flash::success("Login successful!"));
    (jar, Redirect::to("/dashboard"))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(session_cookie) = jar.get(session::SESSION_COOKIE_NAME) {
        state.sessions.remove_session(session_cookie.value());
    }

    let jar = jar.add(session::create_logout_cookie());
    let jar = session::set_flash(jar, Flash::success("You have been logged out."));
    (jar, Redirect::to("/"))
}
