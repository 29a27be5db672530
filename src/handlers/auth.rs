//! Authentication handlers

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::models::LoginRequest;
use crate::security::password;
use crate::AppState;

/// bcrypt hash of a throwaway password. Verified on unknown-username logins
/// so that path costs the same as a real password mismatch; the result is
/// discarded either way.
const DUMMY_HASH: &str = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

/// Login response. The capability flag mirrors the snapshot embedded in the
/// issued token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub can_view_pokemon: bool,
    /// Present only in bearer mode, where no cookie carries the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub user: CurrentUser,
}

/// Login endpoint handler.
///
/// Unknown username and wrong password return the same generic 401 so the
/// response does not reveal which usernames exist.
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = match state.store.find_by_username(&payload.username).await? {
        Some(user) => user,
        None => {
            // Equalize timing with the real-mismatch path below.
            let _ = password::verify_password(&payload.password, DUMMY_HASH);
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !password::verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.codec.issue(&user, Utc::now())?;

    tracing::info!(username = %user.username, "login succeeded");

    let body = LoginResponse {
        token: state.transport.token_in_body().then(|| token.clone()),
        username: user.username,
        can_view_pokemon: user.can_view_pokemon,
    };

    let mut response = HttpResponse::Ok();
    if let Some(cookie) = state.transport.session_cookie(&token) {
        response.cookie(cookie);
    }

    Ok(response.json(body))
}

/// Logout endpoint handler.
///
/// The token stays cryptographically valid until expiry; logout only
/// instructs the transport to drop it.
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    if let Some(cookie) = state.transport.removal_cookie() {
        response.cookie(cookie);
    }

    response.json(LogoutResponse {
        message: "session closed".to_owned(),
    })
}

/// Report the identity attached by the authorization gate.
pub async fn verify(user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(VerifyResponse { user })
}
