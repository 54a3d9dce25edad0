use axum::{
    http::{header, HeaderMap, StatusCode},
    Extension, Json,
};
use tracing::info;
use validator::Validate;

use crate::config::get_config;
use crate::dto::auth_dto::{LoginRequest, SessionResponse};
use crate::error::{Error, Result};
use crate::middleware::auth::{clear_session_cookie, session_cookie, sign_session, Claims};
use crate::models::user::User;

/// Looks the email up in the configured directory and sets the session
/// cookie. Unknown emails get a plain 401, nothing more specific.
pub async fn login(Json(req): Json<LoginRequest>) -> Result<(HeaderMap, Json<SessionResponse>)> {
    req.validate()?;
    let config = get_config();

    let allowed = config
        .find_user(&req.email)
        .ok_or_else(|| Error::Unauthorized("This email has no access".to_string()))?;

    let user = User {
        email: allowed.email.clone(),
        role: allowed.role,
    };
    let token = sign_session(&user, &config.session_secret, config.session_ttl_hours)?;
    info!("Session opened for {} ({})", user.email, user.role.as_str());

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, session_cookie(&token));
    Ok((headers, Json(SessionResponse { user })))
}

pub async fn me(Extension(claims): Extension<Claims>) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: claims.user(),
    })
}

pub async fn logout() -> (StatusCode, HeaderMap) {
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, clear_session_cookie());
    (StatusCode::NO_CONTENT, headers)
}
