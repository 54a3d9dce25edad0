use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::user::{Role, User};

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Role,
}

impl Claims {
    pub fn user(&self) -> User {
        User {
            email: self.sub.clone(),
            role: self.role,
        }
    }
}

pub fn sign_session(user: &User, secret: &str, ttl_hours: i64) -> crate::error::Result<String> {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp() as usize;
    let claims = Claims {
        sub: user.email.clone(),
        exp,
        role: user.role,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| crate::error::Error::Internal(format!("Failed to sign session: {}", e)))
}

pub fn verify_session(token: &str, secret: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .ok()
}

/// Pulls the session token out of the `Cookie` header.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let cookie = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in cookie.split(';') {
        if let Some(rest) = pair.trim().strip_prefix("session=") {
            if !rest.is_empty() {
                return Some(rest.to_string());
            }
        }
    }
    None
}

pub fn session_cookie(token: &str) -> HeaderValue {
    format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/")
        .parse()
        .expect("cookie header is valid ascii")
}

pub fn clear_session_cookie() -> HeaderValue {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
        .parse()
        .expect("cookie header is valid ascii")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error":"unauthorized"})),
    )
        .into_response()
}

fn authenticate(req: &Request) -> Option<Claims> {
    let token = extract_token(req.headers())?;
    let config = crate::config::get_config();
    verify_session(&token, &config.session_secret)
}

/// Any valid session may pass; the claims land in request extensions.
pub async fn require_auth(mut req: Request, next: Next) -> Response {
    match authenticate(&req) {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => unauthorized(),
    }
}

async fn require_roles(mut req: Request, next: Next, allowed: &[Role]) -> Response {
    let Some(claims) = authenticate(&req) else {
        return unauthorized();
    };
    if !allowed.contains(&claims.role) {
        return (StatusCode::FORBIDDEN, Json(json!({"error":"forbidden"}))).into_response();
    }
    req.extensions_mut().insert(claims);
    next.run(req).await
}

/// Management surface: roster and metrics.
pub async fn require_hr_or_head(req: Request, next: Next) -> Response {
    require_roles(req, next, &[Role::Hr, Role::Head]).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_roundtrip() {
        let user = User {
            email: "anna.hr@company.com".into(),
            role: Role::Hr,
        };
        let token = sign_session(&user, "secret", 1).unwrap();
        let claims = verify_session(&token, "secret").unwrap();
        assert_eq!(claims.sub, "anna.hr@company.com");
        assert_eq!(claims.role, Role::Hr);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let user = User {
            email: "a@b.co".into(),
            role: Role::Buyer,
        };
        let token = sign_session(&user, "secret", 1).unwrap();
        assert!(verify_session(&token, "other").is_none());
    }

    #[test]
    fn token_extracted_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "theme=dark; session=abc.def.ghi; lang=en".parse().unwrap(),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def.ghi"));

        let mut empty = HeaderMap::new();
        empty.insert(header::COOKIE, "theme=dark".parse().unwrap());
        assert!(extract_token(&empty).is_none());
    }
}
