use axum::http::{header, HeaderMap, HeaderValue};
use cookie::Cookie;

use super::jwt;

pub const SESSION_COOKIE: &str = "courtdesk_session";

fn cookie_secure() -> bool {
    std::env::var("COOKIE_SECURE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

fn cookie_domain() -> Option<String> {
    std::env::var("COOKIE_DOMAIN").ok().filter(|d| !d.is_empty())
}

fn to_header(cookie: Cookie<'_>) -> HeaderValue {
    // Cookie values are JWTs (base64url + dots), always valid header bytes.
    HeaderValue::from_str(&cookie.to_string()).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Build the Set-Cookie header carrying the session token.
pub fn build_session_cookie(token: &str) -> HeaderValue {
    let mut cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::minutes(jwt::access_token_expiry_minutes()))
        .secure(cookie_secure());

    if let Some(domain) = cookie_domain() {
        cookie = cookie.domain(domain);
    }

    to_header(cookie.build())
}

/// Build the Set-Cookie header that expires the session cookie.
pub fn build_clear_cookie() -> HeaderValue {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::ZERO);

    if let Some(domain) = cookie_domain() {
        cookie = cookie.domain(domain);
    }

    to_header(cookie.build())
}

/// Extract the session token from the cookie (preferred) or the Bearer
/// header (API clients).
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_cookie(headers, SESSION_COOKIE).filter(|t| !t.is_empty()) {
        return Some(token);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|piece| Cookie::parse(piece.trim().to_string()).ok())
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}
