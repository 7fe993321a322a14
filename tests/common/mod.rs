//! Common test utilities for integration tests.
//!
//! Token cookies are built with the same encoding the backend uses, so
//! tests exercise the real decode path.
//!
//! ```ignore
//! mod common;
//! use common::{access_cookie, far_future};
//!
//! let cookies = InMemoryCookies::with_cookies([("authTokentest", access_cookie("u1", far_future()))]);
//! ```

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::time::Duration;

use pointwatch::auth::{encode_envelope, AccessToken, UserProfile};
use pointwatch::config::ClientConfig;

/// Environment suffix used by every test config.
pub const ENV: &str = "test";

/// Access token cookie name for [`ENV`].
pub const AUTH_COOKIE: &str = "authTokentest";

/// Refresh token cookie name for [`ENV`].
pub const REFRESH_COOKIE: &str = "refreshTokentest";

pub fn far_future() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap()
}

pub fn long_ago() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
}

/// Access token for user `id` expiring at `expires_at`.
pub fn access_token(id: &str, expires_at: DateTime<Utc>) -> AccessToken {
    let mut user = UserProfile::new(id);
    user.email = Some(format!("{}@example.com", id));
    AccessToken::new(user, expires_at)
}

/// Encoded access token cookie value.
pub fn access_cookie(id: &str, expires_at: DateTime<Utc>) -> String {
    encode_envelope(&access_token(id, expires_at)).unwrap()
}

/// Encoded refresh token cookie value.
pub fn refresh_cookie() -> String {
    encode_envelope(&serde_json::json!({ "token": "refresh-123", "userId": "u1" })).unwrap()
}

/// `Set-Cookie` header value as the backend sends it.
pub fn set_cookie(name: &str, value: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", name, value)
}

/// `Set-Cookie` header value deleting a cookie.
pub fn clear_cookie(name: &str) -> String {
    format!("{}=; Path=/; Max-Age=0", name)
}

/// Config pointing at `base_url` with the test environment and a short
/// settle delay.
pub fn test_config(base_url: &str) -> ClientConfig {
    ClientConfig::new()
        .with_api_base_url(base_url)
        .with_environment(ENV)
        .with_settle_delay(Duration::from_millis(10))
        .with_request_timeout(Duration::from_secs(5))
}
