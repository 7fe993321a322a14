//! Access token validity.

use chrono::{DateTime, Utc};

use super::token::AccessToken;

/// Whether an access token is still usable right now.
pub fn is_access_token_valid(token: Option<&AccessToken>) -> bool {
    is_access_token_valid_at(token, Utc::now())
}

/// Whether an access token is usable at `now`.
///
/// The remaining lifetime is counted in whole seconds, truncated toward
/// zero, and must be strictly positive: a token with less than one second
/// left is already expired.
pub fn is_access_token_valid_at(token: Option<&AccessToken>, now: DateTime<Utc>) -> bool {
    match token {
        Some(token) => (token.expires_at - now).num_seconds() > 0,
        None => false,
    }
}
