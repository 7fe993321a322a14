//! Cookie-encoded token payloads and their extraction.
//!
//! A token cookie holds base64 text of the JSON envelope
//! `{ "message": <payload> }`. Cookie names carry the deployment
//! environment as a suffix so environments sharing a domain never read
//! each other's sessions.

use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, TokenDecodeError};
use crate::traits::CookieStore;

/// Base name of the access token cookie.
pub const AUTH_COOKIE_BASE: &str = "authToken";

/// Base name of the refresh token cookie.
pub const REFRESH_COOKIE_BASE: &str = "refreshToken";

// Servers differ on padding and alphabet; accept all of them.
const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Access token cookie name for an environment.
pub fn auth_cookie_name(environment: &str) -> String {
    format!("{}{}", AUTH_COOKIE_BASE, environment)
}

/// Refresh token cookie name for an environment.
pub fn refresh_cookie_name(environment: &str) -> String {
    format!("{}{}", REFRESH_COOKIE_BASE, environment)
}

/// Profile of the signed-in user, as embedded in the access token.
///
/// Fields beyond `id`, `name` and `email` are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// Create a profile with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Decoded access token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub user: UserProfile,
    #[serde(rename = "expiresAt", with = "timestamp")]
    pub expires_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AccessToken {
    pub fn new(user: UserProfile, expires_at: DateTime<Utc>) -> Self {
        Self {
            user,
            expires_at,
            extra: serde_json::Map::new(),
        }
    }
}

/// Decoded refresh token payload. Opaque: only its presence matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(pub serde_json::Value);

/// `expiresAt` accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` or
/// `YYYY-MM-DD` (read as UTC), RFC 2822, or epoch milliseconds.
mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Float(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => from_millis(ms),
            Raw::Float(ms) => from_millis(ms as i64),
            Raw::Text(text) => parse_text(text.trim())
                .ok_or_else(|| de::Error::custom(format!("unrecognized timestamp {:?}", text))),
        }
    }

    fn from_millis<E: de::Error>(ms: i64) -> Result<DateTime<Utc>, E> {
        Utc.timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| E::custom(format!("timestamp {} out of range", ms)))
    }

    pub(super) fn parse_text(text: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Utc.from_utc_datetime(&naive));
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
        }
        DateTime::parse_from_rfc2822(text)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc))
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    message: &'a T,
}

/// Decode a raw cookie value into its inner payload.
///
/// Percent-encoding is undone first, as browser cookie libraries do.
/// Never returns a partially decoded value: any failure is a
/// [`TokenDecodeError`].
pub fn decode_envelope<T: DeserializeOwned>(raw: &str) -> Result<T, TokenDecodeError> {
    let unescaped = urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    let compact: String = unescaped.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = STANDARD_LENIENT
        .decode(&compact)
        .or_else(|err| URL_SAFE_LENIENT.decode(&compact).map_err(|_| err))?;
    let text = String::from_utf8(bytes)?;

    let mut envelope: serde_json::Value =
        serde_json::from_str(&text).map_err(TokenDecodeError::Json)?;
    let message = envelope
        .get_mut("message")
        .map(serde_json::Value::take)
        .filter(|message| !message.is_null())
        .ok_or(TokenDecodeError::MissingMessage)?;

    serde_json::from_value(message).map_err(TokenDecodeError::Payload)
}

/// Encode a payload the way the backend writes token cookies.
pub fn encode_envelope<T: Serialize>(payload: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(&Envelope { message: payload })?;
    Ok(STANDARD.encode(json))
}

/// Read and decode a token cookie.
///
/// # Returns
/// - `Ok(None)` if the cookie is absent or empty
/// - `Ok(Some(payload))` if it decodes
/// - `Err(AuthError::Token(_))` if it is present but malformed
/// - `Err(AuthError::CookieStore(_))` if the store cannot be read
pub async fn extract_token<T: DeserializeOwned>(
    store: &dyn CookieStore,
    name: &str,
) -> Result<Option<T>, AuthError> {
    let Some(raw) = store.get(name).await? else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }
    Ok(Some(decode_envelope(&raw)?))
}

/// Read the access token cookie for `environment`.
pub async fn extract_access_token(
    store: &dyn CookieStore,
    environment: &str,
) -> Result<Option<AccessToken>, AuthError> {
    extract_token(store, &auth_cookie_name(environment)).await
}

/// Read the refresh token cookie for `environment`.
pub async fn extract_refresh_token(
    store: &dyn CookieStore,
    environment: &str,
) -> Result<Option<RefreshToken>, AuthError> {
    extract_token(store, &refresh_cookie_name(environment)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::InMemoryCookies;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::TimeZone;

    const SCENARIO_JSON: &str =
        r#"{"message":{"user":{"id":"u1"},"expiresAt":"2999-01-01T00:00:00Z"}}"#;

    #[test]
    fn test_cookie_names_carry_environment() {
        assert_eq!(auth_cookie_name("production"), "authTokenproduction");
        assert_eq!(refresh_cookie_name("staging"), "refreshTokenstaging");
        assert_eq!(auth_cookie_name(""), "authToken");
        assert_ne!(auth_cookie_name("dev"), auth_cookie_name("prod"));
    }

    #[test]
    fn test_decode_scenario_cookie() {
        let raw = STANDARD.encode(SCENARIO_JSON);
        let token: AccessToken = decode_envelope(&raw).unwrap();
        assert_eq!(token.user, UserProfile::new("u1"));
        assert_eq!(
            token.expires_at,
            Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_decode_percent_encoded_cookie() {
        let raw = STANDARD.encode(SCENARIO_JSON);
        let escaped = urlencoding::encode(&raw).into_owned();
        assert_ne!(raw, escaped);
        let token: AccessToken = decode_envelope(&escaped).unwrap();
        assert_eq!(token.user.id, "u1");
    }

    #[test]
    fn test_decode_url_safe_unpadded_cookie() {
        let raw = URL_SAFE_NO_PAD.encode(SCENARIO_JSON);
        let token: AccessToken = decode_envelope(&raw).unwrap();
        assert_eq!(token.user.id, "u1");
    }

    #[test]
    fn test_decode_keeps_extra_user_fields() {
        let raw = STANDARD.encode(
            r#"{"message":{"user":{"_id":"u9","name":"Ada","role":"admin"},"expiresAt":"2999-01-01T00:00:00Z","scope":"all"}}"#,
        );
        let token: AccessToken = decode_envelope(&raw).unwrap();
        assert_eq!(token.user.id, "u9");
        assert_eq!(token.user.name.as_deref(), Some("Ada"));
        assert_eq!(token.user.extra.get("role"), Some(&serde_json::json!("admin")));
        assert_eq!(token.extra.get("scope"), Some(&serde_json::json!("all")));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let result = decode_envelope::<AccessToken>("!!not base64!!");
        assert!(matches!(result, Err(TokenDecodeError::Base64(_))));
    }

    #[test]
    fn test_decode_rejects_non_utf8() {
        let raw = STANDARD.encode([0xff, 0xfe, 0xfd]);
        let result = decode_envelope::<AccessToken>(&raw);
        assert!(matches!(result, Err(TokenDecodeError::Utf8(_))));
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let raw = STANDARD.encode("hello world");
        let result = decode_envelope::<AccessToken>(&raw);
        assert!(matches!(result, Err(TokenDecodeError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_missing_or_null_message() {
        for body in [r#"{"data":1}"#, r#"{"message":null}"#, "[1,2]"] {
            let raw = STANDARD.encode(body);
            let result = decode_envelope::<AccessToken>(&raw);
            assert!(
                matches!(result, Err(TokenDecodeError::MissingMessage)),
                "body {} should be missing its message",
                body
            );
        }
    }

    #[test]
    fn test_decode_rejects_wrong_payload_shape() {
        let raw = STANDARD.encode(r#"{"message":{"user":{"id":"u1"}}}"#);
        let result = decode_envelope::<AccessToken>(&raw);
        assert!(matches!(result, Err(TokenDecodeError::Payload(_))));

        let raw = STANDARD.encode(r#"{"message":{"user":{"id":"u1"},"expiresAt":"soon"}}"#);
        let result = decode_envelope::<AccessToken>(&raw);
        assert!(matches!(result, Err(TokenDecodeError::Payload(_))));
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
        for text in [
            "2030-06-01T12:00:00Z",
            "2030-06-01T14:00:00+02:00",
            "2030-06-01T12:00:00.000",
            "Sat, 01 Jun 2030 12:00:00 GMT",
        ] {
            assert_eq!(timestamp::parse_text(text), Some(expected), "{}", text);
        }
        assert_eq!(
            timestamp::parse_text("2030-06-01"),
            Some(Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(timestamp::parse_text("next tuesday"), None);

        let raw = STANDARD.encode(format!(
            r#"{{"message":{{"user":{{"id":"u1"}},"expiresAt":{}}}}}"#,
            expected.timestamp_millis()
        ));
        let token: AccessToken = decode_envelope(&raw).unwrap();
        assert_eq!(token.expires_at, expected);
    }

    #[test]
    fn test_encode_then_decode_matches_backend_shape() {
        let token = AccessToken::new(
            UserProfile::new("u1"),
            Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap(),
        );
        let raw = encode_envelope(&token).unwrap();
        let text = String::from_utf8(STANDARD.decode(&raw).unwrap()).unwrap();
        assert_eq!(
            text,
            r#"{"message":{"user":{"id":"u1"},"expiresAt":"2999-01-01T00:00:00.000Z"}}"#
        );
        assert_eq!(decode_envelope::<AccessToken>(&raw).unwrap(), token);
    }

    #[tokio::test]
    async fn test_extract_absent_and_empty_cookie() {
        let cookies = InMemoryCookies::new();
        assert_eq!(extract_access_token(&cookies, "prod").await.unwrap(), None);

        cookies.insert("authTokenprod", "");
        assert_eq!(extract_access_token(&cookies, "prod").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_extract_reads_environment_specific_cookie() {
        let cookies = InMemoryCookies::new();
        cookies.insert("authTokenstaging", &STANDARD.encode(SCENARIO_JSON));

        assert!(extract_access_token(&cookies, "prod").await.unwrap().is_none());
        let token = extract_access_token(&cookies, "staging").await.unwrap().unwrap();
        assert_eq!(token.user.id, "u1");
    }

    #[tokio::test]
    async fn test_extract_refresh_token_is_opaque() {
        let cookies = InMemoryCookies::new();
        cookies.insert(
            "refreshTokenprod",
            &encode_envelope(&serde_json::json!("opaque-credential")).unwrap(),
        );

        let token = extract_refresh_token(&cookies, "prod").await.unwrap();
        assert_eq!(token, Some(RefreshToken(serde_json::json!("opaque-credential"))));
    }

    #[tokio::test]
    async fn test_extract_malformed_cookie_is_typed_error() {
        let cookies = InMemoryCookies::new();
        cookies.insert("authTokenprod", "garbage%%%");

        let result = extract_access_token(&cookies, "prod").await;
        assert!(matches!(result, Err(AuthError::Token(_))));
    }

    #[tokio::test]
    async fn test_extract_store_failure_is_typed_error() {
        let cookies = InMemoryCookies::new();
        cookies.set_read_should_fail(true);

        let result = extract_refresh_token(&cookies, "prod").await;
        assert!(matches!(result, Err(AuthError::CookieStore(_))));
    }
}
