//! Cookie-aware JSON client for the backend API.
//!
//! Plays the role a browser plays for a web front end: every request carries
//! the stored cookies, and every `Set-Cookie` in a response is written back
//! to the [`CookieStore`] before the caller sees the response. This is the
//! only place auth cookies are written.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::traits::{CookieStore, Headers, HttpClient, Response};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

/// One parsed `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    /// True when the server is deleting the cookie (`Max-Age<=0`, an
    /// `Expires` in the past, or an empty value).
    pub removal: bool,
}

/// Parse a `Set-Cookie` header value.
///
/// Only the attributes that decide whether the cookie still exists are
/// read; `Path`, `Domain`, `SameSite` and friends are ignored.
pub fn parse_set_cookie(header: &str) -> Option<SetCookie> {
    parse_set_cookie_at(header, Utc::now())
}

fn parse_set_cookie_at(header: &str, now: DateTime<Utc>) -> Option<SetCookie> {
    let mut parts = header.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"').to_string();

    let mut removal = value.is_empty();
    for attribute in parts {
        let (key, attr_value) = match attribute.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => continue,
        };
        if key.eq_ignore_ascii_case("max-age") {
            if let Ok(seconds) = attr_value.parse::<i64>() {
                removal |= seconds <= 0;
            }
        } else if key.eq_ignore_ascii_case("expires") {
            if let Ok(expires) = DateTime::parse_from_rfc2822(attr_value) {
                removal |= expires.with_timezone(&Utc) <= now;
            }
        }
    }

    Some(SetCookie {
        name: name.to_string(),
        value,
        removal,
    })
}

/// JSON API client with a shared cookie jar.
///
/// # Example
///
/// ```ignore
/// use pointwatch::api::ApiClient;
///
/// let api = ApiClient::new(http, cookies, "https://api.example.com");
/// let machines: Vec<serde_json::Value> = api.get_json("machines").await?;
/// ```
pub struct ApiClient {
    http: Arc<dyn HttpClient>,
    cookies: Arc<dyn CookieStore>,
    base_url: String,
}

impl ApiClient {
    /// Create a client rooted at `base_url`.
    pub fn new(
        http: Arc<dyn HttpClient>,
        cookies: Arc<dyn CookieStore>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            cookies,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The cookie jar this client reads and writes.
    pub fn cookies(&self) -> &Arc<dyn CookieStore> {
        &self.cookies
    }

    /// Build an absolute URL from a path relative to the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::Get, path, None).await?;
        decode(&response)
    }

    /// POST `body` as JSON to `path` and decode the JSON answer.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(body)?;
        let response = self.send(Method::Post, path, Some(body)).await?;
        decode(&response)
    }

    /// POST to `path` with no body, returning the raw response.
    pub async fn post_empty(&self, path: &str) -> Result<Response, ApiError> {
        self.send(Method::Post, path, Some(String::new())).await
    }

    /// PUT `body` as JSON to `path` and decode the JSON answer.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(body)?;
        let response = self.send(Method::Put, path, Some(body)).await?;
        decode(&response)
    }

    async fn request_headers(&self, has_body: bool) -> Result<Headers, ApiError> {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if has_body {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        let cookies = self.cookies.all().await?;
        if !cookies.is_empty() {
            let cookie_header = cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; ");
            headers.insert("Cookie".to_string(), cookie_header);
        }
        Ok(headers)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);
        let has_body = body.as_deref().is_some_and(|b| !b.is_empty());
        let headers = self.request_headers(has_body).await?;
        let body = body.unwrap_or_default();

        tracing::debug!("{} {}", method.as_str(), url);
        let response = match method {
            Method::Get => self.http.get(&url, &headers).await?,
            Method::Post => self.http.post(&url, &body, &headers).await?,
            Method::Put => self.http.put(&url, &body, &headers).await?,
        };

        // Cookies are absorbed even from error responses, e.g. a 401 that
        // clears a stale token.
        self.absorb_cookies(&response).await?;

        if !response.is_success() {
            let text = response.text().unwrap_or_default();
            tracing::debug!("{} {} returned {}", method.as_str(), url, response.status);
            return Err(ApiError::from_status(response.status, &text));
        }

        Ok(response)
    }

    async fn absorb_cookies(&self, response: &Response) -> Result<(), ApiError> {
        for header in &response.set_cookies {
            let Some(cookie) = parse_set_cookie(header) else {
                tracing::warn!("Ignoring unparseable Set-Cookie header");
                continue;
            };
            if cookie.removal {
                tracing::debug!("Server cleared cookie {}", cookie.name);
                self.cookies.remove(&cookie.name).await?;
            } else {
                tracing::debug!("Server set cookie {}", cookie.name);
                self.cookies.set(&cookie.name, &cookie.value).await?;
            }
        }
        Ok(())
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))
}

fn decode<T: DeserializeOwned>(response: &Response) -> Result<T, ApiError> {
    response.json().map_err(|e| {
        let text = response.text().unwrap_or_default();
        ApiError::InvalidResponse(format!(
            "{}. Response: {}",
            e,
            text.chars().take(200).collect::<String>()
        ))
    })
}
