//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, PUT)
//! - [`CookieStore`] - Cookie jar storage and retrieval

pub mod cookies;
pub mod http;

pub use cookies::{CookieError, CookieStore};
pub use http::{Headers, HttpClient, HttpError, Response};
