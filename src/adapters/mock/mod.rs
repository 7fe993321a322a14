//! Test doubles for the trait seams.
//!
//! - [`MockHttpClient`] - HTTP client with scripted responses
//! - [`InMemoryCookies`] - cookie jar held in memory
//! - [`MockAuthApi`] - authentication backend writing into an [`InMemoryCookies`] jar

pub mod auth;
pub mod cookies;
pub mod http;

pub use auth::{AuthCall, MockAuthApi, RefreshBehavior};
pub use cookies::InMemoryCookies;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
