//! Concrete implementations of the traits in `crate::traits`.
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileCookieStore`] - cookie jar persisted as JSON
//!
//! The [`mock`] submodule provides test doubles.

pub mod file_cookies;
pub mod mock;
pub mod reqwest_http;

pub use file_cookies::FileCookieStore;
pub use mock::{InMemoryCookies, MockAuthApi, MockHttpClient};
pub use reqwest_http::ReqwestHttpClient;
