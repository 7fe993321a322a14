//! pointwatch - client for a machine-monitoring backend
//!
//! Hydrates an authenticated session from cookie-encoded tokens, refreshes
//! it silently, and performs monitoring point CRUD. Modules are public for
//! use in integration tests.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod monitoring;
pub mod prelude;
pub mod traits;
