//! Authentication for the pointwatch client.
//!
//! This module provides:
//! - Token cookie decoding and validity checks
//! - Backend sign-in, sign-out and refresh calls
//! - The session manager and the context handed to consumers

pub mod context;
pub mod service;
pub mod session;
pub mod token;
pub mod validity;

pub use context::{AuthContext, AuthProvider};
pub use service::{AuthApi, HttpAuthApi, SignInCredentials};
pub use session::{SessionManager, SessionState};
pub use token::{
    auth_cookie_name, decode_envelope, encode_envelope, extract_access_token,
    extract_refresh_token, extract_token, refresh_cookie_name, AccessToken, RefreshToken,
    UserProfile,
};
pub use validity::{is_access_token_valid, is_access_token_valid_at};
