//! Prelude module for convenient imports.
//!
//! ```ignore
//! use pointwatch::prelude::*;
//! ```

// Session
pub use crate::auth::{
    AccessToken, AuthContext, AuthProvider, SessionManager, SessionState, SignInCredentials,
    UserProfile,
};

// Monitoring
pub use crate::monitoring::{Machine, MonitoringPoint, MonitoringPointsClient};

// Wiring
pub use crate::client::PointwatchClient;
pub use crate::config::ClientConfig;

// Errors
pub use crate::error::{ApiError, AuthError, TokenDecodeError};
