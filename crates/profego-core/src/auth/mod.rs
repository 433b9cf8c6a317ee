//! Authentication module for managing user sessions.
//!
//! This module provides `SessionStore`: durable bearer-token session state
//! with a fixed one-hour expiry and a one-time migration path from the
//! legacy two-key storage format.
//!
//! Sessions are persisted as key files under the application data directory.

pub mod session;

pub use session::{SessionData, SessionStore};
