//! Core library for the ProfeGo client.
//!
//! ProfeGo is an educational-plan management service: teachers upload
//! curriculum and diagnostic files, then generate AI-built lesson plans from
//! them. This crate owns everything below the view layer:
//!
//! - `auth`: durable session state with expiry and legacy-format migration
//! - `api`: the REST client for the ProfeGo backend
//! - `models`: typed request/response data for auth, files, and plans
//! - `config`: on-disk client configuration
//!
//! View layers (desktop, TUI, web) consume session state and API results
//! through these types; nothing in this crate renders anything.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{SessionData, SessionStore};
pub use config::Config;
