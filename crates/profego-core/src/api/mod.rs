//! REST API client module for the ProfeGo backend.
//!
//! This module provides the `ApiClient` for authenticating, managing the
//! file gallery, and generating and retrieving AI-built lesson plans.
//!
//! The API uses bearer token authentication obtained through the
//! `/auth/login` endpoint; the token travels in the `Authorization`
//! header on every authenticated request.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
