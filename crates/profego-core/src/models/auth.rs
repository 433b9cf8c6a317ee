use serde::{Deserialize, Serialize};

/// Successful login: the backend hands back the identity and bearer token
/// the session is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub email: String,
    pub token: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// Storage usage for the signed-in user.
///
/// The client only calls this endpoint as a session-validity probe, so the
/// fields stay loose rather than tracking the backend's accounting shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageInfo {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}
