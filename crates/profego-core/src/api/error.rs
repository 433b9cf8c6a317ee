use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// An authenticated call was attempted with no active session. Raised
    /// locally; no network request is made.
    #[error("No hay token de autorización. Inicia sesión nuevamente.")]
    NoSession,

    /// The backend rejected the bearer token (401). The session has been
    /// cleared as a side effect by the time this surfaces.
    #[error("Tu sesión ha expirado. Por favor inicia sesión nuevamente.")]
    SessionExpired,

    /// Non-success HTTP status, with the human-readable message extracted
    /// from the response body (or synthesized from the status line).
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Well-formed HTTP success whose body fails the API contract.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Build an error from a non-success response. The backend (FastAPI)
    /// puts its message in `detail`; `message` is checked for older
    /// endpoints; anything unparseable falls back to the status line.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("detail")
                    .or_else(|| value.get("message"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                format!(
                    "Error {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            });

        ApiError::Http {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_field_becomes_the_message() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Credenciales incorrectas"}"#,
        );
        assert_eq!(err.to_string(), "Credenciales incorrectas");
    }

    #[test]
    fn message_field_is_the_fallback_key() {
        let err = ApiError::from_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"message": "Algo salió mal"}"#,
        );
        assert_eq!(err.to_string(), "Algo salió mal");
    }

    #[test]
    fn unparseable_body_synthesizes_from_status() {
        let err = ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, "<html>boom</html>");
        assert_eq!(err.to_string(), "Error 503: Service Unavailable");
    }

    #[test]
    fn json_body_without_known_keys_synthesizes_from_status() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, r#"{"oops": true}"#);
        assert!(err.to_string().contains("404"));
    }
}
