//! API client for communicating with the ProfeGo REST backend.
//!
//! This module provides the `ApiClient` struct: the single choke point for
//! JSON requests. It attaches the bearer token, normalizes error bodies,
//! and invalidates the session when the backend rejects the token. Binary
//! transfers (upload, preview, download) construct their requests directly
//! but reuse the same authorization-header convention and never mutate the
//! session.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{header, multipart, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::models::{
    FileCategory, FileEntry, FilePreview, FileUpload, GeneratePlanResponse, LoginResponse,
    PlanDetail, PlanDetailResponse, PlanDocument, PlanListResponse, PlanSummary,
    RegisterResponse, StorageInfo, UploadResult,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow backend responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Timeout for plan generation in seconds.
/// The AI pipeline takes 1-3 minutes for a full curriculum file.
const PLAN_GENERATION_TIMEOUT_SECS: u64 = 300;

/// Default filename for downloaded plan documents when the backend does not
/// provide one via Content-Disposition.
const DEFAULT_PLAN_FILENAME: &str = "Plan_Educativo.docx";

/// Characters escaped in URL path segments (the encodeURIComponent set).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// API client for the ProfeGo backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the session store is shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<Mutex<SessionStore>>,
}

impl ApiClient {
    /// Create a new API client over a shared session store.
    /// `base_url` includes the `/api` prefix.
    pub fn new(
        base_url: impl Into<String>,
        session: Arc<Mutex<SessionStore>>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Shared session store backing this client.
    pub fn session_store(&self) -> Arc<Mutex<SessionStore>> {
        Arc::clone(&self.session)
    }

    fn session(&self) -> MutexGuard<'_, SessionStore> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current bearer token, re-read on every call: the store may have been
    /// cleared by a concurrent 401 since the last request.
    fn current_token(&self) -> Option<String> {
        self.session().token()
    }

    // ===== JSON choke point =====

    /// Perform a JSON request against `<base><path>`.
    ///
    /// Unless `skip_auth`, a missing token fails with `ApiError::NoSession`
    /// before any network traffic. A 401 response clears the session before
    /// surfacing `ApiError::SessionExpired`; every other non-success status
    /// becomes `ApiError::Http` with the message extracted from the body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        skip_auth: bool,
    ) -> Result<T, ApiError> {
        self.request_with_headers(method, path, body, skip_auth, header::HeaderMap::new())
            .await
    }

    /// `request` with caller-supplied headers, which override computed ones.
    pub async fn request_with_headers<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        skip_auth: bool,
        headers: header::HeaderMap,
    ) -> Result<T, ApiError> {
        let token = if skip_auth {
            None
        } else {
            Some(self.current_token().ok_or(ApiError::NoSession)?)
        };

        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "API request");

        let mut request = self.client.request(method, &url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            // .json() also sets Content-Type: application/json
            request = request.json(body);
        }
        request = request.headers(headers);

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.error_from_response(status, &body));
        }

        Ok(response.json().await?)
    }

    /// Map a non-success response to an `ApiError`. The 401 branch is the
    /// one path through which this client mutates session state.
    fn error_from_response(&self, status: StatusCode, body: &str) -> ApiError {
        if status == StatusCode::UNAUTHORIZED {
            warn!("session rejected by backend, clearing");
            self.session().clear();
            return ApiError::SessionExpired;
        }
        ApiError::from_status(status, body)
    }

    // ===== Authentication =====

    /// Authenticate and persist the resulting session.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response: LoginResponse = self
            .request(Method::POST, "/auth/login", Some(&body), true)
            .await?;

        if !self.session().save(&response.email, &response.token) {
            warn!("session held in memory only, persistence failed");
        }

        Ok(response)
    }

    /// Register a new account. Does not sign in.
    pub async fn register(&self, email: &str, password: &str) -> Result<RegisterResponse, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.request(Method::POST, "/auth/register", Some(&body), true)
            .await
    }

    /// Fetch storage usage for the signed-in user. Doubles as the
    /// lightweight probe used for session validation.
    pub async fn storage_info(&self) -> Result<StorageInfo, ApiError> {
        self.request(Method::GET, "/user/storage-info", None, false)
            .await
    }

    /// Check a bearer token against the protected probe endpoint. Network
    /// failures count as invalid.
    pub async fn validate_token(&self, token: &str) -> bool {
        let url = format!("{}/user/storage-info", self.base_url);
        match self.client.get(&url).bearer_auth(token).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                warn!(error = %err, "session validation request failed");
                false
            }
        }
    }

    /// Validate the current session against the server. Used
    /// opportunistically, not on every request.
    pub async fn validate_session(&self) -> bool {
        match self.current_token() {
            Some(token) => self.validate_token(&token).await,
            None => {
                debug!("no token to validate");
                false
            }
        }
    }

    /// Load the persisted session and confirm it against the server,
    /// clearing it if either step fails. The only operation that combines
    /// local and server-side truth.
    pub async fn check_session(&self) -> bool {
        if !self.session().load() {
            return false;
        }
        if !self.validate_session().await {
            self.session().clear();
            return false;
        }
        true
    }

    // ===== File gallery =====

    /// Fetch the file gallery listing.
    pub async fn list_files(&self) -> Result<Vec<FileEntry>, ApiError> {
        self.request(Method::GET, "/files/list", None, false).await
    }

    /// Upload files for processing. Multipart, so this bypasses the JSON
    /// choke point but keeps the authorization-header convention.
    pub async fn upload_files(&self, files: Vec<FileUpload>) -> Result<UploadResult, ApiError> {
        let token = self.current_token().ok_or(ApiError::NoSession)?;

        let mut form = multipart::Form::new();
        for file in files {
            form = form.part("files", multipart::Part::bytes(file.bytes).file_name(file.name));
        }

        let url = format!("{}/files/upload", self.base_url);
        debug!(url = %url, "uploading files");
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }
        Ok(response.json().await?)
    }

    /// Delete a stored file.
    pub async fn delete_file(
        &self,
        category: FileCategory,
        filename: &str,
    ) -> Result<Value, ApiError> {
        let path = format!(
            "/files/delete/{}/{}",
            category,
            utf8_percent_encode(filename, PATH_SEGMENT)
        );
        self.request(Method::DELETE, &path, None, false).await
    }

    /// Fetch a preview of a stored file. Text extractions come back as a
    /// JSON `{content}` body; everything else is raw bytes.
    pub async fn preview_file(
        &self,
        category: FileCategory,
        filename: &str,
    ) -> Result<FilePreview, ApiError> {
        let token = self.current_token().ok_or(ApiError::NoSession)?;
        let url = format!(
            "{}/files/preview/{}/{}",
            self.base_url,
            category,
            utf8_percent_encode(filename, PATH_SEGMENT)
        );
        let response = self.client.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        if content_type.starts_with("application/json") {
            #[derive(serde::Deserialize)]
            struct TextPreview {
                content: String,
            }
            let preview: TextPreview = response.json().await?;
            Ok(FilePreview::Text {
                content: preview.content,
            })
        } else {
            let bytes = response.bytes().await?.to_vec();
            Ok(FilePreview::Binary {
                content_type,
                bytes,
            })
        }
    }

    /// Download a stored file as raw bytes.
    pub async fn download_file(
        &self,
        category: FileCategory,
        filename: &str,
    ) -> Result<Vec<u8>, ApiError> {
        let token = self.current_token().ok_or(ApiError::NoSession)?;
        let url = format!(
            "{}/files/download/{}/{}",
            self.base_url,
            category,
            utf8_percent_encode(filename, PATH_SEGMENT)
        );
        let response = self.client.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }
        Ok(response.bytes().await?.to_vec())
    }

    // ===== Lesson plans =====

    /// Generate a lesson plan from a curriculum file, optionally
    /// personalized with a group diagnostic.
    pub async fn generate_plan(
        &self,
        plan_file: FileUpload,
        diagnostico_file: Option<FileUpload>,
    ) -> Result<GeneratePlanResponse, ApiError> {
        let token = self.current_token().ok_or(ApiError::NoSession)?;

        let mut form = multipart::Form::new().part(
            "plan_file",
            multipart::Part::bytes(plan_file.bytes).file_name(plan_file.name),
        );
        if let Some(diagnostico) = diagnostico_file {
            form = form.part(
                "diagnostico_file",
                multipart::Part::bytes(diagnostico.bytes).file_name(diagnostico.name),
            );
        }

        let url = format!("{}/plans/generate", self.base_url);
        debug!(url = %url, "generating plan");
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .timeout(Duration::from_secs(PLAN_GENERATION_TIMEOUT_SECS))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }
        Ok(response.json().await?)
    }

    /// List generated plans for the signed-in user.
    pub async fn list_plans(&self) -> Result<Vec<PlanSummary>, ApiError> {
        let response: PlanListResponse =
            self.request(Method::GET, "/plans/list", None, false).await?;
        if !response.success {
            return Err(ApiError::InvalidResponse(
                "Error cargando planes".to_string(),
            ));
        }
        Ok(response.planes)
    }

    /// Fetch the full detail of a generated plan.
    pub async fn get_plan(&self, plan_id: &str) -> Result<PlanDetail, ApiError> {
        let path = format!("/plans/{}", plan_id);
        let response: PlanDetailResponse =
            self.request(Method::GET, &path, None, false).await?;
        match response {
            PlanDetailResponse {
                success: true,
                plan: Some(plan),
            } => Ok(plan),
            _ => Err(ApiError::InvalidResponse(
                "No se pudo cargar el plan".to_string(),
            )),
        }
    }

    /// Download a plan as a Word document. The filename comes from
    /// Content-Disposition when the backend provides one.
    pub async fn download_plan(&self, plan_id: &str) -> Result<PlanDocument, ApiError> {
        let token = self.current_token().ok_or(ApiError::NoSession)?;
        let url = format!("{}/plans/{}/download", self.base_url, plan_id);
        let response = self.client.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let filename = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| DEFAULT_PLAN_FILENAME.to_string());

        let bytes = response.bytes().await?.to_vec();
        Ok(PlanDocument { filename, bytes })
    }

    /// Delete a generated plan.
    pub async fn delete_plan(&self, plan_id: &str) -> Result<Value, ApiError> {
        let path = format!("/plans/{}", plan_id);
        self.request(Method::DELETE, &path, None, false).await
    }
}

/// Extract `filename=` from a Content-Disposition value, stripping quotes.
fn filename_from_disposition(value: &str) -> Option<String> {
    let (_, rest) = value.split_once("filename=")?;
    let name = rest
        .split(';')
        .next()?
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_extracted_from_disposition() {
        assert_eq!(
            filename_from_disposition("attachment; filename=Plan_Primavera.docx").as_deref(),
            Some("Plan_Primavera.docx")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=\"Plan Otoño.docx\"").as_deref(),
            Some("Plan Otoño.docx")
        );
        assert_eq!(filename_from_disposition("inline"), None);
        assert_eq!(filename_from_disposition("attachment; filename="), None);
    }

    #[test]
    fn path_segments_escape_like_encode_uri_component() {
        let encoded = utf8_percent_encode("mi archivo (1).pdf", PATH_SEGMENT).to_string();
        assert_eq!(encoded, "mi%20archivo%20(1).pdf");
    }
}
