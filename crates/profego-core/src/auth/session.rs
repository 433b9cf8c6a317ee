use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Storage key holding the structured session record
const SESSION_KEY: &str = "profego_session";

/// Legacy storage keys, mirrored on every save for backward compatibility
/// with clients that predate the structured record.
const LEGACY_TOKEN_KEY: &str = "userToken";
const LEGACY_EMAIL_KEY: &str = "userEmail";

/// Session lifetime in milliseconds (1 hour).
pub const SESSION_DURATION_MS: i64 = 3_600_000;

/// One authenticated user's login state. Either all fields are set and the
/// record is persisted, or the session is absent; there is no partial state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub email: String,
    pub token: String,
    /// Issue time, serialized as epoch milliseconds to match the record
    /// format the legacy browser client wrote.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl SessionData {
    pub fn is_expired(&self) -> bool {
        Utc::now() - self.timestamp > Duration::milliseconds(SESSION_DURATION_MS)
    }

    /// Milliseconds remaining until expiry (for display), clamped at zero.
    pub fn ms_until_expiry(&self) -> i64 {
        let expiry = self.timestamp + Duration::milliseconds(SESSION_DURATION_MS);
        (expiry - Utc::now()).num_milliseconds().max(0)
    }
}

/// Durable session state over a key-value storage directory (one file per
/// key). All storage failures are caught here and degrade to "no session";
/// callers must always be able to fall back to the login flow.
pub struct SessionStore {
    storage_dir: PathBuf,
    current: Option<SessionData>,
}

impl SessionStore {
    pub fn new(storage_dir: PathBuf) -> Self {
        Self {
            storage_dir,
            current: None,
        }
    }

    /// Persist a new session and update in-memory state.
    ///
    /// Returns whether the write succeeded. Storage failures are logged and
    /// reported as `false`, never raised.
    pub fn save(&mut self, email: &str, token: &str) -> bool {
        let data = SessionData {
            email: email.to_string(),
            token: token.to_string(),
            timestamp: Utc::now(),
        };
        match self.persist(&data) {
            Ok(()) => {
                self.current = Some(data);
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to persist session");
                false
            }
        }
    }

    /// Load the session from storage.
    ///
    /// A fresh structured record populates in-memory state and returns
    /// `true`. An expired or corrupt record clears everything and returns
    /// `false`. When the structured record is absent, a matching pair of
    /// legacy keys is adopted and migrated to the structured format.
    pub fn load(&mut self) -> bool {
        match self.read_key(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<SessionData>(&raw) {
                Ok(data) if !data.is_expired() => {
                    self.current = Some(data);
                    true
                }
                Ok(_) => {
                    debug!("stored session expired");
                    self.clear();
                    false
                }
                Err(err) => {
                    warn!(error = %err, "corrupt session record");
                    self.clear();
                    false
                }
            },
            Ok(None) => self.load_legacy(),
            Err(err) => {
                warn!(error = %err, "failed to read session storage");
                self.clear();
                false
            }
        }
    }

    /// Remove all session keys and reset in-memory state. Idempotent; safe
    /// to call when no session exists.
    pub fn clear(&mut self) {
        self.current = None;
        for key in [SESSION_KEY, LEGACY_TOKEN_KEY, LEGACY_EMAIL_KEY] {
            if let Err(err) = self.remove_key(key) {
                warn!(key, error = %err, "failed to remove session key");
            }
        }
    }

    /// The active session, if any.
    pub fn current(&self) -> Option<&SessionData> {
        self.current.as_ref()
    }

    /// Bearer token of the active session, if any.
    pub fn token(&self) -> Option<String> {
        self.current.as_ref().map(|d| d.token.clone())
    }

    /// Email of the active session, if any.
    pub fn email(&self) -> Option<String> {
        self.current.as_ref().map(|d| d.email.clone())
    }

    /// Fallback for the pre-structured format: two standalone keys. A
    /// matching pair counts as a valid session and is re-persisted in the
    /// structured format; the migration write failing does not undo the
    /// adoption.
    fn load_legacy(&mut self) -> bool {
        let token = self.read_legacy_value(LEGACY_TOKEN_KEY);
        let email = self.read_legacy_value(LEGACY_EMAIL_KEY);
        match (email, token) {
            (Some(email), Some(token)) => {
                debug!("migrating legacy session record");
                self.current = Some(SessionData {
                    email: email.clone(),
                    token: token.clone(),
                    timestamp: Utc::now(),
                });
                self.save(&email, &token);
                true
            }
            _ => false,
        }
    }

    fn read_legacy_value(&self, key: &str) -> Option<String> {
        self.read_key(key)
            .ok()
            .flatten()
            .filter(|value| !value.is_empty())
    }

    fn persist(&self, data: &SessionData) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.storage_dir)?;
        let record = serde_json::to_string(data)?;
        std::fs::write(self.key_path(SESSION_KEY), record)?;
        std::fs::write(self.key_path(LEGACY_TOKEN_KEY), &data.token)?;
        std::fs::write(self.key_path(LEGACY_EMAIL_KEY), &data.email)?;
        Ok(())
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.storage_dir.join(key)
    }

    fn read_key(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn remove_key(&self, key: &str) -> io::Result<()> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}
