//! Provider configuration and credential storage
//!
//! The API key is an explicit value handed to the provider call. Where it is
//! persisted is behind [`CredentialStore`]; the pipeline never reads ambient
//! storage itself.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Name the API key is stored under.
pub const API_KEY_NAME: &str = "gemini_api_key";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
/// API root; the client appends the versioned `models/...` path.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("API Key Required: please enter a valid Gemini API key to continue")]
    EmptyKey,

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Credential file is corrupt: {0}")]
    Corrupt(String),
}

/// A non-blank API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Trims surrounding whitespace; rejects blank keys.
    pub fn new(key: impl AsRef<str>) -> Result<Self, CredentialError> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            return Err(CredentialError::EmptyKey);
        }
        Ok(ApiKey(key.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Everything but the last four characters replaced with `*`.
    pub fn masked(&self) -> String {
        let count = self.0.chars().count();
        let visible = count.min(4);
        let tail: String = self.0.chars().skip(count - visible).collect();
        format!("{}{}", "*".repeat(count - visible), tail)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Opaque key-value persistence for secrets.
pub trait CredentialStore {
    fn get(&self, name: &str) -> Result<Option<String>, CredentialError>;
    fn set(&mut self, name: &str, value: &str) -> Result<(), CredentialError>;
    fn remove(&mut self, name: &str) -> Result<(), CredentialError>;
}

/// In-process store, used when nothing should touch the disk.
#[derive(Debug, Default, Clone)]
pub struct MemoryCredentialStore {
    entries: BTreeMap<String, String>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, name: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.entries.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), CredentialError> {
        self.entries.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), CredentialError> {
        self.entries.remove(name);
        Ok(())
    }
}

/// Validate and persist the API key.
pub fn save_api_key(
    store: &mut dyn CredentialStore,
    key: &str,
) -> Result<ApiKey, CredentialError> {
    let key = ApiKey::new(key)?;
    store.set(API_KEY_NAME, key.expose())?;
    Ok(key)
}

/// Pick the API key: an explicit value first, then the store.
///
/// Blank values count as absent.
pub fn resolve_api_key(
    explicit: Option<&str>,
    store: &dyn CredentialStore,
) -> Result<Option<ApiKey>, CredentialError> {
    if let Some(key) = explicit.and_then(|key| ApiKey::new(key).ok()) {
        return Ok(Some(key));
    }

    Ok(store
        .get(API_KEY_NAME)?
        .and_then(|stored| ApiKey::new(stored).ok()))
}

/// Everything the provider call needs, passed explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: ApiKey,
    pub model: String,
    pub base_url: String,
}

impl ProviderConfig {
    pub fn new(api_key: ApiKey) -> Self {
        ProviderConfig {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
