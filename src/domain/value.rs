use crate::domain::validation::ValidationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// Telerivet API key.
///
/// Invariant: non-empty after trimming. The key is sent as the Basic-Auth
/// username with an empty password.
pub struct ApiKey(String);

impl ApiKey {
    /// Field name used in validation errors (`api_key`).
    pub const FIELD: &'static str = "api_key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Base URL of the versioned REST API (for example `https://api.telerivet.com/v1`).
///
/// Invariant: parses as an absolute `http`/`https` URL. A trailing slash is dropped
/// so that paths (which always start with `/`) can be appended verbatim.
pub struct ApiUrl(String);

impl ApiUrl {
    /// Create a validated [`ApiUrl`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim().trim_end_matches('/');
        let parsed = url::Url::parse(trimmed).map_err(|_| ValidationError::InvalidUrl {
            input: value.clone(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl { input: value });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join an API path (`/projects/...`) onto the base.
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }
}
