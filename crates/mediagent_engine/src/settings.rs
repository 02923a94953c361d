use url::Url;

use crate::ApiError;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
/// Environment variable selecting the backend base URL.
pub const API_URL_ENV: &str = "MEDIAGENT_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Validated base URL without a trailing slash.
    base_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl ApiSettings {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let trimmed = raw.trim();
        let url = Url::parse(trimmed)
            .map_err(|err| ApiError::InvalidUrl(format!("{trimmed}: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{trimmed}: expected an http or https address"
            )));
        }
        // Endpoint paths are appended to the base, so it must end at the path.
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ApiError::InvalidUrl(format!(
                "{trimmed}: query strings and fragments are not supported"
            )));
        }
        Ok(Self {
            base_url: trimmed.trim_end_matches('/').to_string(),
        })
    }

    /// Interprets the value of [`API_URL_ENV`]; unset or blank selects
    /// [`DEFAULT_API_URL`].
    pub fn from_env_value(value: Option<&str>) -> Result<Self, ApiError> {
        match value {
            Some(raw) if !raw.trim().is_empty() => Self::parse(raw),
            _ => Ok(Self::default()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
