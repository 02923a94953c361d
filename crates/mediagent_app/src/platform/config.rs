use mediagent_engine::{ApiError, ApiSettings, API_URL_ENV};

/// Backend settings from the `--api-url` flag, then the env value, then the default.
pub fn resolve_settings(flag: Option<&str>, env: Option<&str>) -> Result<ApiSettings, ApiError> {
    match flag {
        Some(raw) => ApiSettings::parse(raw),
        None => ApiSettings::from_env_value(env),
    }
}

/// [`resolve_settings`] against the process environment (`.env` already loaded).
pub fn settings_for_process(flag: Option<&str>) -> Result<ApiSettings, ApiError> {
    resolve_settings(flag, std::env::var(API_URL_ENV).ok().as_deref())
}
