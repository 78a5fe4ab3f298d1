//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handling never reads process-wide environment variables.
//!
//! Values are looked up through a caller-supplied function rather than `std::env` directly,
//! so binaries pass `|k| std::env::var(k).ok()` and tests pass a map.

use crate::constants::{
    env, DEFAULT_DATABASE_URL, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL,
    DEFAULT_SUMMARISER_TIMEOUT_SECS, DEFAULT_SUMMARY_MAX_TOKENS, DEFAULT_UPLOAD_DIR,
};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Settings for the OpenAI-compatible summarisation service.
#[derive(Clone)]
pub struct OpenAiConfig {
    api_key: String,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl OpenAiConfig {
    /// Create a new `OpenAiConfig`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if the key or model is blank, the base URL is not
    /// http(s), or the timeout is zero.
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        timeout_secs: u64,
    ) -> CoreResult<Self> {
        if api_key.trim().is_empty() {
            return Err(CoreError::InvalidConfig("API key cannot be empty".into()));
        }
        if model.trim().is_empty() {
            return Err(CoreError::InvalidConfig("model cannot be empty".into()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CoreError::InvalidConfig(format!(
                "summariser base url must be http(s): {}",
                base_url
            )));
        }
        if timeout_secs == 0 {
            return Err(CoreError::InvalidConfig(
                "summariser timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.trim().to_string(),
            timeout_secs,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    upload_dir: PathBuf,
    database_url: String,
    openai: OpenAiConfig,
    summary_max_tokens: u32,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        upload_dir: PathBuf,
        database_url: String,
        openai: OpenAiConfig,
        summary_max_tokens: u32,
    ) -> CoreResult<Self> {
        if database_url.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "database_url cannot be empty".into(),
            ));
        }
        if summary_max_tokens == 0 {
            return Err(CoreError::InvalidConfig(
                "summary_max_tokens must be greater than zero".into(),
            ));
        }

        Ok(Self {
            upload_dir,
            database_url: database_url.trim().to_string(),
            openai,
            summary_max_tokens,
        })
    }

    /// Resolve the full configuration from a key lookup, applying defaults.
    ///
    /// `OPENAI_API_KEY` is the only required setting.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let value = |key: &str| non_blank(lookup(key));

        let api_key = value(env::OPENAI_API_KEY).ok_or(CoreError::MissingSetting(
            env::OPENAI_API_KEY,
        ))?;
        let openai = OpenAiConfig::new(
            api_key,
            value(env::OPENAI_BASE_URL).unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into()),
            value(env::OPENAI_MODEL).unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into()),
            parse_env_value(
                env::SUMMARISER_TIMEOUT_SECS,
                lookup(env::SUMMARISER_TIMEOUT_SECS),
                DEFAULT_SUMMARISER_TIMEOUT_SECS,
            )?,
        )?;

        Self::new(
            value(env::UPLOAD_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            value(env::DATABASE_URL).unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            openai,
            parse_env_value(
                env::SUMMARY_MAX_TOKENS,
                lookup(env::SUMMARY_MAX_TOKENS),
                DEFAULT_SUMMARY_MAX_TOKENS,
            )?,
        )
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn openai(&self) -> &OpenAiConfig {
        &self.openai
    }

    pub fn summary_max_tokens(&self) -> u32 {
        self.summary_max_tokens
    }
}

/// Parse an optional string value, falling back to `default`.
///
/// If `value` is `None` or empty/whitespace, returns `default`.
pub fn parse_env_value<T>(name: &str, value: Option<String>, default: T) -> CoreResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_blank(value) {
        None => Ok(default),
        Some(v) => v
            .parse::<T>()
            .map_err(|e| CoreError::InvalidConfig(format!("{}={:?}: {}", name, v, e))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_api_key_is_set() {
        let cfg = CoreConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(cfg.upload_dir(), Path::new("uploads"));
        assert_eq!(cfg.database_url(), "sqlite://submissions.db");
        assert_eq!(cfg.summary_max_tokens(), 500);
        assert_eq!(cfg.openai().api_key(), "sk-test");
        assert_eq!(cfg.openai().base_url(), "https://api.openai.com");
        assert_eq!(cfg.openai().model(), "gpt-3.5-turbo");
        assert_eq!(cfg.openai().timeout_secs(), 120);
    }

    #[test]
    fn missing_api_key_is_reported() {
        let err = CoreConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, CoreError::MissingSetting("OPENAI_API_KEY")));
    }

    #[test]
    fn overrides_are_trimmed_and_applied() {
        let cfg = CoreConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:8080/"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("SUMMARY_MAX_TOKENS", " 250 "),
            ("UPLOAD_DIR", "/srv/reports"),
            ("DATABASE_URL", ":memory:"),
        ]))
        .unwrap();

        assert_eq!(cfg.openai().base_url(), "http://localhost:8080");
        assert_eq!(cfg.openai().model(), "gpt-4o-mini");
        assert_eq!(cfg.summary_max_tokens(), 250);
        assert_eq!(cfg.upload_dir(), Path::new("/srv/reports"));
        assert_eq!(cfg.database_url(), ":memory:");
    }

    #[test]
    fn zero_max_tokens_is_rejected() {
        let err = CoreConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("SUMMARY_MAX_TOKENS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let err = parse_env_value::<u16>("PORT", Some("eighty".into()), 3000).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn blank_value_uses_default() {
        assert_eq!(parse_env_value::<u16>("PORT", Some("  ".into()), 3000).unwrap(), 3000);
        assert_eq!(parse_env_value::<u16>("PORT", None, 3000).unwrap(), 3000);
        assert_eq!(parse_env_value::<u16>("PORT", Some("8081".into()), 3000).unwrap(), 8081);
    }

    #[test]
    fn base_url_must_be_http() {
        let err = OpenAiConfig::new("k".into(), "ftp://x".into(), "m".into(), 5).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let cfg = OpenAiConfig::new("sk-secret".into(), "https://x".into(), "m".into(), 5).unwrap();
        let rendered = format!("{:?}", cfg);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
