//! Runtime configuration, built from environment variables.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Backend base URL used when `INTERVIEW_ASSIST_ENV` is `development`.
pub const DEV_BACKEND_URL: &str = "http://localhost:8080/api";

/// Backend base URL used when `INTERVIEW_ASSIST_ENV` is `production`.
pub const PROD_BACKEND_URL: &str = "https://api.interview-assist.app/api";

/// Which source variant serves questions and feedback.
///
/// Fixed at startup; not user-togglable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceBackend {
    /// Deterministic in-process pools. Never fails, needs no credentials.
    #[default]
    Mock,
    /// The Gemini generative-language API.
    Gemini,
    /// The companion REST backend.
    Backend,
}

impl std::str::FromStr for SourceBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "gemini" => Ok(Self::Gemini),
            "backend" => Ok(Self::Backend),
            other => Err(format!("Unknown source backend: {other}")),
        }
    }
}

impl std::fmt::Display for SourceBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Mock => "mock",
            Self::Gemini => "gemini",
            Self::Backend => "backend",
        };
        write!(f, "{s}")
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Active source variant.
    pub source: SourceBackend,
    /// Base URL of the companion backend (when that variant is active).
    pub backend_url: String,
    /// Gemini API key (when that variant is active). Sent only in the
    /// `x-goog-api-key` request header.
    pub gemini_api_key: Option<SecretString>,
    /// Upper bound on questions per session; sources may return fewer.
    pub max_questions: usize,
    /// Suggested per-question time limit, shown by the CLI front-end.
    pub question_time_limit_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceBackend::default(),
            backend_url: DEV_BACKEND_URL.to_string(),
            gemini_api_key: None,
            max_questions: 10,
            question_time_limit_secs: 120,
        }
    }
}

impl AppConfig {
    /// Build config from environment variables, defaulting every unset
    /// field. An unrecognized source switch is an error rather than a
    /// silent fallback; the numeric knobs are lenient.
    ///
    /// - `INTERVIEW_ASSIST_SOURCE`: `mock` (default) | `gemini` | `backend`
    /// - `INTERVIEW_ASSIST_ENV`: `development` (default) | `production`
    /// - `INTERVIEW_ASSIST_BACKEND_URL`: overrides the env-selected base URL
    /// - `GEMINI_API_KEY`: overrides the keystore-loaded key
    /// - `INTERVIEW_ASSIST_MAX_QUESTIONS`, `INTERVIEW_ASSIST_TIME_LIMIT_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let source = match std::env::var("INTERVIEW_ASSIST_SOURCE") {
            Ok(s) => s.parse().map_err(|message| ConfigError::InvalidValue {
                key: "INTERVIEW_ASSIST_SOURCE".to_string(),
                message,
            })?,
            Err(_) => SourceBackend::default(),
        };

        let is_production = std::env::var("INTERVIEW_ASSIST_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let backend_url = std::env::var("INTERVIEW_ASSIST_BACKEND_URL").unwrap_or_else(|_| {
            if is_production {
                PROD_BACKEND_URL.to_string()
            } else {
                DEV_BACKEND_URL.to_string()
            }
        });

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from);

        let max_questions: usize = std::env::var("INTERVIEW_ASSIST_MAX_QUESTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let question_time_limit_secs: u64 = std::env::var("INTERVIEW_ASSIST_TIME_LIMIT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(120);

        Ok(Self {
            source,
            backend_url,
            gemini_api_key,
            max_questions,
            question_time_limit_secs,
        })
    }
}
