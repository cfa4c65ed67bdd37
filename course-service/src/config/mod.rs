use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Response-length cap sent to the provider when none is configured.
const DEFAULT_MAX_TOKENS: u32 = 200;

/// Upper bound on a single provider call.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert course creator";

#[derive(Debug, Clone)]
pub struct CourseConfig {
    pub common: core_config::Config,
    pub provider: ProviderSettings,
    pub generation: GenerationConfig,
    /// OTLP collector for span export. Logs only when unset.
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub system_prompt: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Which text-generation backend to use, with its credentials.
#[derive(Debug, Clone)]
pub enum ProviderSettings {
    OpenAi(OpenAiConfig),
    Gemini(GeminiConfig),
    Mock,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Secret<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "Unknown GENAI_PROVIDER '{}': expected openai, gemini or mock",
                other
            ))),
        }
    }
}

impl CourseConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the service config from a key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod";
        let get = |key: &str, default: Option<&str>| get_env(&lookup, key, default, is_prod);

        let provider = match get("GENAI_PROVIDER", Some("openai"))?.parse::<ProviderKind>()? {
            ProviderKind::OpenAi => ProviderSettings::OpenAi(OpenAiConfig {
                api_key: Secret::new(get("OPENAI_API_KEY", None)?),
                base_url: get("OPENAI_BASE_URL", Some("https://api.openai.com/v1"))?,
                model: get("OPENAI_MODEL", Some("gpt-3.5-turbo"))?,
            }),
            ProviderKind::Gemini => ProviderSettings::Gemini(GeminiConfig {
                api_key: Secret::new(get("GOOGLE_API_KEY", None)?),
                model: get("GEMINI_MODEL", Some("gemini-2.0-flash"))?,
            }),
            ProviderKind::Mock => ProviderSettings::Mock,
        };

        let generation = GenerationConfig {
            system_prompt: get("GENAI_SYSTEM_PROMPT", Some(DEFAULT_SYSTEM_PROMPT))?,
            max_tokens: parse_positive(
                "GENAI_MAX_TOKENS",
                &get("GENAI_MAX_TOKENS", Some(&DEFAULT_MAX_TOKENS.to_string()))?,
            )?,
            timeout: Duration::from_secs(parse_positive(
                "GENAI_TIMEOUT_SECS",
                &get("GENAI_TIMEOUT_SECS", Some(&DEFAULT_TIMEOUT_SECS.to_string()))?,
            )?),
        };

        Ok(CourseConfig {
            common,
            provider,
            generation,
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|s| !s.is_empty()),
        })
    }

    /// Config for tests and local runs: mock provider, random port.
    pub fn for_mock_provider() -> Self {
        CourseConfig {
            common: core_config::Config {
                port: 0,
                ..core_config::Config::default()
            },
            provider: ProviderSettings::Mock,
            generation: GenerationConfig::default(),
            otlp_endpoint: None,
        }
    }
}

fn parse_positive<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(v) if v > T::default() => Ok(v),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be a positive integer, got '{}'",
            key,
            raw
        ))),
    }
}

fn get_env<F>(lookup: &F, key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
