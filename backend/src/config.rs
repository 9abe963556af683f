//! # Backend Configuration
//!
//! Loaded from environment variables (after `dotenvy::dotenv()` in `main`)
//! and validated on startup.
//!
//! | Variable              | Default                 |
//! |-----------------------|-------------------------|
//! | `BIND_ADDRESS`        | `127.0.0.1:3001`        |
//! | `PUBLIC_DIR`          | `chat-widget/dist`      |
//! | `ALLOWED_ORIGINS`     | local dev origins       |
//! | `RATE_LIMIT_PER_HOUR` | `30`                    |
//! | `ASSISTANT_NAME`      | `Samm`                  |
//! | `AI_MODEL`            | `gpt-4o-mini`           |
//! | `OPENAI_API_KEY`      | none                    |
//! | `AI_SYSTEM_PROMPT`    | built-in renovation prompt |
//! | `AI_TEMPERATURE`      | `0.7`                   |
//! | `AI_MAX_TOKENS`       | `500`                   |
//! | `AI_CONTEXT_WINDOW`   | `20`                    |

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::assistant::AssistantConfig;
use crate::rate_limit::DEFAULT_LIMIT_PER_HOUR;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: String,
    /// Directory holding the built widget (`index.html` + wasm bundle)
    pub public_dir: PathBuf,
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_hour: u32,
    pub assistant: AssistantConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".to_string(),
            public_dir: PathBuf::from("chat-widget/dist"),
            allowed_origins: vec![
                "http://localhost:3001".to_string(),
                "http://127.0.0.1:3001".to_string(),
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
            rate_limit_per_hour: DEFAULT_LIMIT_PER_HOUR,
            assistant: AssistantConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables
    /// take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();
        let assistant_defaults = defaults.assistant;

        let allowed_origins = match var("ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => defaults.allowed_origins,
        };

        let assistant = AssistantConfig {
            name: var("ASSISTANT_NAME").unwrap_or(assistant_defaults.name),
            model: var("AI_MODEL").unwrap_or(assistant_defaults.model),
            api_key: var("OPENAI_API_KEY").unwrap_or_default(),
            system_prompt: var("AI_SYSTEM_PROMPT").unwrap_or(assistant_defaults.system_prompt),
            temperature: parse_or("AI_TEMPERATURE", var("AI_TEMPERATURE"), assistant_defaults.temperature)?,
            max_tokens: parse_or("AI_MAX_TOKENS", var("AI_MAX_TOKENS"), assistant_defaults.max_tokens)?,
            context_window: parse_or(
                "AI_CONTEXT_WINDOW",
                var("AI_CONTEXT_WINDOW"),
                assistant_defaults.context_window,
            )?,
        };

        Ok(Self {
            bind_address: var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            public_dir: var("PUBLIC_DIR").map(PathBuf::from).unwrap_or(defaults.public_dir),
            allowed_origins,
            rate_limit_per_hour: parse_or(
                "RATE_LIMIT_PER_HOUR",
                var("RATE_LIMIT_PER_HOUR"),
                defaults.rate_limit_per_hour,
            )?,
            assistant,
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        self.bind_address
            .parse::<SocketAddr>()
            .map_err(|e| format!("BIND_ADDRESS must be host:port: {}", e))?;

        if self.rate_limit_per_hour == 0 {
            return Err("RATE_LIMIT_PER_HOUR must be at least 1".to_string());
        }

        if !(0.0..=2.0).contains(&self.assistant.temperature) {
            return Err("AI_TEMPERATURE must be between 0.0 and 2.0".to_string());
        }

        if self.assistant.max_tokens == 0 {
            return Err("AI_MAX_TOKENS must be at least 1".to_string());
        }

        if self.assistant.context_window == 0 {
            return Err("AI_CONTEXT_WINDOW must be at least 1".to_string());
        }

        if self.assistant.api_key.is_empty() {
            tracing::warn!("OPENAI_API_KEY is not set; /chat will answer 503");
        }

        Ok(())
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("{} must be a valid number: {}", key, e)),
        None => Ok(default),
    }
}
