//! Application configuration.
//!
//! Environment variables (and `.env` via dotenvy, loaded in main) are read
//! here once and turned into a plain struct; nothing below the composition
//! root touches ambient process state.

use std::env;
use std::path::PathBuf;
use textlens_core::error::LensError;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OUTPUT_DIR: &str = "output";

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_base: Option<String>,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub output_dir: PathBuf,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// A missing API key is a credential error, reported before any call is
    /// attempted.
    pub fn from_env() -> Result<Self, LensError> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LensError::credential(
                    "OPENAI_API_KEY is not set; export it or add it to your .env file",
                )
            })?;

        Ok(Self {
            api_key,
            api_base: env::var("OPENAI_API_BASE").ok(),
            model: env::var("TEXTLENS_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            temperature: parse_optional("TEXTLENS_TEMPERATURE")?,
            max_tokens: parse_optional("TEXTLENS_MAX_TOKENS")?,
            output_dir: env::var("TEXTLENS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        })
    }
}

fn parse_optional<T: std::str::FromStr>(name: &str) -> Result<Option<T>, LensError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| LensError::configuration(format!("{name} has an invalid value: {raw}"))),
        Err(_) => Ok(None),
    }
}
