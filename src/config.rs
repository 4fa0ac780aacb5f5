use std::fmt;

use anyhow::{Context, Result};

/// Runtime configuration, sourced from the environment.
///
/// Every variable is required; loading fails fast naming the missing
/// variable. Call `dotenvy::dotenv()` before [`Config::from_env`] to honor a
/// `.env` file.
#[derive(Debug, Clone)]
pub struct Config {
    pub twilio: TwilioConfig,
    pub completion: CompletionConfig,
}

/// Twilio credentials for authenticating media downloads.
#[derive(Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub phone_number: String,
}

/// Completion API endpoint and credentials.
#[derive(Clone)]
pub struct CompletionConfig {
    /// Full chat-completions URL, e.g. an Azure OpenAI deployment URL.
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            twilio: TwilioConfig {
                account_sid: require("TWILIO_ACCOUNT_SID")?,
                auth_token: require("TWILIO_AUTH_TOKEN")?,
                phone_number: require("TWILIO_NUMBER")?,
            },
            completion: CompletionConfig {
                endpoint: require("OPENAI_ENDPOINT")?,
                api_key: require("OPENAI_API_KEY")?,
                model: require("OPENAI_MODEL")?,
            },
        })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("missing required environment variable {}", name))
}

// Credentials must never reach logs, so Debug redacts them.
impl fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &"<redacted>")
            .field("auth_token", &"<redacted>")
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}
