use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use tracing::debug;

use crate::config::TwilioConfig;
use crate::errors::{LensbotError, LensbotResult};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Downloads provider-hosted media and returns it base64 encoded.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch_base64(&self, media_url: &str) -> LensbotResult<String>;
}

/// Fetches Twilio-hosted media, authenticating with the account SID and
/// auth token via basic auth.
pub struct TwilioImageFetcher {
    account_sid: String,
    auth_token: String,
    client: Client,
}

impl TwilioImageFetcher {
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            client: Client::builder()
                .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

#[async_trait]
impl ImageFetcher for TwilioImageFetcher {
    async fn fetch_base64(&self, media_url: &str) -> LensbotResult<String> {
        let resp = self
            .client
            .get(media_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .header("Accept", "image/*")
            .send()
            .await
            .map_err(|e| LensbotError::Download(format!("request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(LensbotError::Download(format!(
                "media server returned {}",
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| LensbotError::Download(format!("failed to read body: {}", e)))?;
        debug!("downloaded media: {} bytes", bytes.len());

        Ok(base64::engine::general_purpose::STANDARD.encode(&bytes))
    }
}
