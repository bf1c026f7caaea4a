pub mod image_client;

use crate::{
    config::GeminiConfig,
    error::{AvatarError, Result},
};
use std::sync::Arc;

pub use image_client::ImageClient;

#[derive(Clone)]
pub struct GeminiClient {
    image_client: ImageClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AvatarError::ConfigError("GEMINI_API_KEY is required".into()))?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AvatarError::ConfigError(e.to_string()))?;

        Ok(Self {
            image_client: ImageClient::new(client, config.base_url, config.model, api_key),
        })
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    /// The image client as a shareable generation collaborator.
    pub fn generator(&self) -> Arc<ImageClient> {
        Arc::new(self.image_client.clone())
    }
}
