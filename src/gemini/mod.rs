pub mod image_client;

use crate::{
    config::GeminiConfig,
    error::{GenerationCause, PassportError, Result},
    models::{EncodedPart, ImagePart, PromptSpec},
};
use async_trait::async_trait;

pub use image_client::ImageClient;

/// One remote call per (image, prompt) pair. Implementations must not retry.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(
        &self,
        image: &EncodedPart,
        prompt: &PromptSpec,
    ) -> std::result::Result<Vec<ImagePart>, GenerationCause>;
}

/// Process-wide handle to the Gemini API. Build it once at startup and pass
/// it by reference to the orchestrator.
#[derive(Clone)]
pub struct GeminiClient {
    image_client: ImageClient,
    model: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| PassportError::Config(format!("Failed to build HTTP client: {}", e)))?;

        log::debug!("Gemini client ready for model {}", config.model);

        Ok(Self {
            image_client: ImageClient::new(http, api_key, &config.base_url, &config.model),
            model: config.model,
        })
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerationClient for ImageClient {
    async fn generate(
        &self,
        image: &EncodedPart,
        prompt: &PromptSpec,
    ) -> std::result::Result<Vec<ImagePart>, GenerationCause> {
        ImageClient::generate(self, image, prompt).await
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(
        &self,
        image: &EncodedPart,
        prompt: &PromptSpec,
    ) -> std::result::Result<Vec<ImagePart>, GenerationCause> {
        self.image_client.generate(image, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_credential() {
        let err = GeminiClient::new(GeminiConfig::new()).err().unwrap();
        assert!(matches!(err, PassportError::MissingCredential));
    }

    #[test]
    fn test_client_uses_configured_model() {
        let client = GeminiClient::new(
            GeminiConfig::new()
                .with_api_key("key")
                .with_base_url("http://localhost:8080")
                .with_model("custom-image-model"),
        )
        .unwrap();
        assert_eq!(client.model(), "custom-image-model");
        assert_eq!(
            client.image().endpoint(),
            "http://localhost:8080/models/custom-image-model:generateContent"
        );
    }
}
