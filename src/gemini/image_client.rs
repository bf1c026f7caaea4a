use crate::{
    error::{AvatarError, Result},
    logger,
    models::{Content, EncodedImage, GenerateContentRequest, GenerateContentResponse, InlineData, Part},
    platform::ImageGenerator,
};
use async_trait::async_trait;
use reqwest::Client;

pub const FESTIVE_PROMPT: &str = "Add a classic red and white Santa Claus Christmas hat to the \
main subject of this image. Fit the hat naturally to the head, matching the lighting, angle and \
art style of the original. Keep everything else exactly the same. Return only the edited image.";

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl ImageClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn supported_models() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("gemini-2.5-flash-image", "Gemini 2.5 Flash Image", "Google"),
            (
                "gemini-2.5-flash-image-preview",
                "Gemini 2.5 Flash Image (preview)",
                "Google",
            ),
            ("gemini-3-pro-image-preview", "Gemini 3 Pro Image", "Google"),
        ]
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    pub fn build_request(image: &EncodedImage, mime_type: &str) -> Result<GenerateContentRequest> {
        let data = image
            .payload()
            .ok_or_else(|| AvatarError::RequestError("image has no base64 payload".into()))?;

        Ok(GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: mime_type.to_string(),
                            data: data.to_string(),
                        }),
                    },
                    Part {
                        text: Some(FESTIVE_PROMPT.to_string()),
                        inline_data: None,
                    },
                ],
            }],
        })
    }

    /// Pulls the first inline image out of a `generateContent` response body.
    pub fn parse_response(body: &str) -> Result<EncodedImage> {
        let response: GenerateContentResponse = serde_json::from_str(body)
            .map_err(|e| AvatarError::ResponseError(e.to_string()))?;

        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| AvatarError::ResponseError("No candidates returned".into()))?;

        let inline = candidate
            .content
            .parts
            .iter()
            .find_map(|part| part.inline_data.as_ref())
            .ok_or_else(|| {
                let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
                AvatarError::GenerationError(format!(
                    "No image generated (finish reason: {})",
                    reason
                ))
            })?;

        Ok(EncodedImage::from_data_url(format!(
            "data:{};base64,{}",
            inline.mime_type, inline.data
        )))
    }

    pub async fn generate(&self, image: &EncodedImage, mime_type: &str) -> Result<EncodedImage> {
        let request = Self::build_request(image, mime_type)?;
        let request_json = serde_json::to_string(&request)
            .map_err(|e| AvatarError::SerializationError(e.to_string()))?;

        log::info!("Generating festive image with model: {}", self.model);
        log::debug!("Request payload size: {} bytes", request_json.len());
        let _timer = logger::timer("generateContent");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(request_json)
            .send()
            .await
            .map_err(|e| {
                log::error!("Image generation transport error: {:?}", e);
                if e.is_timeout() {
                    AvatarError::RequestError(format!("request timed out: {}", e))
                } else {
                    AvatarError::RequestError(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AvatarError::ResponseError(e.to_string()))?;

        if !status.is_success() {
            log::error!("Image service returned {}: {}", status, body);
            return Err(AvatarError::GenerationError(format!(
                "service returned {}",
                status
            )));
        }

        Self::parse_response(&body)
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate(&self, image: &EncodedImage, mime_type: &str) -> Result<EncodedImage> {
        ImageClient::generate(self, image, mime_type).await
    }
}
