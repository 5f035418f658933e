use crate::{
    error::GenerationCause,
    models::{
        gemini::{
            Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
            InlineData, Modality, Part,
        },
        EncodedPart, ImagePart, PromptSpec,
    },
};
use reqwest::Client;

const MAX_ERROR_BODY: usize = 512;

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl ImageClient {
    pub fn new(client: Client, api_key: String, base_url: &str, model: &str) -> Self {
        let model = model.trim_start_matches("models/");
        Self {
            client,
            api_key,
            endpoint: format!(
                "{}/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one image with one prompt and returns every inline image in the
    /// first candidate, in response order. Text parts are dropped.
    pub async fn generate(
        &self,
        image: &EncodedPart,
        prompt: &PromptSpec,
    ) -> Result<Vec<ImagePart>, GenerationCause> {
        let request = build_request(image, prompt);

        log::debug!("POST {} ({} chars of image data)", self.endpoint, image.data.len());

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationCause::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationCause::Status {
                status: status.as_u16(),
                body: error_body(response.text().await),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenerationCause::Transport(e.to_string()))?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|e| GenerationCause::Decode(e.to_string()))?;

        Ok(extract_image_parts(parsed))
    }
}

/// Error bodies are kept for the log, capped at `MAX_ERROR_BODY` bytes.
fn error_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    let mut body = match body {
        Ok(body) => body,
        Err(e) => return format!("<unreadable body: {}>", e),
    };
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}

fn build_request(image: &EncodedPart, prompt: &PromptSpec) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: None,
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
                Part::Text {
                    text: prompt.text().to_string(),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec![Modality::Image],
        },
    }
}

fn extract_image_parts(response: GenerateContentResponse) -> Vec<ImagePart> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Vec::new();
    };
    if let Some(reason) = candidate.finish_reason.as_deref() {
        log::debug!("Candidate finished with {}", reason);
    }

    candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| match part {
            Part::InlineData { inline_data } => {
                Some(ImagePart::new(inline_data.mime_type, inline_data.data))
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PROMPT: PromptSpec = PromptSpec::new("plain white background");

    fn encoded() -> EncodedPart {
        EncodedPart {
            mime_type: "image/png".into(),
            data: "aGVsbG8=".into(),
        }
    }

    fn client_for(server: &MockServer) -> ImageClient {
        ImageClient::new(
            Client::new(),
            "test-key".into(),
            &server.uri(),
            "gemini-2.5-flash-image",
        )
    }

    #[test]
    fn test_endpoint_normalization() {
        let client = ImageClient::new(
            Client::new(),
            "k".into(),
            "https://example.test/v1beta/",
            "models/gemini-2.5-flash-image",
        );
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }

    #[test]
    fn test_error_body_keeps_read_failures_and_caps_length() {
        assert_eq!(
            error_body::<String>(Err("connection reset".into())),
            "<unreadable body: connection reset>"
        );
        assert_eq!(error_body::<String>(Ok("quota".into())), "quota");

        let long = "é".repeat(MAX_ERROR_BODY);
        let capped = error_body::<String>(Ok(long));
        assert!(capped.len() <= MAX_ERROR_BODY);
        assert!(capped.chars().all(|c| c == 'é'));
    }

    #[tokio::test]
    async fn test_sends_image_then_prompt_and_returns_parts_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash-image:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_json(json!({
                "contents": [{
                    "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "aGVsbG8=" } },
                        { "text": "plain white background" }
                    ]
                }],
                "generationConfig": { "responseModalities": ["IMAGE"] }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [
                            { "inlineData": { "mimeType": "image/png", "data": "Zmlyc3Q=" } },
                            { "text": "some commentary" },
                            { "inlineData": { "mimeType": "image/jpeg", "data": "c2Vjb25k" } }
                        ]
                    },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let parts = client_for(&server)
            .generate(&encoded(), &PROMPT)
            .await
            .unwrap();

        assert_eq!(
            parts,
            vec![
                ImagePart::new("image/png", "Zmlyc3Q="),
                ImagePart::new("image/jpeg", "c2Vjb25k"),
            ]
        );
    }

    #[tokio::test]
    async fn test_declined_response_is_empty_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let parts = client_for(&server)
            .generate(&encoded(), &PROMPT)
            .await
            .unwrap();
        assert!(parts.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_becomes_status_cause() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate(&encoded(), &PROMPT)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GenerationCause::Status {
                status: 429,
                body: "RESOURCE_EXHAUSTED".into()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body_becomes_decode_cause() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate(&encoded(), &PROMPT)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationCause::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_becomes_transport_cause() {
        let client = ImageClient::new(
            Client::new(),
            "k".into(),
            "http://127.0.0.1:1",
            "gemini-2.5-flash-image",
        );
        let err = client.generate(&encoded(), &PROMPT).await.unwrap_err();
        assert!(matches!(err, GenerationCause::Transport(_)));
    }
}
