use std::path::Path;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::types::{EngineId, OcrBackend};
use super::ExtractionError;

const VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// HTTP adapter for the Google Vision `images:annotate` REST endpoint,
/// requesting dense document text detection.
pub struct GoogleVisionBackend {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl GoogleVisionBackend {
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ExtractionError> {
        if api_key.trim().is_empty() {
            return Err(ExtractionError::EngineInit(
                "Google Vision API key is empty".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractionError::EngineInit(e.to_string()))?;

        Ok(Self {
            endpoint: VISION_ENDPOINT.to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    /// Point the adapter at a different endpoint (for testing).
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<ImageRequest>,
}

#[derive(Serialize)]
struct ImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Deserialize)]
struct ImageResponse {
    #[serde(rename = "fullTextAnnotation")]
    full_text_annotation: Option<TextAnnotation>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct TextAnnotation {
    text: String,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

#[async_trait]
impl OcrBackend for GoogleVisionBackend {
    fn engine(&self) -> EngineId {
        EngineId::GoogleVision
    }

    async fn extract(&self, image_path: &Path) -> Result<String, ExtractionError> {
        let bytes = tokio::fs::read(image_path).await?;

        let body = AnnotateRequest {
            requests: vec![ImageRequest {
                image: ImageContent {
                    content: BASE64.encode(&bytes),
                },
                features: vec![Feature {
                    kind: "DOCUMENT_TEXT_DETECTION",
                }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractionError::HttpClient(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::ResponseParsing(e.to_string()))?;

        let image_response = parsed
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| ExtractionError::ResponseParsing("annotate reply was empty".into()))?;

        if let Some(error) = image_response.error {
            return Err(ExtractionError::Engine(error.message));
        }

        // No annotation means the service found no text in the image.
        Ok(image_response
            .full_text_annotation
            .map(|a| a.text)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        let result = GoogleVisionBackend::new("   ", 20);
        assert!(matches!(result, Err(ExtractionError::EngineInit(_))));
    }

    #[test]
    fn default_endpoint_is_annotate() {
        let backend = GoogleVisionBackend::new("test-key", 20).unwrap();
        assert_eq!(backend.endpoint, VISION_ENDPOINT);
        assert_eq!(backend.engine(), EngineId::GoogleVision);
    }

    #[test]
    fn endpoint_override_trims_trailing_slash() {
        let backend = GoogleVisionBackend::new("test-key", 20)
            .unwrap()
            .with_endpoint("http://localhost:9099/");
        assert_eq!(backend.endpoint, "http://localhost:9099");
    }

    #[test]
    fn reply_without_annotation_decodes_to_empty_text() {
        let reply = r#"{"responses":[{}]}"#;
        let parsed: AnnotateResponse = serde_json::from_str(reply).unwrap();
        let first = parsed.responses.into_iter().next().unwrap();
        assert!(first.full_text_annotation.is_none());
        assert!(first.error.is_none());
    }

    #[test]
    fn reply_with_error_decodes_message() {
        let reply = r#"{"responses":[{"error":{"code":7,"message":"quota exceeded"}}]}"#;
        let parsed: AnnotateResponse = serde_json::from_str(reply).unwrap();
        let first = parsed.responses.into_iter().next().unwrap();
        assert_eq!(first.error.unwrap().message, "quota exceeded");
    }
}
