use std::path::Path;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::types::{EngineId, OcrBackend};
use super::ExtractionError;

/// HTTP adapter for an EasyOCR sidecar service.
///
/// The sidecar exposes `POST /ocr` taking the image as base64 and answering
/// with the recognized text. Running the recognizer out of process keeps its
/// model memory out of this process and lets it be restarted independently.
pub struct EasyOcrBackend {
    base_url: String,
    client: reqwest::Client,
}

impl EasyOcrBackend {
    /// Create a backend pointing at the sidecar, e.g. `http://localhost:8866`.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractionError::EngineInit(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

/// Request body for POST /ocr
#[derive(Serialize)]
struct OcrRequest<'a> {
    image: &'a str,
}

/// Response body from POST /ocr
#[derive(Deserialize)]
struct OcrResponse {
    text: String,
}

#[async_trait]
impl OcrBackend for EasyOcrBackend {
    fn engine(&self) -> EngineId {
        EngineId::EasyOcr
    }

    async fn extract(&self, image_path: &Path) -> Result<String, ExtractionError> {
        let bytes = tokio::fs::read(image_path).await?;
        let encoded = BASE64.encode(&bytes);

        let url = format!("{}/ocr", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&OcrRequest { image: &encoded })
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

        let parsed: OcrResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::ResponseParsing(e.to_string()))?;

        Ok(parsed.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_trims_trailing_slash() {
        let backend = EasyOcrBackend::new("http://localhost:8866/", 20).unwrap();
        assert_eq!(backend.base_url, "http://localhost:8866");
    }

    #[test]
    fn reports_easyocr_engine() {
        let backend = EasyOcrBackend::new("http://localhost:8866", 20).unwrap();
        assert_eq!(backend.engine(), EngineId::EasyOcr);
    }

    #[tokio::test]
    async fn missing_image_is_io_error() {
        let backend = EasyOcrBackend::new("http://localhost:8866", 20).unwrap();
        let result = backend.extract(Path::new("/nonexistent/rx.jpg")).await;
        assert!(matches!(result, Err(ExtractionError::Io(_))));
    }
}
