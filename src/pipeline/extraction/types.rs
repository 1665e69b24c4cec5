use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// The OCR engines the pipeline knows about, in report and prompt order.
///
/// This order is part of the fusion contract: the reasoning prompt labels
/// each text block by engine, and the attribution rules in the prompt refer
/// to these blocks. Reordering is a behavioral change, not a refactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineId {
    Tesseract,
    EasyOcr,
    GoogleVision,
}

impl EngineId {
    pub const ALL: [EngineId; 3] = [EngineId::Tesseract, EngineId::EasyOcr, EngineId::GoogleVision];

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineId::Tesseract => "tesseract",
            EngineId::EasyOcr => "easyocr",
            EngineId::GoogleVision => "google_vision",
        }
    }

    /// Section label for this engine in the fusion prompt.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            EngineId::Tesseract => "TESSERACT OCR",
            EngineId::EasyOcr => "EASYOCR",
            EngineId::GoogleVision => "GOOGLE VISION API",
        }
    }
}

/// Outcome classification for one backend invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionStatus {
    Ok,
    /// The backend failed to initialize at process start and stays out for
    /// the lifetime of the process.
    Unavailable,
    Failed(String),
}

/// One backend's contribution to a pipeline run. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawExtraction {
    pub engine: EngineId,
    /// Empty whenever status is not Ok.
    pub text: String,
    pub status: ExtractionStatus,
}

impl RawExtraction {
    pub fn ok(engine: EngineId, text: String) -> Self {
        Self {
            engine,
            text,
            status: ExtractionStatus::Ok,
        }
    }

    pub fn unavailable(engine: EngineId) -> Self {
        Self {
            engine,
            text: String::new(),
            status: ExtractionStatus::Unavailable,
        }
    }

    pub fn failed(engine: EngineId, reason: String) -> Self {
        Self {
            engine,
            text: String::new(),
            status: ExtractionStatus::Failed(reason),
        }
    }

    /// True when this backend produced usable text.
    pub fn has_text(&self) -> bool {
        self.status == ExtractionStatus::Ok && !self.text.trim().is_empty()
    }
}

/// OCR backend abstraction, one adapter per engine (allows mocking for tests).
/// Backends read the image file and never mutate or relocate it.
#[async_trait]
pub trait OcrBackend {
    fn engine(&self) -> EngineId;

    async fn extract(&self, image_path: &Path) -> Result<String, ExtractionError>;
}

/// Mock OCR backend for unit testing without real engines.
pub struct MockOcrBackend {
    engine: EngineId,
    outcome: Result<String, String>,
    delay: Option<Duration>,
}

impl MockOcrBackend {
    pub fn new(engine: EngineId, text: &str) -> Self {
        Self {
            engine,
            outcome: Ok(text.to_string()),
            delay: None,
        }
    }

    pub fn failing(engine: EngineId, reason: &str) -> Self {
        Self {
            engine,
            outcome: Err(reason.to_string()),
            delay: None,
        }
    }

    /// Delay the response, for timeout testing.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl OcrBackend for MockOcrBackend {
    fn engine(&self) -> EngineId {
        self.engine
    }

    async fn extract(&self, _image_path: &Path) -> Result<String, ExtractionError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            Ok(text) => Ok(text.clone()),
            Err(reason) => Err(ExtractionError::Engine(reason.clone())),
        }
    }
}
