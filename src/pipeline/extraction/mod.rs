pub mod easyocr;
pub mod orchestrator;
#[cfg(feature = "ocr")]
pub mod tesseract;
pub mod types;
pub mod vision;

pub use easyocr::*;
pub use orchestrator::*;
#[cfg(feature = "ocr")]
pub use tesseract::*;
pub use types::*;
pub use vision::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("no text could be extracted from any configured backend")]
    Exhausted,

    #[error("OCR engine initialization failed: {0}")]
    EngineInit(String),

    #[error("OCR engine failure: {0}")]
    Engine(String),

    #[error("backend returned error (status {status}): {body}")]
    Http { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("response parsing error: {0}")]
    ResponseParsing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
