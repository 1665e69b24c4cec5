use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::types::{EngineId, OcrBackend};
use super::ExtractionError;

/// Bundled Tesseract OCR engine.
/// Only available when compiled with the `ocr` feature flag.
pub struct TesseractBackend {
    tessdata_dir: PathBuf,
    lang: String,
}

impl TesseractBackend {
    /// Initialize with a tessdata directory. English traineddata must exist.
    pub fn new(tessdata_dir: &Path) -> Result<Self, ExtractionError> {
        if !tessdata_dir.join("eng.traineddata").exists() {
            return Err(ExtractionError::EngineInit(format!(
                "eng.traineddata not found in {}",
                tessdata_dir.display()
            )));
        }

        Ok(Self {
            tessdata_dir: tessdata_dir.to_path_buf(),
            lang: "eng".to_string(),
        })
    }

    /// Set language(s) for OCR (e.g., "eng", "eng+fra")
    pub fn with_language(mut self, lang: &str) -> Self {
        self.lang = lang.to_string();
        self
    }
}

#[async_trait]
impl OcrBackend for TesseractBackend {
    fn engine(&self) -> EngineId {
        EngineId::Tesseract
    }

    async fn extract(&self, image_path: &Path) -> Result<String, ExtractionError> {
        let tessdata = self
            .tessdata_dir
            .to_str()
            .ok_or_else(|| ExtractionError::Engine("invalid tessdata path".into()))?
            .to_string();
        let lang = self.lang.clone();
        let image = image_path
            .to_str()
            .ok_or_else(|| ExtractionError::Engine("invalid image path".into()))?
            .to_string();

        // Tesseract is CPU-bound and blocking; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            let mut tess = tesseract::Tesseract::new(Some(&tessdata), Some(&lang))
                .map_err(|e| ExtractionError::Engine(format!("{e:?}")))?
                .set_image(&image)
                .map_err(|e| ExtractionError::Engine(format!("{e:?}")))?;

            tess.get_text()
                .map_err(|e| ExtractionError::Engine(format!("{e:?}")))
        })
        .await
        .map_err(|e| ExtractionError::Engine(format!("OCR task aborted: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_tessdata() {
        let dir = tempfile::tempdir().unwrap();
        let result = TesseractBackend::new(dir.path());
        assert!(matches!(result, Err(ExtractionError::EngineInit(_))));
    }

    #[test]
    fn initializes_when_traineddata_present() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("eng.traineddata"), b"stub").unwrap();
        let backend = TesseractBackend::new(dir.path()).unwrap().with_language("eng+fra");
        assert_eq!(backend.lang, "eng+fra");
        assert_eq!(backend.engine(), EngineId::Tesseract);
    }
}
