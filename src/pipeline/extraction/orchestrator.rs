use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::types::{EngineId, ExtractionStatus, OcrBackend, RawExtraction};
use super::ExtractionError;

/// Default per-backend timeout.
const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs every configured OCR backend against one image.
///
/// Backends are dispatched concurrently, each bounded by its own timeout, and
/// joined before fusion: the join point is a barrier. A slot whose backend
/// failed to initialize at process start stays permanently `Unavailable`; a
/// backend that errors, times out, or panics is reported as `Failed` for that
/// run only. The orchestrator itself fails only when no backend produced any
/// usable text.
pub struct ExtractionOrchestrator {
    slots: Vec<BackendSlot>,
    backend_timeout: Duration,
}

struct BackendSlot {
    engine: EngineId,
    /// None marks a backend whose initialization failed at startup.
    backend: Option<Arc<dyn OcrBackend + Send + Sync>>,
}

impl ExtractionOrchestrator {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            backend_timeout: DEFAULT_BACKEND_TIMEOUT,
        }
    }

    /// Override the per-backend timeout.
    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }

    /// Register an initialized backend.
    pub fn with_backend(mut self, backend: Arc<dyn OcrBackend + Send + Sync>) -> Self {
        self.slots.push(BackendSlot {
            engine: backend.engine(),
            backend: Some(backend),
        });
        self
    }

    /// Register a slot for a backend whose initialization failed. The engine
    /// is reported `Unavailable` on every run instead of aborting startup.
    pub fn with_unavailable(mut self, engine: EngineId) -> Self {
        tracing::warn!(engine = engine.as_str(), "OCR backend unavailable for this process");
        self.slots.push(BackendSlot { engine, backend: None });
        self
    }

    /// Register the outcome of a backend constructor in one step.
    pub fn with_slot(
        self,
        engine: EngineId,
        backend: Result<Arc<dyn OcrBackend + Send + Sync>, ExtractionError>,
    ) -> Self {
        match backend {
            Ok(backend) => self.with_backend(backend),
            Err(e) => {
                tracing::warn!(engine = engine.as_str(), error = %e, "OCR backend failed to initialize");
                self.with_unavailable(engine)
            }
        }
    }

    /// Run all backends against one image, one `RawExtraction` per slot in
    /// registration order.
    ///
    /// The only error is `ExtractionError::Exhausted`: no backend returned
    /// non-empty text, so there is nothing to fuse.
    pub async fn run(&self, image_path: &Path) -> Result<Vec<RawExtraction>, ExtractionError> {
        let mut pending = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let handle = slot.backend.as_ref().map(|backend| {
                let backend = Arc::clone(backend);
                let path = image_path.to_path_buf();
                let timeout = self.backend_timeout;
                tokio::spawn(async move {
                    tokio::time::timeout(timeout, backend.extract(&path)).await
                })
            });
            pending.push((slot.engine, handle));
        }

        // Join barrier: every backend completes, times out, or fails before
        // fusion input is assembled.
        let mut results = Vec::with_capacity(pending.len());
        for (engine, handle) in pending {
            let extraction = match handle {
                None => RawExtraction::unavailable(engine),
                Some(handle) => match handle.await {
                    Ok(Ok(Ok(text))) => RawExtraction::ok(engine, text),
                    Ok(Ok(Err(e))) => RawExtraction::failed(engine, e.to_string()),
                    Ok(Err(_elapsed)) => RawExtraction::failed(
                        engine,
                        format!("timed out after {:?}", self.backend_timeout),
                    ),
                    Err(join_err) => {
                        RawExtraction::failed(engine, format!("backend task aborted: {join_err}"))
                    }
                },
            };

            match &extraction.status {
                ExtractionStatus::Ok => tracing::info!(
                    engine = engine.as_str(),
                    chars = extraction.text.len(),
                    "backend extraction complete"
                ),
                status => tracing::warn!(
                    engine = engine.as_str(),
                    status = ?status,
                    "backend produced no text"
                ),
            }
            results.push(extraction);
        }

        if results.iter().any(RawExtraction::has_text) {
            Ok(results)
        } else {
            Err(ExtractionError::Exhausted)
        }
    }
}

impl Default for ExtractionOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::types::MockOcrBackend;

    fn orchestrator_with(backends: Vec<MockOcrBackend>) -> ExtractionOrchestrator {
        backends.into_iter().fold(
            ExtractionOrchestrator::new(),
            |orch, backend| orch.with_backend(Arc::new(backend)),
        )
    }

    #[tokio::test]
    async fn all_backends_succeed() {
        let orch = orchestrator_with(vec![
            MockOcrBackend::new(EngineId::Tesseract, "Paracetamol 500mg"),
            MockOcrBackend::new(EngineId::EasyOcr, "Paracetamol 500 mg TID"),
            MockOcrBackend::new(EngineId::GoogleVision, "Dr. Mehta\nParacetamol"),
        ]);

        let results = orch.run(Path::new("rx.jpg")).await.unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.status == ExtractionStatus::Ok));
    }

    #[tokio::test]
    async fn results_follow_registration_order() {
        let orch = orchestrator_with(vec![
            MockOcrBackend::new(EngineId::Tesseract, "a"),
            MockOcrBackend::new(EngineId::EasyOcr, "b"),
            MockOcrBackend::new(EngineId::GoogleVision, "c"),
        ]);

        let results = orch.run(Path::new("rx.jpg")).await.unwrap();
        let engines: Vec<EngineId> = results.iter().map(|r| r.engine).collect();
        assert_eq!(engines, EngineId::ALL.to_vec());
    }

    #[tokio::test]
    async fn single_failure_does_not_abort_run() {
        let orch = orchestrator_with(vec![
            MockOcrBackend::failing(EngineId::Tesseract, "engine crashed"),
            MockOcrBackend::new(EngineId::EasyOcr, "Metformin 500mg"),
            MockOcrBackend::new(EngineId::GoogleVision, "Dr. Rao"),
        ]);

        let results = orch.run(Path::new("rx.jpg")).await.unwrap();
        assert!(matches!(results[0].status, ExtractionStatus::Failed(_)));
        assert!(results[1].has_text());
        assert!(results[2].has_text());
    }

    #[tokio::test]
    async fn all_backends_failing_is_exhausted() {
        let orch = orchestrator_with(vec![
            MockOcrBackend::failing(EngineId::Tesseract, "down"),
            MockOcrBackend::failing(EngineId::EasyOcr, "down"),
            MockOcrBackend::failing(EngineId::GoogleVision, "down"),
        ]);

        let result = orch.run(Path::new("rx.jpg")).await;
        assert!(matches!(result, Err(ExtractionError::Exhausted)));
    }

    #[tokio::test]
    async fn whitespace_only_text_counts_as_nothing() {
        let orch = orchestrator_with(vec![
            MockOcrBackend::new(EngineId::Tesseract, "   \n\t"),
            MockOcrBackend::failing(EngineId::EasyOcr, "down"),
        ]);

        let result = orch.run(Path::new("rx.jpg")).await;
        assert!(matches!(result, Err(ExtractionError::Exhausted)));
    }

    #[tokio::test]
    async fn unavailable_slot_reported_without_dispatch() {
        let orch = ExtractionOrchestrator::new()
            .with_unavailable(EngineId::Tesseract)
            .with_backend(Arc::new(MockOcrBackend::new(EngineId::EasyOcr, "Ibuprofen")));

        let results = orch.run(Path::new("rx.jpg")).await.unwrap();
        assert_eq!(results[0].status, ExtractionStatus::Unavailable);
        assert!(results[1].has_text());
    }

    #[tokio::test]
    async fn slow_backend_times_out_without_stalling_others() {
        let orch = ExtractionOrchestrator::new()
            .with_backend_timeout(Duration::from_millis(50))
            .with_backend(Arc::new(
                MockOcrBackend::new(EngineId::Tesseract, "never seen")
                    .with_delay(Duration::from_secs(30)),
            ))
            .with_backend(Arc::new(MockOcrBackend::new(EngineId::EasyOcr, "Aspirin 100mg")));

        let started = std::time::Instant::now();
        let results = orch.run(Path::new("rx.jpg")).await.unwrap();
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "hung backend must not stall the join"
        );

        match &results[0].status {
            ExtractionStatus::Failed(reason) => assert!(reason.contains("timed out")),
            other => panic!("expected timeout failure, got {other:?}"),
        }
        assert!(results[1].has_text());
    }

    #[tokio::test]
    async fn constructor_error_degrades_to_unavailable_slot() {
        let failed: Result<Arc<dyn OcrBackend + Send + Sync>, ExtractionError> =
            Err(ExtractionError::EngineInit("no tessdata".into()));
        let orch = ExtractionOrchestrator::new()
            .with_slot(EngineId::Tesseract, failed)
            .with_backend(Arc::new(MockOcrBackend::new(EngineId::EasyOcr, "text")));

        let results = orch.run(Path::new("rx.jpg")).await.unwrap();
        assert_eq!(results[0].status, ExtractionStatus::Unavailable);
    }
}
