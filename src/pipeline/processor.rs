use std::path::PathBuf;

use uuid::Uuid;

use super::dates;
use super::extraction::{ExtractionOrchestrator, RawExtraction};
use super::fusion::FusionNormalizer;
use super::PipelineError;
use crate::config;
use crate::db::{insert_prescription_with_medicines, DatabaseError, SharedConnection};
use crate::models::{NewMedicine, NewPrescription};

/// One prescription upload, as handed over by the upload collaborator.
/// Filename sanitization and storage placement happen before this point.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub user_id: i64,
    pub issue: String,
    pub description: String,
    /// Filesystem location of the uploaded image, readable by the backends.
    pub image_path: PathBuf,
    /// Caller-chosen logical path persisted with the record.
    pub stored_path: String,
}

/// Result of a successful upload. The medicine count may be zero; a degraded
/// fusion still persists a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub prescription_id: i64,
    pub medicine_count: usize,
}

/// The extraction-fusion-persistence pipeline.
///
/// Built once at process start from injected service clients; pipeline runs
/// for different uploads are independent and may execute in parallel. Before
/// persistence begins a run can be aborted without side effects (dropping the
/// future cancels it); once persistence has started it runs to completion on
/// the blocking pool, commit or rollback.
pub struct PrescriptionPipeline {
    orchestrator: ExtractionOrchestrator,
    normalizer: FusionNormalizer,
}

impl PrescriptionPipeline {
    pub fn new(orchestrator: ExtractionOrchestrator, normalizer: FusionNormalizer) -> Self {
        Self {
            orchestrator,
            normalizer,
        }
    }

    /// Ingest one prescription image: triple OCR, fusion, date resolution,
    /// atomic persistence.
    pub async fn process_upload(
        &self,
        db: SharedConnection,
        request: UploadRequest,
    ) -> Result<UploadOutcome, PipelineError> {
        let upload_id = Uuid::new_v4();

        if request.issue.trim().is_empty() {
            return Err(PipelineError::InvalidRequest("issue must not be empty".into()));
        }
        if !config::is_allowed_image(&request.image_path) {
            let extension = request
                .image_path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string();
            return Err(PipelineError::UnsupportedImage(extension));
        }

        tracing::info!(
            upload_id = %upload_id,
            user_id = request.user_id,
            image = %request.image_path.display(),
            "processing prescription upload"
        );

        // The only orchestrator error is exhaustion: nothing to fuse.
        let extractions = self
            .orchestrator
            .run(&request.image_path)
            .await
            .map_err(|_| PipelineError::ExtractionExhausted)?;

        let draft = self.normalizer.fuse(&extractions).await;

        let prescription_date = dates::resolve_date(&draft.date);
        if prescription_date.is_none() && !draft.date.trim().is_empty() {
            tracing::warn!(upload_id = %upload_id, raw = %draft.date, "prescription date unresolved, storing NULL");
        }

        let record = NewPrescription {
            user_id: request.user_id,
            issue: request.issue.clone(),
            description: request.description.clone(),
            doctor_name: draft.doctor_name.clone(),
            prescription_date,
            file_path: request.stored_path.clone(),
            extracted_text: combine_raw_texts(&extractions),
        };
        let medicines: Vec<NewMedicine> = draft
            .medicines
            .iter()
            .map(|m| NewMedicine {
                name: m.name.clone(),
                dosage: m.dosage.clone(),
                frequency: m.frequency.clone(),
                duration: m.duration.clone(),
            })
            .collect();
        let medicine_count = medicines.len();

        // spawn_blocking keeps the transaction running to completion even if
        // this future is dropped mid-write.
        let prescription_id = match tokio::task::spawn_blocking(move || {
            let mut conn = match db.lock() {
                Ok(conn) => conn,
                Err(poisoned) => poisoned.into_inner(),
            };
            insert_prescription_with_medicines(&mut conn, &record, &medicines)
        })
        .await
        {
            Ok(result) => result?,
            Err(join_err) => {
                return Err(PipelineError::Persistence(DatabaseError::Task(
                    join_err.to_string(),
                )))
            }
        };

        tracing::info!(
            upload_id = %upload_id,
            prescription_id,
            medicine_count,
            "prescription stored"
        );

        Ok(UploadOutcome {
            prescription_id,
            medicine_count,
        })
    }
}

/// Combined per-engine texts stored with the record for audit and debugging.
fn combine_raw_texts(extractions: &[RawExtraction]) -> String {
    extractions
        .iter()
        .map(|e| format!("{}:\n{}", e.engine.prompt_label(), e.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
