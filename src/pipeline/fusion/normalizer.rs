use super::parser::decode_draft;
use super::prompt::build_fusion_prompt;
use super::types::{ReasoningClient, StructuredDraft};
use crate::pipeline::extraction::RawExtraction;

/// Fuses the per-engine OCR texts into one structured draft:
/// prompt, a single reasoning request, defensive decode.
///
/// Fusion never aborts the pipeline. Transport errors, non-2xx statuses,
/// timeouts, and undecodable replies all degrade to an empty draft. The
/// request is made exactly once; retrying a paid external service is a
/// caller decision, not baked in here.
pub struct FusionNormalizer {
    client: Box<dyn ReasoningClient + Send + Sync>,
}

impl FusionNormalizer {
    pub fn new(client: Box<dyn ReasoningClient + Send + Sync>) -> Self {
        Self { client }
    }

    pub async fn fuse(&self, extractions: &[RawExtraction]) -> StructuredDraft {
        let prompt = build_fusion_prompt(extractions);

        let reply = match self.client.complete(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "fusion request failed, continuing with empty draft");
                return StructuredDraft::default();
            }
        };

        match decode_draft(&reply) {
            Ok(draft) => {
                tracing::info!(
                    medicines = draft.medicines.len(),
                    has_doctor = !draft.doctor_name.is_empty(),
                    has_date = !draft.date.is_empty(),
                    "fusion produced structured draft"
                );
                draft
            }
            Err(e) => {
                tracing::warn!(error = %e, "fusion reply undecodable, continuing with empty draft");
                StructuredDraft::default()
            }
        }
    }
}
