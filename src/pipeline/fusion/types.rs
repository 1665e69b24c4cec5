use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::FusionError;

/// Structured record drafted by the reasoning service from the OCR texts.
///
/// Always well-formed: a failed fusion yields an empty draft, never an
/// absence. Medicine ordering from the service reply is preserved and is
/// authoritative for persistence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredDraft {
    #[serde(default)]
    pub doctor_name: String,
    /// Free-form date text as written on the prescription; resolved later.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub medicines: Vec<MedicineDraft>,
}

impl StructuredDraft {
    pub fn is_empty(&self) -> bool {
        self.doctor_name.is_empty() && self.date.is_empty() && self.medicines.is_empty()
    }
}

/// One medicine as drafted by the reasoning service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicineDraft {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
}

/// Reasoning service abstraction (allows mocking for tests).
#[async_trait]
pub trait ReasoningClient {
    async fn complete(&self, prompt: &str) -> Result<String, FusionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_draft_is_empty() {
        let draft = StructuredDraft::default();
        assert!(draft.is_empty());
        assert!(draft.medicines.is_empty());
    }

    #[test]
    fn draft_with_any_field_is_not_empty() {
        let draft = StructuredDraft {
            doctor_name: "Dr. A".into(),
            ..Default::default()
        };
        assert!(!draft.is_empty());
    }

    #[test]
    fn medicine_optional_fields_default_to_empty() {
        let med: MedicineDraft = serde_json::from_str(r#"{"name": "Aspirin"}"#).unwrap();
        assert_eq!(med.name, "Aspirin");
        assert!(med.dosage.is_empty());
        assert!(med.frequency.is_empty());
        assert!(med.duration.is_empty());
    }

    #[test]
    fn medicine_without_name_is_rejected() {
        let result: Result<MedicineDraft, _> = serde_json::from_str(r#"{"dosage": "10mg"}"#);
        assert!(result.is_err());
    }
}
