use crate::pipeline::extraction::{EngineId, RawExtraction};

/// Build the reconciliation prompt for one pipeline run.
///
/// The three raw texts are embedded verbatim under fixed engine labels in
/// fixed order (`EngineId::ALL`), followed by the output schema and a static
/// attribution policy. The section order and the attribution rules are a
/// prompt contract the reasoning service's behavior depends on; changing
/// either is a behavioral change. An engine missing from `extractions`
/// contributes an empty section. There is no field-level fallback when an
/// attributed source is empty; the service reconciles ad hoc in that case.
pub fn build_fusion_prompt(extractions: &[RawExtraction]) -> String {
    let mut sections = String::new();
    for engine in EngineId::ALL {
        let text = extractions
            .iter()
            .find(|e| e.engine == engine)
            .map(|e| e.text.as_str())
            .unwrap_or("");
        sections.push_str(engine.prompt_label());
        sections.push_str(":\n");
        sections.push_str(text);
        sections.push_str("\n\n");
    }

    format!(
        r#"You are an expert medical prescription parser with THREE OCR extractions of the SAME prescription.

{sections}Combine the best from each OCR. Return ONLY valid JSON:
{{
    "doctor_name": "name or empty",
    "date": "DD/MM/YYYY or empty",
    "medicines": [
        {{
            "name": "medicine name",
            "dosage": "100mg or empty",
            "frequency": "BID/TID/QD or empty",
            "duration": "5 days or empty"
        }}
    ]
}}

Rules: Doctor names from Google Vision, medicine names from EasyOCR, dosages from Tesseract. Fix typos. Return ONLY JSON."#
    )
}
