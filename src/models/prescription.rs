use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A stored prescription record. The parent of zero or more medicines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub prescription_id: i64,
    pub user_id: i64,
    pub issue: String,
    pub description: String,
    pub doctor_name: String,
    /// None when the date on the prescription could not be resolved.
    pub prescription_date: Option<NaiveDate>,
    /// Logical path of the stored image, chosen by the upload handler.
    pub file_path: String,
    /// Combined per-engine OCR texts, kept for audit and debugging.
    pub extracted_text: String,
    pub created_at: NaiveDateTime,
}

/// One medicine on a prescription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionMedicine {
    pub pm_id: i64,
    pub prescription_id: i64,
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}

/// Insert payload for the parent row.
#[derive(Debug, Clone)]
pub struct NewPrescription {
    pub user_id: i64,
    pub issue: String,
    pub description: String,
    pub doctor_name: String,
    pub prescription_date: Option<NaiveDate>,
    pub file_path: String,
    pub extracted_text: String,
}

/// Insert payload for one child row.
#[derive(Debug, Clone)]
pub struct NewMedicine {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}

/// Listing row with its medicine count, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct PrescriptionSummary {
    pub prescription_id: i64,
    pub issue: String,
    pub doctor_name: String,
    pub prescription_date: Option<NaiveDate>,
    pub file_path: String,
    pub created_at: NaiveDateTime,
    pub medicine_count: i64,
}

/// One medicine-search hit joined with its prescription metadata.
#[derive(Debug, Clone, Serialize)]
pub struct MedicineMatch {
    pub prescription_id: i64,
    pub issue: String,
    pub doctor_name: String,
    pub prescription_date: Option<NaiveDate>,
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
}

/// Per-user aggregate counters for the dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryStats {
    pub total_prescriptions: i64,
    pub total_doctors: i64,
    pub total_medicines: i64,
}
