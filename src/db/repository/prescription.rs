use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::{
    MedicineMatch, NewMedicine, NewPrescription, Prescription, PrescriptionMedicine,
    PrescriptionSummary, SummaryStats,
};

/// Insert one prescription and all of its medicines as a single transaction.
///
/// Either the parent row and every child row commit together, or nothing is
/// written: the transaction rolls back on any exit path that does not reach
/// `commit`. Returns the generated prescription id.
pub fn insert_prescription_with_medicines(
    conn: &mut Connection,
    record: &NewPrescription,
    medicines: &[NewMedicine],
) -> Result<i64, DatabaseError> {
    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO prescriptions
         (user_id, issue, description, doctor_name, prescription_date, file_path, extracted_text)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.user_id,
            record.issue,
            record.description,
            record.doctor_name,
            record.prescription_date,
            record.file_path,
            record.extracted_text,
        ],
    )?;
    let prescription_id = tx.last_insert_rowid();

    {
        let mut stmt = tx.prepare(
            "INSERT INTO prescription_medicines
             (prescription_id, medicine_name, dosage, frequency, duration)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for med in medicines {
            stmt.execute(params![
                prescription_id,
                med.name,
                med.dosage,
                med.frequency,
                med.duration,
            ])?;
        }
    }

    tx.commit()?;
    Ok(prescription_id)
}

/// Fetch one prescription, scoped to its owning user.
pub fn get_prescription(
    conn: &Connection,
    prescription_id: i64,
    user_id: i64,
) -> Result<Option<Prescription>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT prescription_id, user_id, issue, description, doctor_name,
                    prescription_date, file_path, extracted_text, created_at
             FROM prescriptions
             WHERE prescription_id = ?1 AND user_id = ?2",
            params![prescription_id, user_id],
            |row| {
                Ok(Prescription {
                    prescription_id: row.get(0)?,
                    user_id: row.get(1)?,
                    issue: row.get(2)?,
                    description: row.get(3)?,
                    doctor_name: row.get(4)?,
                    prescription_date: row.get(5)?,
                    file_path: row.get(6)?,
                    extracted_text: row.get(7)?,
                    created_at: row.get(8)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

/// Medicines of one prescription in insertion order.
pub fn medicines_for_prescription(
    conn: &Connection,
    prescription_id: i64,
) -> Result<Vec<PrescriptionMedicine>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT pm_id, prescription_id, medicine_name, dosage, frequency, duration
         FROM prescription_medicines
         WHERE prescription_id = ?1
         ORDER BY pm_id",
    )?;

    let rows = stmt.query_map(params![prescription_id], |row| {
        Ok(PrescriptionMedicine {
            pm_id: row.get(0)?,
            prescription_id: row.get(1)?,
            medicine_name: row.get(2)?,
            dosage: row.get(3)?,
            frequency: row.get(4)?,
            duration: row.get(5)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// All prescriptions of a user, newest first, with per-prescription medicine counts.
pub fn list_prescriptions(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<PrescriptionSummary>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT p.prescription_id, p.issue, p.doctor_name, p.prescription_date,
                p.file_path, p.created_at, COUNT(pm.pm_id)
         FROM prescriptions p
         LEFT JOIN prescription_medicines pm ON pm.prescription_id = p.prescription_id
         WHERE p.user_id = ?1
         GROUP BY p.prescription_id
         ORDER BY p.created_at DESC, p.prescription_id DESC",
    )?;

    let rows = stmt.query_map(params![user_id], |row| {
        Ok(PrescriptionSummary {
            prescription_id: row.get(0)?,
            issue: row.get(1)?,
            doctor_name: row.get(2)?,
            prescription_date: row.get(3)?,
            file_path: row.get(4)?,
            created_at: row.get(5)?,
            medicine_count: row.get(6)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Fuzzy medicine search across a user's prescriptions.
pub fn search_medicines(
    conn: &Connection,
    user_id: i64,
    query: &str,
) -> Result<Vec<MedicineMatch>, DatabaseError> {
    let pattern = format!("%{query}%");
    let mut stmt = conn.prepare(
        "SELECT p.prescription_id, p.issue, p.doctor_name, p.prescription_date,
                pm.medicine_name, pm.dosage, pm.frequency
         FROM prescription_medicines pm
         INNER JOIN prescriptions p ON p.prescription_id = pm.prescription_id
         WHERE p.user_id = ?1 AND LOWER(pm.medicine_name) LIKE LOWER(?2)
         ORDER BY p.created_at DESC, pm.pm_id",
    )?;

    let rows = stmt.query_map(params![user_id, pattern], |row| {
        Ok(MedicineMatch {
            prescription_id: row.get(0)?,
            issue: row.get(1)?,
            doctor_name: row.get(2)?,
            prescription_date: row.get(3)?,
            medicine_name: row.get(4)?,
            dosage: row.get(5)?,
            frequency: row.get(6)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Aggregate counters for a user's dashboard.
pub fn prescription_summary(
    conn: &Connection,
    user_id: i64,
) -> Result<SummaryStats, DatabaseError> {
    let (total_prescriptions, total_doctors) = conn.query_row(
        "SELECT COUNT(*), COUNT(DISTINCT NULLIF(doctor_name, ''))
         FROM prescriptions
         WHERE user_id = ?1",
        params![user_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let total_medicines = conn.query_row(
        "SELECT COUNT(*)
         FROM prescription_medicines pm
         INNER JOIN prescriptions p ON p.prescription_id = pm.prescription_id
         WHERE p.user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;

    Ok(SummaryStats {
        total_prescriptions,
        total_doctors,
        total_medicines,
    })
}

/// Update user-editable prescription fields. Returns false when the
/// prescription does not exist or belongs to another user.
pub fn update_prescription(
    conn: &Connection,
    prescription_id: i64,
    user_id: i64,
    issue: &str,
    description: &str,
    doctor_name: &str,
) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "UPDATE prescriptions
         SET issue = ?1, description = ?2, doctor_name = ?3
         WHERE prescription_id = ?4 AND user_id = ?5",
        params![issue, description, doctor_name, prescription_id, user_id],
    )?;
    Ok(changed > 0)
}

/// Delete a prescription; its medicines cascade. Returns false when nothing
/// matched.
pub fn delete_prescription(
    conn: &Connection,
    prescription_id: i64,
    user_id: i64,
) -> Result<bool, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM prescriptions WHERE prescription_id = ?1 AND user_id = ?2",
        params![prescription_id, user_id],
    )?;
    Ok(deleted > 0)
}
