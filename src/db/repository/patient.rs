use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

use crate::db::DatabaseError;
use crate::models::*;

/// Append a screening record. Existing rows are never touched.
pub fn insert_patient(
    conn: &Connection,
    record: NewPatientRecord,
) -> Result<PatientRecord, DatabaseError> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute(
        "INSERT INTO patients (name, age, gender, contact_number, lab_number, cancer_type,
         report_text, analysis_result, report_timestamp, authoring_doctor)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            record.name,
            record.age,
            record.gender.as_str(),
            record.contact_number,
            record.lab_number,
            record.cancer_type.as_str(),
            record.report_text,
            record.analysis_result,
            record.report_timestamp.format(TIMESTAMP_FORMAT).to_string(),
            record.authoring_doctor,
        ],
    )
    .map_err(DatabaseError::from_write)?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    Ok(record.into_record(id))
}

/// Every stored record in insertion order.
pub fn get_all_patients(conn: &Connection) -> Result<Vec<PatientRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, age, gender, contact_number, lab_number, cancer_type,
         report_text, analysis_result, report_timestamp, authoring_doctor
         FROM patients ORDER BY id",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(PatientRow {
                id: row.get(0)?,
                name: row.get(1)?,
                age: row.get(2)?,
                gender: row.get(3)?,
                contact_number: row.get(4)?,
                lab_number: row.get(5)?,
                cancer_type: row.get(6)?,
                report_text: row.get(7)?,
                analysis_result: row.get(8)?,
                report_timestamp: row.get(9)?,
                authoring_doctor: row.get(10)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(patient_from_row).collect()
}

pub fn count_patients(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get::<_, i64>(0))?;
    Ok(count)
}

// Internal row type for PatientRecord mapping
struct PatientRow {
    id: i64,
    name: String,
    age: i64,
    gender: String,
    contact_number: String,
    lab_number: String,
    cancer_type: String,
    report_text: String,
    analysis_result: String,
    report_timestamp: String,
    authoring_doctor: String,
}

fn patient_from_row(row: PatientRow) -> Result<PatientRecord, DatabaseError> {
    let age = u8::try_from(row.age).map_err(|_| DatabaseError::InvalidValue {
        field: "age".into(),
        value: row.age.to_string(),
    })?;
    let report_timestamp = NaiveDateTime::parse_from_str(&row.report_timestamp, TIMESTAMP_FORMAT)
        .map_err(|_| DatabaseError::InvalidValue {
            field: "report_timestamp".into(),
            value: row.report_timestamp.clone(),
        })?;

    Ok(PatientRecord {
        id: row.id,
        name: row.name,
        age,
        gender: Gender::from_str(&row.gender)?,
        contact_number: row.contact_number,
        lab_number: row.lab_number,
        cancer_type: CancerType::from_str(&row.cancer_type)?,
        report_text: row.report_text,
        analysis_result: row.analysis_result,
        report_timestamp,
        authoring_doctor: row.authoring_doctor,
    })
}
