use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::{CancerType, Gender};

/// Storage format of `report_timestamp`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One persisted screening encounter. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: i64,
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub contact_number: String,
    pub lab_number: String,
    pub cancer_type: CancerType,
    pub report_text: String,
    pub analysis_result: String,
    pub report_timestamp: NaiveDateTime,
    pub authoring_doctor: String,
}

/// A validated encounter that has not been assigned a row id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatientRecord {
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub contact_number: String,
    pub lab_number: String,
    pub cancer_type: CancerType,
    pub report_text: String,
    pub analysis_result: String,
    pub report_timestamp: NaiveDateTime,
    pub authoring_doctor: String,
}

impl NewPatientRecord {
    pub fn into_record(self, id: i64) -> PatientRecord {
        PatientRecord {
            id,
            name: self.name,
            age: self.age,
            gender: self.gender,
            contact_number: self.contact_number,
            lab_number: self.lab_number,
            cancer_type: self.cancer_type,
            report_text: self.report_text,
            analysis_result: self.analysis_result,
            report_timestamp: self.report_timestamp,
            authoring_doctor: self.authoring_doctor,
        }
    }
}
