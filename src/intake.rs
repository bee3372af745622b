//! Record intake: validate one screening form, run the analysis provider,
//! persist the record.
//!
//! Authorization and validation both complete before the single insert,
//! so a rejected submission never writes anything.

use chrono::{Local, NaiveDateTime, SubsecRound};
use rusqlite::Connection;
use serde::Deserialize;

use crate::analysis::AnalysisProvider;
use crate::db;
use crate::error::{ServiceError, ValidationErrors};
use crate::models::{CancerType, Gender, NewPatientRecord, PatientRecord};
use crate::session::Session;

pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 120;

/// Raw form input as typed by the doctor. Age and enumerations stay strings
/// here so that bad values surface as field errors rather than parse failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntakeForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub contact_number: String,
    pub lab_number: String,
    pub cancer_type: String,
    pub report_text: String,
}

/// What arrived in the scan slot of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageUpload {
    /// No file, or an empty one.
    Missing,
    /// A file that is not a PNG or JPEG image.
    Unsupported,
    Accepted,
}

/// Submit a screening form on behalf of the signed-in doctor.
pub fn submit(
    conn: &Connection,
    provider: &dyn AnalysisProvider,
    session: &Session,
    form: &IntakeForm,
    image: ImageUpload,
) -> Result<PatientRecord, ServiceError> {
    let now = Local::now().naive_local().trunc_subsecs(0);
    submit_at(conn, provider, session, form, image, now)
}

pub(crate) fn submit_at(
    conn: &Connection,
    provider: &dyn AnalysisProvider,
    session: &Session,
    form: &IntakeForm,
    image: ImageUpload,
    now: NaiveDateTime,
) -> Result<PatientRecord, ServiceError> {
    let doctor = session
        .current_user()
        .ok_or(ServiceError::NotAuthenticated)?;

    let (age, gender, cancer_type) = validate(form, image)?;

    let analysis_result = provider.analyze(cancer_type);
    tracing::debug!(provider = provider.name(), %cancer_type, "Analysis complete");

    let record = db::insert_patient(
        conn,
        NewPatientRecord {
            name: form.name.clone(),
            age,
            gender,
            contact_number: form.contact_number.clone(),
            lab_number: form.lab_number.clone(),
            cancer_type,
            report_text: form.report_text.clone(),
            analysis_result,
            report_timestamp: now,
            authoring_doctor: doctor.to_string(),
        },
    )?;

    tracing::info!(
        record_id = record.id,
        cancer_type = %record.cancer_type,
        doctor = %record.authoring_doctor,
        "Patient report saved"
    );
    Ok(record)
}

/// Check every field and report all problems at once.
fn validate(
    form: &IntakeForm,
    image: ImageUpload,
) -> Result<(u8, Gender, CancerType), ServiceError> {
    let mut errors = ValidationErrors::new();

    if form.name.trim().is_empty() {
        errors.push("name", "required");
    }

    let age_text = form.age.trim();
    let age = match age_text.parse::<i64>() {
        _ if age_text.is_empty() => {
            errors.push("age", "required");
            None
        }
        Err(_) => {
            errors.push("age", "must be a whole number");
            None
        }
        Ok(a) if !(MIN_AGE..=MAX_AGE).contains(&a) => {
            errors.push("age", format!("must be between {MIN_AGE} and {MAX_AGE}"));
            None
        }
        Ok(a) => u8::try_from(a).ok(),
    };

    let gender = Gender::parse_loose(&form.gender);
    if gender.is_none() {
        errors.push("gender", "must be one of male, female, other");
    }

    if form.contact_number.trim().is_empty() {
        errors.push("contact_number", "required");
    }
    if form.lab_number.trim().is_empty() {
        errors.push("lab_number", "required");
    }
    match image {
        ImageUpload::Missing => errors.push("image", "an MRI/X-ray image is required"),
        ImageUpload::Unsupported => errors.push("image", "must be a PNG or JPEG image"),
        ImageUpload::Accepted => {}
    }
    if form.report_text.trim().is_empty() {
        errors.push("report_text", "required");
    }

    let cancer_type = CancerType::parse_loose(&form.cancer_type);
    if cancer_type.is_none() {
        errors.push("cancer_type", "must be one of brain, breast, kidney");
    }

    match (age, gender, cancer_type) {
        (Some(age), Some(gender), Some(cancer_type)) if errors.is_empty() => {
            Ok((age, gender, cancer_type))
        }
        _ => Err(ServiceError::Validation(errors)),
    }
}
