//! Patient history: list every stored record or export them as CSV.

use rusqlite::Connection;

use crate::db;
use crate::error::ServiceError;
use crate::models::{PatientRecord, TIMESTAMP_FORMAT};
use crate::session::Session;

/// Column order of the CSV export.
pub const CSV_HEADER: [&str; 10] = [
    "name",
    "age",
    "gender",
    "contact_number",
    "lab_number",
    "cancer_type",
    "report_text",
    "analysis_result",
    "report_timestamp",
    "authoring_doctor",
];

/// Suggested download name for the export.
pub const EXPORT_FILENAME: &str = "patient_history.csv";

/// Rendered export. `rows == 0` means "no data" and the body is header-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub body: String,
    pub rows: usize,
}

impl CsvExport {
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Every stored record, in insertion order.
pub fn list_all(conn: &Connection, session: &Session) -> Result<Vec<PatientRecord>, ServiceError> {
    if !session.is_authenticated() {
        return Err(ServiceError::NotAuthenticated);
    }
    Ok(db::get_all_patients(conn)?)
}

/// Render `list_all` as CSV with a header row.
pub fn export_csv(conn: &Connection, session: &Session) -> Result<CsvExport, ServiceError> {
    let records = list_all(conn, session)?;
    let body = render_csv(&records)?;

    tracing::info!(
        rows = records.len(),
        doctor = session.current_user().unwrap_or_default(),
        "Patient history exported"
    );
    Ok(CsvExport {
        body,
        rows: records.len(),
    })
}

fn render_csv(records: &[PatientRecord]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for r in records {
        let age = r.age.to_string();
        let timestamp = r.report_timestamp.format(TIMESTAMP_FORMAT).to_string();
        writer.write_record([
            r.name.as_str(),
            age.as_str(),
            r.gender.as_str(),
            r.contact_number.as_str(),
            r.lab_number.as_str(),
            r.cancer_type.as_str(),
            r.report_text.as_str(),
            r.analysis_result.as_str(),
            timestamp.as_str(),
            r.authoring_doctor.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ConstantResult;
    use crate::db::{insert_doctor, open_memory_database};
    use crate::intake::{self, ImageUpload, IntakeForm};

    fn setup() -> Connection {
        let conn = open_memory_database().unwrap();
        insert_doctor(&conn, "dr_who", "hash").unwrap();
        conn
    }

    fn add(conn: &Connection, name: &str, report: &str) -> PatientRecord {
        let form = IntakeForm {
            name: name.into(),
            age: "40".into(),
            gender: "male".into(),
            contact_number: "0700".into(),
            lab_number: "L-1".into(),
            cancer_type: "kidney".into(),
            report_text: report.into(),
        };
        intake::submit(
            conn,
            &ConstantResult::default(),
            &Session::authenticated("dr_who"),
            &form,
            ImageUpload::Accepted,
        )
        .unwrap()
    }

    #[test]
    fn list_requires_authentication() {
        let conn = setup();
        add(&conn, "A", "r");
        let err = list_all(&conn, &Session::anonymous()).unwrap_err();
        assert!(matches!(err, ServiceError::NotAuthenticated));
    }

    #[test]
    fn export_requires_authentication() {
        let conn = setup();
        let err = export_csv(&conn, &Session::anonymous()).unwrap_err();
        assert!(matches!(err, ServiceError::NotAuthenticated));
    }

    #[test]
    fn list_returns_records_in_insertion_order() {
        let conn = setup();
        let a = add(&conn, "A", "first");
        let b = add(&conn, "B", "second");
        let listed = list_all(&conn, &Session::authenticated("dr_who")).unwrap();
        assert_eq!(listed, vec![a, b]);
    }

    #[test]
    fn empty_export_is_header_only() {
        let conn = setup();
        let export = export_csv(&conn, &Session::authenticated("dr_who")).unwrap();
        assert!(export.is_empty());
        assert_eq!(export.body, format!("{}\n", CSV_HEADER.join(",")));
    }

    #[test]
    fn export_has_one_row_per_record() {
        let conn = setup();
        let record = add(&conn, "A", "r1");
        add(&conn, "B", "r2");

        let export = export_csv(&conn, &Session::authenticated("dr_who")).unwrap();
        assert_eq!(export.rows, 2);

        let lines: Vec<&str> = export.body.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert_eq!(
            lines[1],
            format!(
                "A,40,male,0700,L-1,kidney,r1,Tumor detected,{},dr_who",
                record.report_timestamp.format(TIMESTAMP_FORMAT)
            )
        );
    }

    #[test]
    fn export_quotes_commas_quotes_and_newlines() {
        let conn = setup();
        add(&conn, "Smith, John", "said \"mass\"\nsecond line");

        let export = export_csv(&conn, &Session::authenticated("dr_who")).unwrap();
        let mut reader = csv::Reader::from_reader(export.body.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "Smith, John");
        assert_eq!(&rows[0][6], "said \"mass\"\nsecond line");
        assert!(export.body.contains("\"Smith, John\""));
    }
}
