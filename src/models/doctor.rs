use serde::Serialize;

/// A registered doctor. The plaintext password never reaches this type.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorAccount {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}
