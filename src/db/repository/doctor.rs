use rusqlite::{params, Connection, Transaction, TransactionBehavior};

use crate::db::DatabaseError;
use crate::models::DoctorAccount;

/// Insert a new doctor account. A taken username yields `DuplicateKey`
/// and leaves the existing row untouched.
pub fn insert_doctor(
    conn: &Connection,
    username: &str,
    password_hash: &str,
) -> Result<i64, DatabaseError> {
    // IMMEDIATE takes the write lock up front so concurrent registrations
    // queue on the busy timeout instead of failing with SQLITE_BUSY.
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute(
        "INSERT INTO doctors (username, password_hash) VALUES (?1, ?2)",
        params![username, password_hash],
    )
    .map_err(DatabaseError::from_write)?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}

pub fn get_doctor_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<DoctorAccount>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, username, password_hash FROM doctors WHERE username = ?1",
    )?;

    let result = stmt.query_row(params![username], |row| {
        Ok(DoctorAccount {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
        })
    });

    match result {
        Ok(doctor) => Ok(Some(doctor)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn count_doctors_named(conn: &Connection, username: &str) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM doctors WHERE username = ?1",
        params![username],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn insert_and_fetch_doctor() {
        let conn = open_memory_database().unwrap();
        let id = insert_doctor(&conn, "alice", "hash-a").unwrap();
        assert!(id > 0);

        let doctor = get_doctor_by_username(&conn, "alice").unwrap().unwrap();
        assert_eq!(doctor.id, id);
        assert_eq!(doctor.username, "alice");
        assert_eq!(doctor.password_hash, "hash-a");
    }

    #[test]
    fn unknown_username_returns_none() {
        let conn = open_memory_database().unwrap();
        assert!(get_doctor_by_username(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_rejected_without_overwrite() {
        let conn = open_memory_database().unwrap();
        insert_doctor(&conn, "alice", "first").unwrap();

        let err = insert_doctor(&conn, "alice", "second").unwrap_err();
        assert!(matches!(err, DatabaseError::DuplicateKey(_)), "got {err:?}");

        let doctor = get_doctor_by_username(&conn, "alice").unwrap().unwrap();
        assert_eq!(doctor.password_hash, "first");
        assert_eq!(count_doctors_named(&conn, "alice").unwrap(), 1);
    }

    #[test]
    fn username_is_case_sensitive() {
        let conn = open_memory_database().unwrap();
        insert_doctor(&conn, "alice", "a").unwrap();
        insert_doctor(&conn, "Alice", "b").unwrap();
        assert_eq!(count_doctors_named(&conn, "alice").unwrap(), 1);
        assert_eq!(count_doctors_named(&conn, "Alice").unwrap(), 1);
    }
}
