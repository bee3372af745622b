//! Doctor registration, login and logout.
//!
//! Session transitions: `LoggedOut --login--> LoggedIn --logout--> LoggedOut`.
//! Registration is only offered while logged out and never signs anyone in.

use rusqlite::Connection;

use crate::crypto::PasswordHasher;
use crate::db::{self, DatabaseError};
use crate::error::{ServiceError, ValidationErrors};
use crate::session::Session;

/// Create a doctor account. The password is hashed before it reaches the
/// store; a taken username fails with `UsernameTaken` and changes nothing.
pub fn register(
    conn: &Connection,
    hasher: &PasswordHasher,
    session: &Session,
    username: &str,
    password: &str,
) -> Result<(), ServiceError> {
    if session.is_authenticated() {
        return Err(ServiceError::AlreadyAuthenticated);
    }

    let mut errors = ValidationErrors::new();
    if username.trim().is_empty() {
        errors.push("username", "required");
    }
    if password.is_empty() {
        errors.push("password", "required");
    }
    errors.into_result()?;

    let password_hash = hasher.hash(password);
    match db::insert_doctor(conn, username, &password_hash) {
        Ok(id) => {
            tracing::info!(doctor_id = id, username, "Doctor registered");
            Ok(())
        }
        Err(DatabaseError::DuplicateKey(_)) => {
            tracing::info!(username, "Registration rejected: username taken");
            Err(ServiceError::UsernameTaken(username.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Verify credentials and sign the session in.
///
/// Unknown usernames and wrong passwords fail identically with
/// `InvalidCredentials`, and `session` is left untouched on any failure.
pub fn login(
    conn: &Connection,
    hasher: &PasswordHasher,
    session: &mut Session,
    username: &str,
    password: &str,
) -> Result<(), ServiceError> {
    let Some(doctor) = db::get_doctor_by_username(conn, username)? else {
        hasher.verify_dummy(password);
        tracing::info!("Login failed");
        return Err(ServiceError::InvalidCredentials);
    };

    if !hasher.verify(password, &doctor.password_hash)? {
        tracing::info!("Login failed");
        return Err(ServiceError::InvalidCredentials);
    }

    session.sign_in(&doctor.username);
    tracing::info!(username = %doctor.username, "Doctor logged in");
    Ok(())
}

/// Reset the session unconditionally.
pub fn logout(session: &mut Session) {
    if let Some(user) = session.current_user() {
        tracing::info!(username = user, "Doctor logged out");
    }
    session.reset();
}
