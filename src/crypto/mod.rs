pub mod password;

pub use password::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Unsupported password hash scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Malformed password hash")]
    MalformedHash,

    #[error("Iteration count must be at least 1")]
    InvalidIterations,
}
