use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::CryptoError;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const HASH_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 16;

const SCHEME: &str = "pbkdf2-sha256";

/// Salted PBKDF2-SHA256 password hasher.
///
/// Encoded hashes look like `pbkdf2-sha256$<iterations>$<salt>$<digest>`
/// (unpadded base64), so verification uses whatever iteration count the
/// hash was created with.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Result<Self, CryptoError> {
        if iterations == 0 {
            return Err(CryptoError::InvalidIterations);
        }
        Ok(Self { iterations })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hash with a fresh random salt.
    pub fn hash(&self, password: &str) -> String {
        self.hash_with_salt(password, &generate_salt())
    }

    fn hash_with_salt(&self, password: &str, salt: &[u8; SALT_LENGTH]) -> String {
        let mut digest = derive(password, salt, self.iterations);
        let encoded = format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(digest)
        );
        digest.zeroize();
        encoded
    }

    /// Recompute the digest with the stored parameters and compare.
    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool, CryptoError> {
        let parsed = ParsedHash::parse(encoded)?;
        let mut candidate = derive(password, &parsed.salt, parsed.iterations);
        let matches: bool = candidate[..].ct_eq(&parsed.digest[..]).into();
        candidate.zeroize();
        Ok(matches)
    }

    /// Burn the same work as a real verification for an account that does
    /// not exist, so both failure paths cost about the same.
    pub fn verify_dummy(&self, password: &str) {
        let mut digest = derive(password, &[0u8; SALT_LENGTH], self.iterations);
        digest.zeroize();
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
        }
    }
}

struct ParsedHash {
    iterations: u32,
    salt: [u8; SALT_LENGTH],
    digest: [u8; HASH_LENGTH],
}

impl ParsedHash {
    fn parse(encoded: &str) -> Result<Self, CryptoError> {
        let mut parts = encoded.split('$');
        let scheme = parts.next().unwrap_or_default();
        if scheme != SCHEME {
            return Err(CryptoError::UnsupportedScheme(scheme.to_string()));
        }

        let iterations: u32 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .ok_or(CryptoError::MalformedHash)?;
        let salt = decode_fixed::<SALT_LENGTH>(parts.next())?;
        let digest = decode_fixed::<HASH_LENGTH>(parts.next())?;

        if parts.next().is_some() {
            return Err(CryptoError::MalformedHash);
        }

        Ok(Self {
            iterations,
            salt,
            digest,
        })
    }
}

fn decode_fixed<const N: usize>(part: Option<&str>) -> Result<[u8; N], CryptoError> {
    let bytes = STANDARD_NO_PAD
        .decode(part.ok_or(CryptoError::MalformedHash)?)
        .map_err(|_| CryptoError::MalformedHash)?;
    bytes.try_into().map_err(|_| CryptoError::MalformedHash)
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

/// Generate a cryptographically random salt
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}
