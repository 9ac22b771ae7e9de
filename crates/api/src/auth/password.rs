//! Argon2id password hashing for admin accounts.
//!
//! Stored hashes use the PHC string format, so the algorithm, its
//! parameters, and the per-hash salt all travel inside the hash column
//! and future parameter changes only affect newly set passwords.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext password with a freshly generated random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Check a plaintext password against a stored PHC hash.
///
/// A wrong password is `Ok(false)`; `Err` is reserved for hashes that
/// cannot be parsed or verified at all (corrupt column, unknown
/// algorithm).
pub fn verify_password(password: &str, stored: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let hash = hash_password("spreader-bar-admin").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("spreader-bar-admin", &hash).unwrap());
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let hash = hash_password("spreader-bar-admin").unwrap();
        assert_eq!(verify_password("beam-clamp", &hash), Ok(false));
    }

    #[test]
    fn salting_makes_hashes_unique() {
        assert_ne!(
            hash_password("same-input").unwrap(),
            hash_password("same-input").unwrap()
        );
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
