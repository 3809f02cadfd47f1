//! Password validation and hashing.

use std::fmt::Display;

use bcrypt::BcryptError;
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// A password that has passed a strength check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Validate the strength of a raw password.
    ///
    /// # Errors
    /// Returns [Error::TooWeak] with feedback for the user if the password is
    /// too easy to guess.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        let entropy = zxcvbn(raw_password, &[]);

        match entropy.score() {
            Score::Three | Score::Four => Ok(Self(raw_password.to_owned())),
            _ => {
                let feedback = entropy
                    .feedback()
                    .map(|feedback| feedback.to_string())
                    .unwrap_or_else(|| "Try a longer password.".to_owned());

                Err(Error::TooWeak(feedback))
            }
        }
    }

    /// Wrap a raw password without checking its strength.
    ///
    /// Intended for tests and internal tooling.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not leak the password into logs.
        write!(f, "********")
    }
}

/// A bcrypt hash of a password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The default bcrypt cost factor.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash a validated password with the given bcrypt `cost`.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if bcrypt fails.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        bcrypt::hash(password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Hash a raw password without a strength check.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if bcrypt fails.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        bcrypt::hash(raw_password, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap an existing hash string, for example one read from the database.
    pub fn new_unchecked(hash: String) -> Self {
        Self(hash)
    }

    /// Check a raw password against this hash.
    ///
    /// # Errors
    /// Returns an error if the stored hash is malformed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        bcrypt::verify(raw_password, &self.0)
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}


#[cfg(test)]
mod password_hash_tests {
    use super::{PasswordHash, ValidatedPassword};

    // The minimum cost keeps these tests fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn verify_accepts_matching_password() {
        let hash = PasswordHash::new(
            ValidatedPassword::new_unchecked("averylongandstrongpassword"),
            TEST_COST,
        )
        .unwrap();

        assert!(hash.verify("averylongandstrongpassword").unwrap());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = PasswordHash::from_raw_password("correct horse", TEST_COST).unwrap();

        assert!(!hash.verify("battery staple").unwrap());
    }
}
