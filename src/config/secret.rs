//! Secure credential handling using the secrecy crate
//!
//! The CircleCI token is wrapped in `Secret<SecretValue>` as soon as it is
//! read. Memory is zeroed on drop and `Debug` output is redacted, so the
//! token cannot leak through logging of the request.
//!
//! # Example
//!
//! ```rust
//! use usage_export::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("my-token".to_string());
//! assert_eq!(token.expose_secret().as_ref(), "my-token");
//! assert!(!format!("{token:?}").contains("my-token"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Type alias for a secret string
pub type SecretString = Secret<SecretValue>;

/// Helper function to create a SecretString from a String
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Helper function to create an optional SecretString from an optional String
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}
