//! API key handling with secure memory.
//!
//! Keys are passed explicitly to the ingestor that needs them and are
//! wrapped so they never show up in logs or debug output.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// A secret string that won't be logged or displayed.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value for use in a request header.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// True when the key is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.expose().trim().is_empty()
    }

    /// `Bearer <key>` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_in_debug_or_display() {
        let secret = SecretString::new("fc-super-secret-key");
        assert!(!format!("{:?}", secret).contains("fc-super"));
        assert!(!format!("{}", secret).contains("fc-super"));
        assert_eq!(format!("{}", secret), "[REDACTED]");
    }

    #[test]
    fn test_bearer() {
        let secret = SecretString::from("fc-123");
        assert_eq!(secret.bearer(), "Bearer fc-123");
        assert_eq!(secret.clone().expose(), "fc-123");
    }

    #[test]
    fn test_blank() {
        assert!(SecretString::new("  ").is_blank());
        assert!(!SecretString::new("fc-1").is_blank());
    }
}
