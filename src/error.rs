use std::fmt;

use thiserror::Error;

/// Field-level validation messages, in the order the fields were checked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(&'static str, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for a field
    ///
    /// # Arguments
    /// * `field` - Wire name of the field (`username` or `jobTitle`)
    /// * `message` - Message to show next to the field
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message recorded for `field`, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|(_, message)| message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error during file I/O operations
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Error during JSON serialization or deserialization
    #[error("json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    /// Error when user input fails.
    #[error("inquire error: {0}")]
    Inquire(#[from] inquire::InquireError),
    /// Profile fields outside their bounds
    #[error("validation error: {0}")]
    Validation(FieldErrors),
    /// Stored data could not be read. Recovered locally by callers.
    #[error("failed to read '{key}' from storage: {reason}")]
    StorageRead { key: String, reason: String },
    /// Stored data could not be written. Recovered locally by callers.
    #[error("failed to write '{key}' to storage: {reason}")]
    StorageWrite { key: String, reason: String },
    /// Data source unreachable or returned an error
    #[error("{0}")]
    Fetch(String),
    /// Arguments outside a function's documented domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// View needs a signed-in profile
    #[error("not signed in, run 'mortydex login <username> <job title>' first")]
    SignInRequired,
    /// Invalid runtime configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Fetch(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_lookup_and_display() {
        let mut errors = FieldErrors::new();
        errors.push("username", "Username is required");
        errors.push("jobTitle", "Job title is required");

        assert_eq!(errors.get("username"), Some("Username is required"));
        assert_eq!(errors.get("missing"), None);
        assert_eq!(
            errors.to_string(),
            "Username is required; Job title is required"
        );
        assert_eq!(errors.iter().count(), 2);
    }

    #[test]
    fn fetch_error_shows_raw_message() {
        let err = AppError::Fetch("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
    }
}
