//! Client-side input validation.
//!
//! Rejected input never reaches the network.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::document::ALLOWED_EXTENSIONS;
use crate::error::{DocqaError, Result};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(DocqaError::validation("email", "Email is required"));
    }
    if !EMAIL.is_match(email) {
        return Err(DocqaError::validation("email", "Please enter a valid email"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(DocqaError::validation("password", "Password is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DocqaError::validation(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}

/// Returns the trimmed question, or an error if nothing is left.
pub fn normalize_question(question: &str) -> Result<&str> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(DocqaError::validation("question", "Question is required"));
    }
    Ok(trimmed)
}

/// Checks the file extension against the ingestion allow-list.
pub fn validate_upload_path(path: &Path) -> Result<()> {
    let allowed = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false);
    if !allowed {
        return Err(DocqaError::validation(
            "file",
            format!(
                "unsupported file type; allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("alice@example").is_err());
        assert!(validate_email("alice @example.com").is_err());
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_question_is_trimmed() {
        assert_eq!(normalize_question("  hello \n").unwrap(), "hello");
        assert!(normalize_question("   ").unwrap_err().is_validation());
    }

    #[test]
    fn test_upload_extension_allow_list() {
        assert!(validate_upload_path(Path::new("/tmp/report.PDF")).is_ok());
        assert!(validate_upload_path(Path::new("notes.txt")).is_ok());
        assert!(validate_upload_path(Path::new("slides.pptx")).is_err());
        assert!(validate_upload_path(Path::new("README")).is_err());
    }
}
