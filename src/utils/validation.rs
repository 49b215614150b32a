//! Validation Utilities
//!
//! Input validation functions for user data, items and query parameters.

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

/// Validates email address format using a comprehensive regex pattern
pub fn validate_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email regex is valid")
    });

    regex.is_match(email.trim())
}

/// Normalizes email address to lowercase and removes whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates that a name contains only allowed characters and length
pub fn validate_name(name: &str) -> bool {
    let trimmed = name.trim();

    // Name must be between 1 and 100 characters
    if trimmed.is_empty() || trimmed.chars().count() > 100 {
        return false;
    }

    // Letters (any script), spaces, hyphens, periods and apostrophes
    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NAME_REGEX
        .get_or_init(|| Regex::new(r"^[\p{L}\s\-'.]+$").expect("name regex is valid"));

    regex.is_match(trimmed)
}

/// Password must mix letters and digits
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_letter && has_digit {
        Ok(())
    } else {
        let mut error = ValidationError::new("weak_password");
        error.message = Some(messages::WEAK_PASSWORD.into());
        Err(error)
    }
}

/// Item titles must contain something other than whitespace
pub fn title_validator(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        let mut error = ValidationError::new("blank_title");
        error.message = Some(messages::FIELD_REQUIRED.into());
        Err(error)
    } else {
        Ok(())
    }
}

/// Custom validator for email fields using the validator crate
pub fn email_validator(email: &str) -> Result<(), ValidationError> {
    if validate_email(email) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_email");
        error.message = Some(messages::INVALID_EMAIL.into());
        Err(error)
    }
}

/// Custom validator for name fields using the validator crate
pub fn name_validator(name: &str) -> Result<(), ValidationError> {
    if validate_name(name) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_name");
        error.message = Some(messages::INVALID_NAME.into());
        Err(error)
    }
}

/// Escapes `%`, `_` and `\` so user input matches literally inside `ILIKE`
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Validation error messages for user-friendly responses
pub mod messages {
    pub const INVALID_EMAIL: &str = "Please enter a valid email address";
    pub const INVALID_NAME: &str =
        "Name must contain only letters, spaces, hyphens, periods and apostrophes";
    pub const WEAK_PASSWORD: &str = "Password must contain at least one letter and one digit";
    pub const FIELD_REQUIRED: &str = "This field is required";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("test.user+tag@domain.co.uk"));
        assert!(!validate_email("invalid.email"));
        assert!(!validate_email("@domain.com"));
        assert!(!validate_email("user@"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  USER@EXAMPLE.COM  "), "user@example.com");
        assert_eq!(normalize_email("Test@Domain.org"), "test@domain.org");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("John Doe"));
        assert!(validate_name("Mary-Jane O'Connor"));
        assert!(validate_name("José Álvarez"));
        assert!(!validate_name(""));
        assert!(!validate_name("   "));
        assert!(!validate_name("John123"));
        assert!(!validate_name("John@Doe"));
        assert!(!validate_name(&"a".repeat(101)));
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("SecurePass123").is_ok());
        assert!(validate_password_strength("onlyletters").is_err());
        assert!(validate_password_strength("12345678").is_err());
    }

    #[test]
    fn test_title_validator() {
        assert!(title_validator("Desk lamp").is_ok());
        assert!(title_validator("   ").is_err());
    }

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like_pattern(r"a\b"), r"a\\b");
        assert_eq!(escape_like_pattern("lamp"), "lamp");
    }
}
