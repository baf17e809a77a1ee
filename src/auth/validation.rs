//! Input validation for Memwall registration.

use thiserror::Error;

use crate::auth::password::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

/// Minimum username length (in characters).
pub const MIN_USERNAME_LENGTH: usize = 2;

/// Maximum username length (in characters).
pub const MAX_USERNAME_LENGTH: usize = 20;

/// Validation errors.
///
/// Each variant identifies the offending field and rule, so the web layer
/// can re-render the form with a field-level message without losing the
/// submitted values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is too short.
    #[error("username must be at least {MIN_USERNAME_LENGTH} characters")]
    UsernameTooShort,

    /// Username is too long.
    #[error("username must be at most {MAX_USERNAME_LENGTH} characters")]
    UsernameTooLong,

    /// Username contains control characters.
    #[error("username contains invalid characters")]
    UsernameInvalidChars,

    /// Username is already taken.
    #[error("username is already taken")]
    UsernameTaken,

    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,

    /// Password and confirmation do not match.
    #[error("passwords do not match")]
    PasswordMismatch,
}

impl ValidationError {
    /// Name of the form field this error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::UsernameTooShort
            | ValidationError::UsernameTooLong
            | ValidationError::UsernameInvalidChars
            | ValidationError::UsernameTaken => "username",
            ValidationError::PasswordTooShort | ValidationError::PasswordTooLong => "password",
            ValidationError::PasswordMismatch => "confirm_password",
        }
    }
}

/// Validate a username.
///
/// Requirements:
/// - Length: 2-20 characters (counted in characters, so CJK names work)
/// - No control characters
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let char_count = username.chars().count();

    if char_count < MIN_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooShort);
    }
    if char_count > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    if username.chars().any(|c| c.is_control()) {
        return Err(ValidationError::UsernameInvalidChars);
    }

    Ok(())
}

/// Validate a registration password and its confirmation.
pub fn validate_registration_password(
    password: &str,
    confirm_password: &str,
) -> Result<(), ValidationError> {
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }

    Ok(())
}

/// Validate all registration fields.
///
/// Runs every check before any mutation happens; the first failure is
/// returned.
pub fn validate_registration(
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), ValidationError> {
    validate_username(username)?;
    validate_registration_password(password, confirm_password)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_length() {
        assert!(matches!(
            validate_username("a"),
            Err(ValidationError::UsernameTooShort)
        ));
        assert!(validate_username("ab").is_ok());
        assert!(validate_username(&"a".repeat(20)).is_ok());
        assert!(matches!(
            validate_username(&"a".repeat(21)),
            Err(ValidationError::UsernameTooLong)
        ));
    }

    #[test]
    fn test_validate_username_cjk_counted_in_chars() {
        // Two CJK characters are two characters, not six bytes
        assert!(validate_username("小明").is_ok());
        assert!(validate_username(&"明".repeat(20)).is_ok());
        assert!(validate_username(&"明".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_username_control_chars() {
        assert!(matches!(
            validate_username("ab\ncd"),
            Err(ValidationError::UsernameInvalidChars)
        ));
    }

    #[test]
    fn test_validate_password_boundary() {
        assert!(matches!(
            validate_registration_password("12345", "12345"),
            Err(ValidationError::PasswordTooShort)
        ));
        assert!(validate_registration_password("123456", "123456").is_ok());
    }

    #[test]
    fn test_validate_password_mismatch() {
        assert!(matches!(
            validate_registration_password("secret1", "secret2"),
            Err(ValidationError::PasswordMismatch)
        ));
    }

    #[test]
    fn test_validation_error_fields() {
        assert_eq!(ValidationError::UsernameTooShort.field(), "username");
        assert_eq!(ValidationError::UsernameTaken.field(), "username");
        assert_eq!(ValidationError::PasswordTooShort.field(), "password");
        assert_eq!(ValidationError::PasswordMismatch.field(), "confirm_password");
    }

    #[test]
    fn test_validate_registration_order() {
        // Username problems are reported before password problems
        let result = validate_registration("a", "123", "456");
        assert!(matches!(result, Err(ValidationError::UsernameTooShort)));
    }
}
