//! Validation helpers for DTOs.

use validator::ValidationError;

/// Shortest username accepted at sign-up.
const USERNAME_MIN: usize = 3;
/// Longest username accepted at sign-up.
const USERNAME_MAX: usize = 32;

/// Validates that a username is 3 to 32 characters of ASCII alphanumerics,
/// underscores, or hyphens.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let length = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
        let mut err = ValidationError::new("username_length");
        err.message = Some(
            format!("Username must be {USERNAME_MIN} to {USERNAME_MAX} characters (got {length})")
                .into(),
        );
        return Err(err);
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        let mut err = ValidationError::new("username_format");
        err.message =
            Some("Username may contain only letters, digits, underscores, and hyphens".into());
        return Err(err);
    }

    Ok(())
}
