//! API key input validation utilities

use thiserror::Error;

/// Errors that can occur while validating key-management input
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyValidationError {
    #[error("Key name cannot be empty")]
    EmptyName,

    #[error("Key name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Expiration must be between {min} and {max} days")]
    ExpiryOutOfRange { min: u32, max: u32 },
}

const MAX_KEY_NAME_LENGTH: usize = 100;
const MIN_EXPIRES_IN_DAYS: u32 = 1;
const MAX_EXPIRES_IN_DAYS: u32 = 365;

/// Validate a user-supplied key name (1-100 characters)
pub fn validate_key_name(name: &str) -> Result<(), ApiKeyValidationError> {
    if name.is_empty() {
        return Err(ApiKeyValidationError::EmptyName);
    }

    if name.chars().count() > MAX_KEY_NAME_LENGTH {
        return Err(ApiKeyValidationError::NameTooLong(MAX_KEY_NAME_LENGTH));
    }

    Ok(())
}

/// Validate an optional expiration expressed in days (1-365)
pub fn validate_expires_in_days(days: u32) -> Result<(), ApiKeyValidationError> {
    if !(MIN_EXPIRES_IN_DAYS..=MAX_EXPIRES_IN_DAYS).contains(&days) {
        return Err(ApiKeyValidationError::ExpiryOutOfRange {
            min: MIN_EXPIRES_IN_DAYS,
            max: MAX_EXPIRES_IN_DAYS,
        });
    }

    Ok(())
}
