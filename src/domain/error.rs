use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unauthenticated: {message}")]
    Unauthenticated { message: String },

    #[error("Malformed credential: {message}")]
    Malformed { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("API key has been revoked")]
    Revoked,

    #[error("API key has expired")]
    Expired,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("API key is already revoked")]
    AlreadyRevoked,

    #[error("Quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Infrastructure failure: {message}")]
    Infrastructure { message: String },
}

impl DomainError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::QuotaExceeded {
            message: message.into(),
        }
    }

    pub fn rate_limited(retry_after_secs: u64) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        Self::Infrastructure {
            message: message.into(),
        }
    }

    /// Whether a caller can recover simply by waiting and retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("API key 'abc' not found");
        assert_eq!(error.to_string(), "Not found: API key 'abc' not found");
    }

    #[test]
    fn test_rate_limited_is_retryable() {
        assert!(DomainError::rate_limited(30).is_retryable());
        assert!(!DomainError::Revoked.is_retryable());
        assert!(!DomainError::quota_exceeded("limit reached").is_retryable());
    }

    #[test]
    fn test_quota_exceeded_error() {
        let error = DomainError::quota_exceeded("owner already holds 1 active key");
        assert_eq!(
            error.to_string(),
            "Quota exceeded: owner already holds 1 active key"
        );
    }
}
