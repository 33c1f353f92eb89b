//! # Registry Errors

use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry errors
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("Endpoint not found: {0}")]
    NotFound(String),

    #[error("Invalid endpoint config: {0}")]
    InvalidConfig(String),

    #[error("Config store error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            RegistryError::NotFound(_) => 404,
            RegistryError::InvalidConfig(_) => 400,
            RegistryError::Storage(_) => 500,
            RegistryError::Internal(_) => 500,
        }
    }

    pub(crate) fn poisoned() -> Self {
        RegistryError::Internal("Lock poisoned".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RegistryError::NotFound("x".into()).status_code(), 404);
        assert_eq!(RegistryError::InvalidConfig("x".into()).status_code(), 400);
        assert_eq!(RegistryError::Storage("x".into()).status_code(), 500);
    }
}
