use thiserror::Error;

/// Core domain errors
///
/// Every failure a user operation can report falls into one of these kinds.
/// Store failures are classified before they reach this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The caller-facing message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput { message }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::Unauthorized { message }
            | Self::Internal { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("User not found");
        assert_eq!(error.to_string(), "Not found: User not found");
    }

    #[test]
    fn test_invalid_input_error() {
        let error = DomainError::invalid_input("No fields provided for update");
        assert_eq!(
            error.to_string(),
            "Invalid input: No fields provided for update"
        );
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Email already in use");
        assert_eq!(error.to_string(), "Conflict: Email already in use");
    }

    #[test]
    fn test_message_strips_kind() {
        let error = DomainError::unauthorized("Invalid credentials");
        assert_eq!(error.message(), "Invalid credentials");
    }
}
