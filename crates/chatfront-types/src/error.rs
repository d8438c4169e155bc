//! Error taxonomy for the chat lifecycle core.
//!
//! Nothing in this taxonomy is allowed to terminate request handling:
//! every variant degrades to a visible notice plus a safe redirect or
//! an unchanged state further up the stack.

use thiserror::Error;

/// Errors from username validation.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("username cannot be empty")]
    Empty,

    #[error("username too long ({0} characters, max 64)")]
    TooLong(usize),

    #[error("username '{0}' contains invalid characters (allowed: letters, digits, '-', '_')")]
    InvalidCharacters(String),
}

/// Errors from chat record persistence.
///
/// A malformed persisted payload is deliberately NOT represented here:
/// the store degrades it to a synthesized "Corrupt Chat" record so a
/// broken file never blocks navigation.
#[derive(Debug, Error)]
pub enum ChatStoreError {
    #[error("chat not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialize(String),
}

impl From<std::io::Error> for ChatStoreError {
    fn from(e: std::io::Error) -> Self {
        ChatStoreError::Io(e.to_string())
    }
}

/// Errors from the remote model gateway.
///
/// The `Display` forms are stable on purpose: the turn executor embeds
/// them verbatim in the durable error turn, so they must stay parseable.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network-level failure: connect error, timeout, DNS.
    #[error("gateway unreachable: {0}")]
    Unreachable(String),

    /// The gateway answered with a non-2xx status.
    #[error("gateway returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The gateway answered 2xx but the body did not match the contract.
    #[error("malformed gateway response: {0}")]
    Malformed(String),
}

/// Errors from executing a conversation turn.
#[derive(Debug, Error)]
pub enum TurnError {
    /// No online model is bound; the record was not mutated.
    #[error("no models online")]
    NoModelAvailable,

    #[error(transparent)]
    Store(#[from] ChatStoreError),
}

/// Rejection of an explicit model selection.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("invalid or offline model: '{0}'")]
    InvalidSelection(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display_is_stable() {
        let err = GatewayError::Status {
            status: 503,
            detail: "upstream busy".to_string(),
        };
        assert_eq!(err.to_string(), "gateway returned HTTP 503: upstream busy");

        let err = GatewayError::Unreachable("connection refused".to_string());
        assert_eq!(err.to_string(), "gateway unreachable: connection refused");
    }

    #[test]
    fn test_turn_error_display() {
        assert_eq!(TurnError::NoModelAvailable.to_string(), "no models online");
    }

    #[test]
    fn test_selection_error_display() {
        let err = SelectionError::InvalidSelection("gpt-x".to_string());
        assert_eq!(err.to_string(), "invalid or offline model: 'gpt-x'");
    }

    #[test]
    fn test_store_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ChatStoreError = io.into();
        assert!(err.to_string().contains("denied"));
    }
}
