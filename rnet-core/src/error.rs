//! Error types for rnet-core

/// Result type alias for rnet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller supplied a value the protocol cannot encode
    #[error("Invalid {field}: {value} ({reason})")]
    InvalidArgument {
        field: &'static str,
        value: u32,
        reason: &'static str,
    },

    /// Template names a placeholder that was not supplied
    #[error("Template {template} requires a {field}")]
    MissingField {
        template: &'static str,
        field: &'static str,
    },

    /// Wildcards are only meaningful in response signatures
    #[error("Template {0} contains a wildcard and cannot be sent")]
    WildcardInCommand(&'static str),

    /// Invalid session state
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),

    /// Session is not connected
    #[error("Session not connected - connect to the controller first")]
    NotConnected,
}

impl Error {
    /// Shorthand used by the builder and the zone API
    pub fn invalid(field: &'static str, value: impl Into<u32>, reason: &'static str) -> Self {
        Self::InvalidArgument {
            field,
            value: value.into(),
            reason,
        }
    }

    /// Check if error was caused by caller input
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. } | Self::MissingField { .. })
    }
}
