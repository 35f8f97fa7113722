//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] rnet_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] rnet_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] rnet_types::Error),
}

impl Error {
    /// Check if the caller passed a value the protocol cannot carry
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_invalid_argument())
    }

    /// Check if the operation failed because no connection is open
    pub fn is_not_connected(&self) -> bool {
        matches!(
            self,
            Self::Core(rnet_core::Error::NotConnected)
                | Self::Transport(rnet_transport::Error::NotConnected)
        )
    }
}
