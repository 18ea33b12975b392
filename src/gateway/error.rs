use reqwest::StatusCode;

use super::Operation;

/// Low-level failure of a single transport call.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
    #[error("upstream responded with {status}")]
    Status {
        status: StatusCode,
        /// `message` field of the upstream JSON body, when it had one.
        message: Option<String>,
    },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// The only error shape gateway callers ever see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Collapses a transport failure into one message, preferring what the
    /// upstream said over the operation's fallback.
    pub fn normalize(operation: Operation, error: TransportError) -> Self {
        match error {
            TransportError::Status {
                status,
                message: Some(message),
            } => {
                tracing::warn!(%status, operation = operation.name(), %message, "upstream rejected request");
                Self::new(message)
            }
            TransportError::Status { status, message: None } => {
                tracing::warn!(%status, operation = operation.name(), "upstream error without message");
                Self::new(operation.transport_fallback())
            }
            TransportError::Request(e) => {
                tracing::warn!(error = %e, operation = operation.name(), "news request failed");
                Self::new(operation.transport_fallback())
            }
            TransportError::InvalidUrl(e) => {
                tracing::error!(error = %e, operation = operation.name(), "could not build news request");
                Self::new(operation.fallback())
            }
        }
    }
}
