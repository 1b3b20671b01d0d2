// Error types for event dispatch

use thiserror::Error;

/// Errors raised by listeners while handling an event.
#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("Listener failed: {0}")]
    Failed(String),

    #[error("Listener for {expected} received {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ListenerError {
    /// Wrap any error raised inside a listener.
    pub fn other<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other(Box::new(err))
    }
}

/// Errors raised while materializing a named listener.
#[derive(Error, Debug)]
pub enum FactoryError {
    #[error("Listener not found: {0}")]
    NotFound(String),

    #[error("Failed to construct {id}: {reason}")]
    Construction { id: String, reason: String },
}

/// Errors returned from [`EventDispatcher::dispatch`](crate::EventDispatcher::dispatch).
///
/// Only `InvalidListener` originates in the dispatcher itself; factory and
/// listener errors are passed through untouched.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Listener `{listener}` for {event} must be a closure or implement Listener for that event")]
    InvalidListener {
        listener: String,
        event: &'static str,
    },

    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}

impl DispatchError {
    pub fn is_invalid_listener(&self) -> bool {
        matches!(self, Self::InvalidListener { .. })
    }
}
