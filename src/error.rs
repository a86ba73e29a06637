//! Error types for beanwire
//!
//! Provides a unified error type for all client operations.

use thiserror::Error;

use crate::protocol::Status;

/// Result type alias using BeanError
pub type Result<T> = std::result::Result<T, BeanError>;

/// Unified error type for beanwire operations
#[derive(Debug, Error)]
pub enum BeanError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the stream where a reply was still expected
    #[error("Connection closed by server mid-response")]
    ConnectionClosed,

    #[error("Not connected")]
    NotConnected,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// Status token outside both declared sets for this verb
    #[error("Unexpected response to {verb}: {status} {args:?}")]
    UnexpectedResponse {
        verb: String,
        status: String,
        args: Vec<String>,
    },

    /// Status token in the verb's declared failure set
    #[error("Command {verb} failed: {status} {args:?}")]
    CommandFailed {
        verb: String,
        status: Status,
        args: Vec<String>,
    },

    /// A reserved job's TTR is about to run out
    #[error("Deadline soon for a reserved job {args:?}")]
    DeadlineSoon { args: Vec<String> },

    /// Reply matched but its arguments could not be interpreted
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Local Errors
    // -------------------------------------------------------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl BeanError {
    /// Returns whether the connection should be considered unusable.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            BeanError::Io(_) | BeanError::ConnectionClosed | BeanError::NotConnected
        )
    }

    pub fn is_command_failed(&self) -> bool {
        matches!(self, BeanError::CommandFailed { .. })
    }

    /// The failure status carried by a `CommandFailed`, if any.
    pub fn failed_status(&self) -> Option<Status> {
        match self {
            BeanError::CommandFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
