//! Error types for Covo
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Covo operations
///
/// This enum encompasses all possible errors that can occur during
/// completion streaming, collaborator API calls, configuration loading,
/// and message store maintenance.
#[derive(Error, Debug)]
pub enum CovoError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Collaborator API errors (conversation/catalog fetches)
    #[error("API error: {0}")]
    Api(String),

    /// The completion request failed outright with a non-success status
    #[error("Transport error: completion endpoint returned HTTP {status}")]
    TransportStatus {
        /// The HTTP status code returned by the completion endpoint
        status: u16,
    },

    /// The completion response carried no streamable body
    #[error("Transport error: completion response has no body")]
    TransportNoBody,

    /// The byte stream was aborted or stalled before the turn settled
    #[error("Transport error: stream aborted: {0}")]
    TransportAborted(String),

    /// The server emitted a fatal `error` event mid-stream
    #[error("Server stream error: {0}")]
    ServerStream(String),

    /// The stream ended without producing any reply text
    #[error("Stream ended with no reply data")]
    EmptyReply,

    /// Message store invariant violations (duplicate ids, unknown ids)
    #[error("Message store error: {0}")]
    Store(String),

    /// A send was refused because a turn is already in flight
    #[error("A turn is already in flight for this conversation")]
    TurnInFlight,

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Covo operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
